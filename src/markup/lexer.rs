//! Lexer for component markup using logos
//!
//! The lexer only finds tag boundaries. Start tags are lexed as one token
//! covering `<` through the closing `>`; their names and attributes are read
//! afterwards by the start-tag grammar.

use logos::{Lexer, Logos};

use crate::error::{MarkupParseError, Span};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupToken {
    #[token("<!--", comment)]
    Comment,

    // Doctype, CDATA and processing instructions are kept as opaque text
    #[regex(r"<![a-zA-Z\[][^>]*>")]
    #[regex(r"<\?[^>]*>")]
    Declaration,

    #[regex(r"<[a-zA-Z]", start_tag)]
    StartTag,

    #[regex(r"</[^>]*>")]
    EndTag,

    #[regex(r"[^<]+")]
    Text,

    // A `<` that does not open a tag
    #[token("<")]
    Lt,
}

/// Consume a comment body up to and including `-->`
fn comment(lex: &mut Lexer<'_, MarkupToken>) -> bool {
    match lex.remainder().find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            true
        }
        None => false,
    }
}

/// Consume the rest of a start tag up to and including its closing `>`
fn start_tag(lex: &mut Lexer<'_, MarkupToken>) -> bool {
    match find_tag_end(lex.remainder()) {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

/// Length of `rest` through the first `>` outside a quoted attribute value
fn find_tag_end(rest: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut after_equals = false;

    for (i, b) in rest.bytes().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'>' => return Some(i + 1),
            b'=' => {
                after_equals = true;
                continue;
            }
            b'"' | b'\'' if after_equals => quote = Some(b),
            _ if b.is_ascii_whitespace() => continue,
            _ => {}
        }
        after_equals = false;
    }
    None
}

/// Byte offset of the first `</name` end tag in `haystack`, ignoring ASCII case
pub fn find_end_tag(haystack: &str, name: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let mut from = 0;

    while let Some(i) = haystack[from..].find("</") {
        let start = from + i;
        let name_start = start + 2;
        let name_end = name_start + name.len();
        if name_end <= bytes.len()
            && bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
            && bytes
                .get(name_end)
                .map_or(true, |b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/')
        {
            return Some(start);
        }
        from = name_start;
    }
    None
}

/// Tag name of an end tag token such as `</div >`
pub fn end_tag_name(raw: &str) -> &str {
    raw.trim_start_matches("</")
        .trim_end_matches('>')
        .split(|c: char| c.is_ascii_whitespace())
        .next()
        .unwrap_or_default()
}

/// Token stream over a markup source with absolute spans
///
/// Unlike a bare logos lexer this can jump over the raw text of elements
/// such as `<script>`, whose contents are not markup.
pub struct Tokens<'s> {
    source: &'s str,
    inner: Lexer<'s, MarkupToken>,
    offset: usize,
}

impl<'s> Tokens<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            inner: MarkupToken::lexer(source),
            offset: 0,
        }
    }

    /// Skip raw text up to the next `</name` end tag (or the end of input)
    ///
    /// Returns the span of the skipped text. The end tag itself is the next token.
    pub fn skip_raw_text(&mut self, name: &str) -> Span {
        let start = self.offset + self.inner.span().end;
        let end = find_end_tag(&self.source[start..], name).map_or(self.source.len(), |i| start + i);
        self.inner = MarkupToken::lexer(&self.source[end..]);
        self.offset = end;
        start..end
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<(MarkupToken, Span), MarkupParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.inner.next()?;
        let span = self.inner.span();
        let span = span.start + self.offset..span.end + self.offset;

        Some(match token {
            Ok(token) => Ok((token, span)),
            Err(()) => {
                let construct = if self.source[span.start..].starts_with("<!--") {
                    "comment"
                } else {
                    "start tag"
                };
                Err(MarkupParseError::Unterminated {
                    span: span.start..self.source.len(),
                    construct,
                })
            }
        })
    }
}
