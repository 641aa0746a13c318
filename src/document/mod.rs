//! Single-file component splitting
//!
//! A component source is a sequence of top-level blocks:
//!
//! ```text
//! <template extends="./Base.vue"> ... </template>
//! <script> ... </script>
//! <style scoped> ... </style>
//! <i18n> ... </i18n>
//! ```
//!
//! [`split`] turns the source into a [`Document`] holding each block's type,
//! attributes and raw content. Content is kept byte for byte; only the
//! template's content is ever parsed further.

mod block;

use thiserror::Error;
use tracing::warn;

use crate::config::ResolverOptions;
use crate::error::{MarkupParseError, Span};
use crate::markup::lexer::{end_tag_name, MarkupToken, Tokens};
use crate::markup::{is_raw_text, is_void, parse_start_tag};

pub use block::{compose, Block};

/// Errors that make a source unusable as a component document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document has no <template> block")]
    MissingTemplate,

    #[error("document has more than one <template> block")]
    DuplicateTemplate,

    #[error("<{kind}> block opened at byte {offset} is never closed")]
    UnclosedBlock { kind: String, offset: usize },

    #[error("document cannot be split into blocks: {0}")]
    Markup(#[from] MarkupParseError),
}

/// A component source split into its blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub template: Block,
    pub script: Option<Block>,
    pub styles: Vec<Block>,
    pub custom_blocks: Vec<Block>,
}

impl Document {
    /// Relative path of the ancestor this document extends, if any
    pub fn extends<'d>(&'d self, options: &ResolverOptions) -> Option<&'d str> {
        self.template
            .attrs
            .get(&options.extends_attr)
            .filter(|path| !path.is_empty())
    }

    /// Whether the template still exposes its open extension points
    ///
    /// Presence is what counts: `extendable` and `extendable=""` both mark it.
    pub fn is_extendable(&self, options: &ResolverOptions) -> bool {
        self.template.attrs.contains(&options.extendable_attr)
    }

    /// Custom blocks that declare extensions rather than carrying content
    pub fn extension_blocks<'d>(
        &'d self,
        options: &'d ResolverOptions,
    ) -> impl Iterator<Item = &'d Block> {
        self.custom_blocks
            .iter()
            .filter(move |b| b.is_kind(&options.extensions_tag))
    }

    /// The blocks that follow the template in output: script, styles, then
    /// custom blocks other than extension declarations
    pub fn output_blocks<'d>(
        &'d self,
        options: &'d ResolverOptions,
    ) -> impl Iterator<Item = &'d Block> {
        self.script
            .iter()
            .chain(&self.styles)
            .chain(self.custom_blocks.iter().filter(move |b| {
                !b.is_kind(&options.extension_tag) && !b.is_kind(&options.extensions_tag)
            }))
    }
}

/// Split a component source into its top-level blocks
pub fn split(source: &str) -> Result<Document, DocumentError> {
    let mut tokens = Tokens::new(source);
    let mut template = None;
    let mut script = None;
    let mut styles = Vec::new();
    let mut custom_blocks = Vec::new();

    while let Some(item) = tokens.next() {
        let (token, span) = item?;
        // Text, comments and stray end tags between blocks are not part of any block
        if token != MarkupToken::StartTag {
            continue;
        }

        let tag = parse_start_tag(&source[span.clone()], span.start)?;
        let content = if tag.self_closing {
            span.end..span.end
        } else {
            let end = block_end(&mut tokens, source, &tag.name)?.ok_or_else(|| {
                DocumentError::UnclosedBlock {
                    kind: tag.name.clone(),
                    offset: span.start,
                }
            })?;
            span.end..end
        };

        let block = Block::from_source(tag.name, tag.attrs, source, content);
        if block.is_kind("template") {
            if template.is_some() {
                return Err(DocumentError::DuplicateTemplate);
            }
            template = Some(block);
        } else if block.is_kind("script") {
            if script.is_some() {
                warn!("document has more than one <script> block; keeping the last one");
            }
            script = Some(block);
        } else if block.is_kind("style") {
            styles.push(block);
        } else {
            custom_blocks.push(block);
        }
    }

    Ok(Document {
        template: template.ok_or(DocumentError::MissingTemplate)?,
        script,
        styles,
        custom_blocks,
    })
}

/// Find where the block opened by `<name>` ends, consuming its end tag
///
/// Returns the offset of the end tag, or `None` if the source ends first.
fn block_end(
    tokens: &mut Tokens<'_>,
    source: &str,
    name: &str,
) -> Result<Option<usize>, MarkupParseError> {
    if is_raw_text(name) {
        let text: Span = tokens.skip_raw_text(name);
        return Ok(match tokens.next().transpose()? {
            Some((MarkupToken::EndTag, _)) => Some(text.end),
            _ => None,
        });
    }

    let mut open: Vec<String> = Vec::new();
    while let Some(item) = tokens.next() {
        let (token, span) = item?;
        let raw = &source[span.clone()];
        match token {
            MarkupToken::StartTag => {
                let tag = parse_start_tag(raw, span.start)?;
                if tag.self_closing || is_void(&tag.name) {
                    continue;
                }
                if is_raw_text(&tag.name) {
                    tokens.skip_raw_text(&tag.name);
                }
                open.push(tag.name);
            }
            MarkupToken::EndTag => {
                let closing = end_tag_name(raw);
                match open.iter().rposition(|n| n.eq_ignore_ascii_case(closing)) {
                    Some(pos) => open.truncate(pos),
                    None if closing.eq_ignore_ascii_case(name) => return Ok(Some(span.start)),
                    None => {}
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
