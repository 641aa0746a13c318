//! Error types for markup parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Failure to build a markup tree from a fragment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupParseError {
    /// A tag or comment runs off the end of the input
    #[error("unterminated {construct} at {span:?}")]
    Unterminated { span: Span, construct: &'static str },

    /// A start tag whose name or attributes cannot be read
    #[error("malformed start tag at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl MarkupParseError {
    /// Byte range the error points at
    pub fn span(&self) -> &Span {
        match self {
            MarkupParseError::Unterminated { span, .. } | MarkupParseError::Syntax { span, .. } => {
                span
            }
        }
    }

    /// Move the span by `offset` bytes, for errors found in a slice of a larger source
    pub(crate) fn shifted(mut self, offset: usize) -> Self {
        match &mut self {
            MarkupParseError::Unterminated { span, .. } | MarkupParseError::Syntax { span, .. } => {
                *span = span.start + offset..span.end + offset;
            }
        }
        self
    }

    /// Format the error with source context using ariadne
    ///
    /// Falls back to the plain message when the span does not lie inside `source`.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        if span.end > source.len() {
            return self.to_string();
        }

        let (message, note) = match self {
            MarkupParseError::Unterminated { construct, .. } => {
                (format!("unterminated {}", construct), String::new())
            }
            MarkupParseError::Syntax {
                message, expected, ..
            } => {
                let note = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                (message.clone(), note)
            }
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(format!("{}{}", message, note))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, char>> for MarkupParseError {
    fn from(err: chumsky::error::Rich<'a, char>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(c) => format!("unexpected {:?}", **c),
                None => "unexpected end of tag".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(c) => Some(format!("{:?}", **c)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of tag".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("'{}'", s)),
                chumsky::error::RichPattern::Any => Some("any character".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        MarkupParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}
