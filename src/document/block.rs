//! Top-level document blocks

use std::fmt;

use crate::error::Span;
use crate::markup::Attributes;

/// One top-level block of a component: its type tag, attributes and raw content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Tag of the block: `template`, `script`, `style` or a custom name
    pub kind: String,
    pub attrs: Attributes,
    pub content: String,
    /// Where `content` sits in the source the block was split from
    /// (empty for blocks built in code)
    pub span: Span,
}

impl Block {
    pub fn new(kind: impl Into<String>, attrs: Attributes, content: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs,
            content: content.into(),
            span: 0..0,
        }
    }

    pub(crate) fn from_source(kind: String, attrs: Attributes, source: &str, span: Span) -> Self {
        Self {
            kind,
            attrs,
            content: source[span.clone()].to_string(),
            span,
        }
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}{}>{}</{}>", self.kind, self.attrs, self.content, self.kind)
    }
}

/// Write a template block followed by the other blocks, one per paragraph
pub fn compose<'b>(template: &Block, rest: impl IntoIterator<Item = &'b Block>) -> String {
    let mut out = template.to_string();
    for block in rest {
        out.push_str("\n\n");
        out.push_str(&block.to_string());
    }
    out.push('\n');
    out
}
