//! Markup tree types and the tolerant tree builder

use std::fmt;

use crate::error::MarkupParseError;

use super::lexer::{end_tag_name, MarkupToken, Tokens};
use super::tag::{parse_start_tag, StartTag};

/// Elements that never have children or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text rather than markup
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

pub fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// A single `name` or `name="value"` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for valueless attributes such as `extendable`
    pub value: Option<String>,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            None => write!(f, "{}", self.name),
            Some(v) if v.contains('"') && !v.contains('\'') => write!(f, "{}='{}'", self.name, v),
            Some(v) => write!(f, "{}=\"{}\"", self.name, v.replace('"', "&quot;")),
        }
    }
}

/// Ordered attribute list with case-insensitive name lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of an attribute; valueless attributes read as `""`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name)
            .map(|a| a.value.as_deref().unwrap_or_default())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Set an attribute, replacing an existing one of the same name in place
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.0.iter_mut().find(|a| a.name.eq_ignore_ascii_case(&name)) {
            Some(existing) => existing.value = value,
            None => self.0.push(Attribute { name, value }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        let pos = self.0.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.0.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn find(&self, name: &str) -> Option<&Attribute> {
        self.0.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

impl From<Vec<Attribute>> for Attributes {
    fn from(attrs: Vec<Attribute>) -> Self {
        Self(attrs)
    }
}

/// Writes each attribute preceded by a space, ready to follow a tag name
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in &self.0 {
            write!(f, " {}", attr)?;
        }
        Ok(())
    }
}

/// A node of a markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, kept exactly as written (entities are not decoded)
    Text(String),
    /// Comment body, without the `<!--` and `-->` delimiters
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }
}

/// Original tag text of a parsed element
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawTags {
    pub(crate) open: String,
    /// `None` when the element was closed implicitly
    pub(crate) close: Option<String>,
}

/// An element with its attributes and children
///
/// Parsed elements remember their original tag text so an untouched element
/// serializes back to the same bytes. Renaming the element or removing one of
/// its attributes drops that text and the tags are written out afresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Attributes,
    pub children: Vec<Node>,
    self_closing: bool,
    pub(crate) raw: Option<RawTags>,
}

impl Element {
    pub fn new(name: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            name: name.into(),
            attrs,
            children: Vec::new(),
            self_closing: false,
            raw: None,
        }
    }

    fn from_start_tag(tag: StartTag, raw: &str) -> Self {
        Self {
            name: tag.name,
            attrs: tag.attrs,
            children: Vec::new(),
            self_closing: tag.self_closing,
            raw: Some(RawTags {
                open: raw.to_string(),
                close: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this element's tag is `name`, ignoring ASCII case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.raw = None;
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<Attribute> {
        let removed = self.attrs.remove(name);
        if removed.is_some() {
            self.raw = None;
        }
        removed
    }

    /// Element children only, skipping text and comments
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

/// Parse a markup fragment into a list of top-level nodes
///
/// The builder is lenient in the way browsers are: void elements and `/>`
/// tags take no children, end tags close any elements left open inside them,
/// stray end tags are dropped and elements still open at the end of input are
/// closed there.
pub fn parse_tree(markup: &str) -> Result<Vec<Node>, MarkupParseError> {
    let mut tokens = Tokens::new(markup);
    let mut open: Vec<Element> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    while let Some(item) = tokens.next() {
        let (token, span) = item?;
        let raw = &markup[span.clone()];

        match token {
            MarkupToken::Text | MarkupToken::Lt | MarkupToken::Declaration => {
                append(&mut open, &mut roots, Node::Text(raw.to_string()));
            }
            MarkupToken::Comment => {
                let body = &raw[4..raw.len() - 3];
                append(&mut open, &mut roots, Node::Comment(body.to_string()));
            }
            MarkupToken::StartTag => {
                let mut element = Element::from_start_tag(parse_start_tag(raw, span.start)?, raw);
                if element.self_closing || is_void(&element.name) {
                    append(&mut open, &mut roots, Node::Element(element));
                } else {
                    if is_raw_text(&element.name) {
                        let text = tokens.skip_raw_text(&element.name);
                        if !text.is_empty() {
                            element.children.push(Node::Text(markup[text].to_string()));
                        }
                    }
                    open.push(element);
                }
            }
            MarkupToken::EndTag => {
                let name = end_tag_name(raw);
                let Some(pos) = open.iter().rposition(|el| el.is_named(name)) else {
                    continue;
                };
                while open.len() > pos + 1 {
                    if let Some(unclosed) = open.pop() {
                        append(&mut open, &mut roots, Node::Element(unclosed));
                    }
                }
                if let Some(mut element) = open.pop() {
                    if let Some(tags) = element.raw.as_mut() {
                        tags.close = Some(raw.to_string());
                    }
                    append(&mut open, &mut roots, Node::Element(element));
                }
            }
        }
    }

    while let Some(unclosed) = open.pop() {
        append(&mut open, &mut roots, Node::Element(unclosed));
    }

    Ok(roots)
}

fn append(open: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// All elements named `tag` in pre-order, at any depth
pub fn find_by_tag<'n>(nodes: &'n [Node], tag: &str) -> Vec<&'n Element> {
    fn visit<'n>(nodes: &'n [Node], tag: &str, found: &mut Vec<&'n Element>) {
        for node in nodes {
            if let Node::Element(el) = node {
                if el.is_named(tag) {
                    found.push(el);
                }
                visit(&el.children, tag, found);
            }
        }
    }

    let mut found = Vec::new();
    visit(nodes, tag, &mut found);
    found
}

/// What [`walk_elements_mut`] does after visiting an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Visit the element's children next
    Descend,
    /// Leave the element's children alone
    Skip,
}

/// Visit every element in pre-order, letting the visitor mutate it in place
pub fn walk_elements_mut<F>(nodes: &mut [Node], visit: &mut F)
where
    F: FnMut(&mut Element) -> Walk,
{
    for node in nodes {
        if let Node::Element(el) = node {
            if visit(el) == Walk::Descend {
                walk_elements_mut(&mut el.children, visit);
            }
        }
    }
}
