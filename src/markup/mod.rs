//! Markup tree utilities
//!
//! Parses the permissive HTML dialect of component templates into a tree of
//! [`Node`]s, finds elements by tag name and writes trees back to text.

pub mod lexer;
mod serialize;
mod tag;
mod tree;

pub use serialize::serialize;
pub use tag::{parse_start_tag, StartTag};
pub use tree::{
    find_by_tag, is_raw_text, is_void, parse_tree, walk_elements_mut, Attribute, Attributes,
    Element, Node, Walk,
};
