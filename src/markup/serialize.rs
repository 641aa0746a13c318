//! Markup tree serialization

use super::tree::{is_void, Element, Node};

/// Serialize a node list back to markup text
///
/// Untouched parsed elements are written with their original tag text, so a
/// tree that was parsed and not modified serializes to the input it came from.
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(nodes, &mut out);
    out
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(el) => write_element(el, out),
            Node::Text(text) => out.push_str(text),
            Node::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    // A `<x/>` tag that has since been given children must be written in full
    let raw = el
        .raw
        .as_ref()
        .filter(|_| !el.is_self_closing() || el.children.is_empty());

    if let Some(tags) = raw {
        out.push_str(&tags.open);
        write_nodes(&el.children, out);
        if let Some(close) = &tags.close {
            out.push_str(close);
        }
        return;
    }

    out.push('<');
    out.push_str(el.name());
    out.push_str(&el.attrs().to_string());

    if el.children.is_empty() && (el.is_self_closing() || is_void(el.name())) {
        out.push_str(if el.is_self_closing() { " />" } else { ">" });
        return;
    }

    out.push('>');
    write_nodes(&el.children, out);
    out.push_str("</");
    out.push_str(el.name());
    out.push('>');
}
