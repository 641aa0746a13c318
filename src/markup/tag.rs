//! Start tag grammar using chumsky

use chumsky::prelude::*;

use crate::error::MarkupParseError;

use super::tree::{Attribute, Attributes};

/// A parsed start tag: `<name attr="value" ... />`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attrs: Attributes,
    pub self_closing: bool,
}

/// Parse the raw text of a start tag token, including its `<` and `>`
///
/// `offset` is the position of the token in the enclosing source and is used
/// to report errors against that source.
pub fn parse_start_tag(raw: &str, offset: usize) -> Result<StartTag, MarkupParseError> {
    let inner = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| MarkupParseError::Unterminated {
            span: offset..offset + raw.len(),
            construct: "start tag",
        })?;

    start_tag_parser()
        .parse(inner)
        .into_result()
        .map_err(|errs| {
            errs.into_iter()
                .next()
                .map(MarkupParseError::from)
                .unwrap_or_else(|| MarkupParseError::Syntax {
                    span: 0..inner.len(),
                    message: "invalid start tag".to_string(),
                    expected: Vec::new(),
                })
                .shifted(offset + 1)
        })
}

fn start_tag_parser<'a>() -> impl Parser<'a, &'a str, StartTag, extra::Err<Rich<'a, char>>> {
    let whitespace = one_of(" \t\r\n\x0c").repeated();

    let tag_name = none_of(" \t\r\n\x0c/>")
        .repeated()
        .at_least(1)
        .collect::<String>()
        .labelled("tag name");

    let attr_name = none_of(" \t\r\n\x0c\"'/>=")
        .repeated()
        .at_least(1)
        .collect::<String>()
        .labelled("attribute name");

    let double_quoted = just('"')
        .ignore_then(none_of("\"").repeated().collect::<String>())
        .then_ignore(just('"'));

    let single_quoted = just('\'')
        .ignore_then(none_of("'").repeated().collect::<String>())
        .then_ignore(just('\''));

    let unquoted = none_of(" \t\r\n\x0c\"'=<>`")
        .repeated()
        .at_least(1)
        .collect::<String>();

    let value = choice((double_quoted, single_quoted, unquoted)).labelled("attribute value");

    let attribute = attr_name
        .then(
            just('=')
                .padded_by(whitespace.clone())
                .ignore_then(value)
                .or_not(),
        )
        .map(|(name, value)| Attribute { name, value });

    tag_name
        .then(
            attribute
                .padded_by(whitespace.clone())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(whitespace.clone())
        .then(just('/').or_not())
        .then_ignore(whitespace)
        .then_ignore(end())
        .map(|((name, attrs), slash)| StartTag {
            name,
            attrs: Attributes::from(attrs),
            self_closing: slash.is_some(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tag() {
        let tag = parse_start_tag("<div>", 0).unwrap();
        assert_eq!(tag.name, "div");
        assert!(tag.attrs.is_empty());
        assert!(!tag.self_closing);
    }

    #[test]
    fn test_attribute_forms() {
        let tag = parse_start_tag(
            r#"<extension-point name="header" class='a b' data-x=1 hidden>"#,
            0,
        )
        .unwrap();
        assert_eq!(tag.name, "extension-point");
        assert_eq!(tag.attrs.get("name"), Some("header"));
        assert_eq!(tag.attrs.get("class"), Some("a b"));
        assert_eq!(tag.attrs.get("data-x"), Some("1"));
        assert_eq!(tag.attrs.get("hidden"), Some(""));
        assert_eq!(tag.attrs.len(), 4);
    }

    #[test]
    fn test_vue_directives() {
        let tag = parse_start_tag(r#"<my-button :label="msg" @click="go(1)" v-if="ok">"#, 0)
            .unwrap();
        assert_eq!(tag.name, "my-button");
        assert_eq!(tag.attrs.get(":label"), Some("msg"));
        assert_eq!(tag.attrs.get("@click"), Some("go(1)"));
        assert_eq!(tag.attrs.get("v-if"), Some("ok"));
    }

    #[test]
    fn test_self_closing() {
        assert!(parse_start_tag("<br/>", 0).unwrap().self_closing);
        let tag = parse_start_tag(r#"<extension-point name="a" />"#, 0).unwrap();
        assert!(tag.self_closing);
        assert_eq!(tag.attrs.get("name"), Some("a"));
    }

    #[test]
    fn test_spaces_around_equals() {
        let tag = parse_start_tag(r#"<template extends = "./Base.vue">"#, 0).unwrap();
        assert_eq!(tag.attrs.get("extends"), Some("./Base.vue"));
    }

    #[test]
    fn test_unquoted_value_keeps_slashes() {
        let tag = parse_start_tag("<a href=/docs/intro>", 0).unwrap();
        assert_eq!(tag.attrs.get("href"), Some("/docs/intro"));
        assert!(!tag.self_closing);
    }

    #[test]
    fn test_malformed_attribute_reports_offset() {
        let err = parse_start_tag(r#"<p class="x"y"z">"#, 100).unwrap_err();
        assert!(matches!(err, MarkupParseError::Syntax { .. }));
        assert!(err.span().start >= 100);
    }
}
