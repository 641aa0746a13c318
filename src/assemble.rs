//! Final output assembly

use tracing::trace;

use crate::config::ResolverOptions;
use crate::document::{compose, split, Block};
use crate::markup::{parse_tree, serialize, walk_elements_mut, Walk};
use crate::resolver::{ResolveError, GROUPING_TAG};

/// Strip the leading run of empty `//` comment lines some compilers pad
/// script blocks with
pub fn strip_generated_comment_lines(content: &str) -> &str {
    let mut rest = content;
    loop {
        if let Some(stripped) = rest.strip_prefix("//\n") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("//\r\n") {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

/// Turn a resolved document into the text handed back to the build
///
/// The script loses any leading generated comment lines. When the template
/// is extendable, every extension point still open becomes a plain grouping
/// element showing its fallback content. Otherwise the document is left as
/// written.
pub fn assemble(merged: &str, options: &ResolverOptions) -> Result<String, ResolveError> {
    let mut document = split(merged)?;

    let script_padding = document.script.as_mut().and_then(|script| {
        let removed = script.content.len() - strip_generated_comment_lines(&script.content).len();
        (removed > 0).then(|| {
            script.content.drain(..removed);
            script.span.start..script.span.start + removed
        })
    });

    if !document.is_extendable(options) {
        let mut out = merged.to_string();
        if let Some(padding) = script_padding {
            out.replace_range(padding, "");
        }
        return Ok(out);
    }

    let mut tree = parse_tree(&document.template.content)
        .map_err(|e| e.shifted(document.template.span.start))?;
    walk_elements_mut(&mut tree, &mut |el| {
        if el.is_named(&options.ext_point_tag) {
            trace!(point = ?el.attr(&options.ext_point_name_attr), "showing fallback of open extension point");
            el.rename(GROUPING_TAG);
            el.remove_attr(&options.ext_point_name_attr);
        }
        Walk::Descend
    });

    let template = Block::new("template", Default::default(), serialize(&tree));
    Ok(compose(&template, document.output_blocks(options)))
}
