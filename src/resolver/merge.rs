//! One level of inheritance: filling an ancestor's extension points

use tracing::{debug, trace, warn};

use crate::config::ResolverOptions;
use crate::document::{compose, Block, Document};
use crate::error::MarkupParseError;
use crate::markup::{
    find_by_tag, parse_tree, serialize, walk_elements_mut, Attributes, Element, Node, Walk,
};

use super::error::ResolveError;

/// Tag a filled extension point is rewritten to
pub const GROUPING_TAG: &str = "template";

/// Outcome of applying extensions to an ancestor tree
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Points whose content was replaced
    pub filled: Vec<String>,
    /// Points left with their fallback content
    pub open: Vec<String>,
    /// Extensions that matched no point, by the point they named
    pub unused: Vec<String>,
}

/// Gather the extensions a deriving document declares, in document order
///
/// Extensions are the `extension` children of `extensions` containers found
/// at the top level of the document's template, then of top-level
/// `extensions` custom blocks.
pub fn collect_extensions(
    document: &Document,
    template: &[Node],
    options: &ResolverOptions,
) -> Result<Vec<Element>, MarkupParseError> {
    let mut extensions: Vec<Element> = template
        .iter()
        .filter_map(Node::as_element)
        .filter(|el| el.is_named(&options.extensions_tag))
        .flat_map(|container| extensions_in(&container.children, options))
        .collect();

    for block in document.extension_blocks(options) {
        let nodes = parse_tree(&block.content).map_err(|e| e.shifted(block.span.start))?;
        extensions.extend(extensions_in(&nodes, options));
    }

    Ok(extensions)
}

fn extensions_in<'n>(
    nodes: &'n [Node],
    options: &'n ResolverOptions,
) -> impl Iterator<Item = Element> + 'n {
    nodes
        .iter()
        .filter_map(Node::as_element)
        .filter(|el| el.is_named(&options.extension_tag))
        .cloned()
}

/// Fill the extension points of `base` from `extensions`
///
/// Each point takes the children of the first extension naming it, then
/// becomes a plain grouping element. Content inserted this way is not
/// searched again, so points it declares stay open for later levels. A point
/// with no extension keeps its fallback children and stays an open point.
pub fn apply_extensions(
    base: &mut [Node],
    extensions: &[Element],
    options: &ResolverOptions,
) -> MergeReport {
    let mut report = MergeReport::default();
    let mut used = vec![false; extensions.len()];

    walk_elements_mut(base, &mut |point| {
        if !point.is_named(&options.ext_point_tag) {
            return Walk::Descend;
        }
        // A point without a name cannot be addressed by any extension
        let name = point.attr(&options.ext_point_name_attr).map(str::to_string);
        let matched = name.as_deref().and_then(|name| {
            extensions
                .iter()
                .position(|ext| ext.attr(&options.ext_point_ref_attr) == Some(name))
        });
        let name = name.unwrap_or_default();

        match matched {
            Some(index) => {
                trace!(point = %name, "filling extension point");
                used[index] = true;
                point.children = extensions[index].children.clone();
                point.rename(GROUPING_TAG);
                point.remove_attr(&options.ext_point_name_attr);
                report.filled.push(name);
                Walk::Skip
            }
            None => {
                trace!(point = %name, "extension point keeps its fallback");
                report.open.push(name);
                Walk::Descend
            }
        }
    });

    report.unused = extensions
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(ext, _)| {
            ext.attr(&options.ext_point_ref_attr)
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    report
}

/// Names used by more than one extension point in `tree`
fn duplicate_point_names(tree: &[Node], options: &ResolverOptions) -> Vec<String> {
    let mut seen: Vec<&str> = Vec::new();
    let mut duplicates = Vec::new();
    for point in find_by_tag(tree, &options.ext_point_tag) {
        let Some(name) = point.attr(&options.ext_point_name_attr) else {
            continue;
        };
        if seen.contains(&name) {
            if !duplicates.iter().any(|d: &String| d == name) {
                duplicates.push(name.to_string());
            }
        } else {
            seen.push(name);
        }
    }
    duplicates
}

/// Merge a deriving document into its resolved ancestor's source
///
/// The result is a complete document: the ancestor's template with its
/// points filled, marked extendable, followed by the deriving document's
/// script, styles and custom blocks.
pub fn merge_level(
    ancestor_source: &str,
    current: &Document,
    options: &ResolverOptions,
) -> Result<String, ResolveError> {
    let ancestor = crate::document::split(ancestor_source)?;
    let mut base = parse_tree(&ancestor.template.content)
        .map_err(|e| e.shifted(ancestor.template.span.start))?;
    let derived = parse_tree(&current.template.content)
        .map_err(|e| e.shifted(current.template.span.start))?;

    for name in duplicate_point_names(&base, options) {
        warn!(point = %name, "several extension points share a name; each takes the same extension");
    }

    let extensions = collect_extensions(current, &derived, options)?;
    let report = apply_extensions(&mut base, &extensions, options);
    debug!(
        filled = report.filled.len(),
        open = report.open.len(),
        "merged extensions into ancestor"
    );
    for point in &report.unused {
        debug!(point = %point, "dropping extension with no matching extension point");
    }

    let mut attrs = Attributes::new();
    attrs.insert(options.extendable_attr.clone(), None);
    let template = Block::new("template", attrs, serialize(&base));

    Ok(compose(&template, current.output_blocks(options)))
}
