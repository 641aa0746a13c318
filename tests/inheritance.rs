//! Integration tests for template inheritance across files on disk

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use sfc_inherit::{
    assemble, resolve, split, transform, FsHost, ResolveError, ResolverOptions,
};

const BASE: &str = r#"<template>
  <div class="layout">
    <header><extension-point name="header"><h1>Site</h1></extension-point></header>
    <main><extension-point name="A">F</extension-point></main>
    <footer><extension-point name="footer">(c) Site</extension-point></footer>
  </div>
</template>

<script>
export default { name: 'Base' }
</script>
"#;

/// Write `files` (relative path, content) into a fresh temporary directory
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(full, content).expect("write fixture");
    }
    dir
}

async fn transform_file(dir: &Path, file: &str) -> (Result<String, ResolveError>, Vec<PathBuf>) {
    let path = dir.join(file);
    let source = fs::read_to_string(&path).expect("read component");
    let host = FsHost::new();
    let parent = path.parent().expect("component has a directory");
    let result = transform(&source, parent, &host, &ResolverOptions::default()).await;
    (result, host.dependencies())
}

#[tokio::test]
async fn test_root_document_round_trips() {
    let dir = project(&[("Base.vue", BASE)]);
    let (result, deps) = transform_file(dir.path(), "Base.vue").await;
    let expected = assemble(BASE, &ResolverOptions::default()).unwrap();
    assert_eq!(result.unwrap(), expected);
    assert_eq!(expected, BASE);
    assert!(deps.is_empty());
}

#[tokio::test]
async fn test_single_level_override() {
    let child = r#"<template extends="./Base.vue">
  <extensions>
    <extension point="A"><p>C</p></extension>
  </extensions>
</template>

<script>
export default { name: 'Child' }
</script>
"#;
    let dir = project(&[("Base.vue", BASE), ("Child.vue", child)]);
    let (result, deps) = transform_file(dir.path(), "Child.vue").await;
    let out = result.unwrap();

    assert!(out.contains("<main><template><p>C</p></template></main>"));
    assert!(!out.contains(">F<"));
    assert!(out.contains("export default { name: 'Child' }"));
    assert!(!out.contains("name: 'Base'"));
    assert_eq!(deps, vec![dir.path().join("Base.vue")]);
}

#[tokio::test]
async fn test_fallback_preserved() {
    let child = r#"<template extends="./Base.vue"><extensions></extensions></template>"#;
    let dir = project(&[("Base.vue", BASE), ("Child.vue", child)]);
    let (result, _) = transform_file(dir.path(), "Child.vue").await;
    let out = result.unwrap();

    assert!(out.contains("<main><template>F</template></main>"));
    assert!(out.contains("<header><template><h1>Site</h1></template></header>"));
    assert!(!out.contains("extension-point"));
}

#[tokio::test]
async fn test_three_level_chain() {
    let middle = r#"<template extends="../Base.vue">
  <extensions>
    <extension point="header"><h1>Section</h1></extension>
  </extensions>
</template>
"#;
    let page = r#"<template extends="../layouts/Section.vue">
  <extensions>
    <extension point="A"><article>Grandchild body</article></extension>
  </extensions>
</template>
"#;
    let dir = project(&[
        ("Base.vue", BASE),
        ("layouts/Section.vue", middle),
        ("pages/Page.vue", page),
    ]);
    let (result, deps) = transform_file(dir.path(), "pages/Page.vue").await;
    let out = result.unwrap();

    assert_eq!(
        out,
        r#"<template>
  <div class="layout">
    <header><template><h1>Section</h1></template></header>
    <main><template><article>Grandchild body</article></template></main>
    <footer><template>(c) Site</template></footer>
  </div>
</template>
"#
    );
    assert_eq!(
        deps,
        vec![
            dir.path().join("layouts/Section.vue"),
            dir.path().join("Base.vue")
        ]
    );
}

#[tokio::test]
async fn test_intermediate_level_can_declare_new_points() {
    let middle = r#"<template extends="./Base.vue">
  <extensions>
    <extension point="A"><section><extension-point name="content">Section default</extension-point></section></extension>
  </extensions>
</template>
"#;
    let page = r#"<template extends="./Middle.vue">
  <extensions>
    <extension point="content">Page content</extension>
  </extensions>
</template>
"#;
    let dir = project(&[("Base.vue", BASE), ("Middle.vue", middle), ("Page.vue", page)]);
    let (result, _) = transform_file(dir.path(), "Page.vue").await;
    let out = result.unwrap();

    assert!(out.contains("<main><template><section><template>Page content</template></section></template></main>"));
    assert!(!out.contains("Section default"));
}

#[tokio::test]
async fn test_unmatched_extension_dropped() {
    let child = r#"<template extends="./Base.vue">
  <extensions>
    <extension point="nowhere"><p>Orphan</p></extension>
  </extensions>
</template>
"#;
    let dir = project(&[("Base.vue", BASE), ("Child.vue", child)]);
    let (result, _) = transform_file(dir.path(), "Child.vue").await;
    let out = result.unwrap();

    assert!(!out.contains("Orphan"));
    assert!(!out.contains("nowhere"));
    assert!(out.contains("<main><template>F</template></main>"));
}

#[tokio::test]
async fn test_extendable_document_shows_fallback() {
    let base = r#"<template extendable>
  <nav><extension-point name="links" class="links"><a href="/">Home</a></extension-point></nav>
</template>
"#;
    let dir = project(&[("Nav.vue", base)]);
    let (result, _) = transform_file(dir.path(), "Nav.vue").await;
    let out = result.unwrap();

    assert_eq!(
        out,
        "<template>\n  <nav><template class=\"links\"><a href=\"/\">Home</a></template></nav>\n</template>\n"
    );
}

#[tokio::test]
async fn test_script_comment_lines_stripped() {
    let child = "<template extends=\"./Base.vue\"></template>\n<script>//\n//\nexport default {}\n// trailing\n</script>\n";
    let dir = project(&[("Base.vue", BASE), ("Child.vue", child)]);
    let (result, _) = transform_file(dir.path(), "Child.vue").await;
    let out = result.unwrap();

    let script = split(&out).unwrap().script.unwrap();
    assert_eq!(script.content, "export default {}\n// trailing\n");
}

#[tokio::test]
async fn test_missing_ancestor_fails() {
    let child = r#"<template extends="./Missing.vue"><p/></template>"#;
    let dir = project(&[("Child.vue", child)]);
    let (result, deps) = transform_file(dir.path(), "Child.vue").await;

    match result {
        Err(ResolveError::AncestorRead { path, .. }) => {
            assert_eq!(path, dir.path().join("Missing.vue"));
        }
        other => panic!("expected AncestorRead, got {:?}", other),
    }
    assert_eq!(deps, vec![dir.path().join("Missing.vue")]);
}

#[tokio::test]
async fn test_missing_ancestor_deep_in_chain_fails() {
    let middle = r#"<template extends="./Gone.vue"></template>"#;
    let child = r#"<template extends="./Middle.vue"></template>"#;
    let dir = project(&[("Middle.vue", middle), ("Child.vue", child)]);
    let (result, _) = transform_file(dir.path(), "Child.vue").await;
    assert!(matches!(result, Err(ResolveError::AncestorRead { .. })));
}

#[tokio::test]
async fn test_markup_error_in_ancestor_propagates() {
    let base = "<template><div><p class=\"x\"y\"z\">bad</p></div></template>";
    let child = r#"<template extends="./Base.vue"></template>"#;
    let dir = project(&[("Base.vue", base), ("Child.vue", child)]);
    let (result, _) = transform_file(dir.path(), "Child.vue").await;
    let err = result.unwrap_err();

    let base_path = dir.path().join("Base.vue");
    assert_eq!(err.ancestor_path(), Some(base_path.as_path()));
    let markup = err.markup_error().expect("markup error");
    assert_eq!(&base[markup.span().clone()], "\"");

    let report = markup.format(base, &base_path.display().to_string());
    assert!(report.contains("Base.vue"));
    assert!(!report.contains("Child.vue"));
}

#[tokio::test]
async fn test_custom_blocks_forwarded_and_extension_blocks_dropped() {
    let child = r#"<template extends="./Base.vue"></template>

<extensions>
  <extension point="A">From block</extension>
</extensions>

<docs>Child docs</docs>

<style scoped>
main { color: red; }
</style>
"#;
    let dir = project(&[("Base.vue", BASE), ("Child.vue", child)]);
    let (result, _) = transform_file(dir.path(), "Child.vue").await;
    let out = result.unwrap();

    let doc = split(&out).unwrap();
    assert!(doc.template.content.contains("<main><template>From block</template></main>"));
    let kinds: Vec<_> = doc.custom_blocks.iter().map(|b| b.kind.as_str()).collect();
    assert_eq!(kinds, vec!["docs"]);
    assert_eq!(doc.styles.len(), 1);
    assert!(doc.styles[0].attrs.contains("scoped"));
    assert!(doc.script.is_none());
}

#[tokio::test]
async fn test_resolve_output_keeps_open_points_for_descendants() {
    let child = r#"<template extends="./Base.vue">
  <extensions><extension point="header">H</extension></extensions>
</template>"#;
    let dir = project(&[("Base.vue", BASE), ("Child.vue", child)]);
    let host = FsHost::new();
    let merged = resolve(child, dir.path(), &host, &ResolverOptions::default())
        .await
        .unwrap();

    let doc = split(&merged).unwrap();
    assert!(doc.template.attrs.contains("extendable"));
    assert!(doc.template.content.contains(r#"<extension-point name="A">F</extension-point>"#));
    assert!(doc.template.content.contains("<header><template>H</template></header>"));
}

#[tokio::test]
async fn test_custom_options_from_file() {
    let options_toml = r#"
ext-point-tag = "slot-point"
extensions-tag = "overrides"
extension-tag = "override"
extends-attr = "inherits"
"#;
    let base = r#"<template><slot-point name="body">Default</slot-point></template>"#;
    let child = r#"<template inherits="./Base.vue"><overrides><override point="body">Custom</override></overrides></template>"#;
    let dir = project(&[
        ("Base.vue", base),
        ("Child.vue", child),
        ("options.toml", options_toml),
    ]);
    let options = ResolverOptions::from_file(&dir.path().join("options.toml")).unwrap();
    let host = FsHost::new();
    let out = transform(child, dir.path(), &host, &options).await.unwrap();
    assert_eq!(out, "<template><template>Custom</template></template>\n");
}

#[tokio::test]
async fn test_independent_resolutions_run_concurrently() {
    let first = r#"<template extends="./Base.vue"><extensions><extension point="A">one</extension></extensions></template>"#;
    let second = r#"<template extends="./Base.vue"><extensions><extension point="A">two</extension></extensions></template>"#;
    let dir = project(&[("Base.vue", BASE)]);
    let host = FsHost::new();
    let options = ResolverOptions::default();

    let (a, b) = tokio::join!(
        transform(first, dir.path(), &host, &options),
        transform(second, dir.path(), &host, &options)
    );
    assert!(a.unwrap().contains("<main><template>one</template></main>"));
    assert!(b.unwrap().contains("<main><template>two</template></main>"));
    assert_eq!(host.dependencies().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_transforms_spawned_on_worker_threads() {
    let dir = project(&[("Base.vue", BASE)]);
    let host = Arc::new(FsHost::new());

    let handles: Vec<_> = ["one", "two"]
        .into_iter()
        .map(|body| {
            let host = Arc::clone(&host);
            let dir = dir.path().to_path_buf();
            let child = format!(
                r#"<template extends="./Base.vue"><extensions><extension point="A">{}</extension></extensions></template>"#,
                body
            );
            tokio::spawn(async move {
                transform(&child, &dir, host.as_ref(), &ResolverOptions::default()).await
            })
        })
        .collect();

    let mut outputs = Vec::new();
    for handle in handles {
        outputs.push(handle.await.expect("task panicked").unwrap());
    }
    assert!(outputs[0].contains("<main><template>one</template></main>"));
    assert!(outputs[1].contains("<main><template>two</template></main>"));
    assert_eq!(host.dependencies().len(), 2);
}
