//! sfc-inherit - template inheritance for single-file components
//!
//! A component can declare that it extends another one. The ancestor's
//! template marks named extension points, and the descendant supplies
//! extensions for some of them:
//!
//! ```text
//! <!-- Base.vue -->
//! <template>
//!   <main>
//!     <extension-point name="body"><p>Nothing here yet</p></extension-point>
//!   </main>
//! </template>
//!
//! <!-- Page.vue -->
//! <template extends="./Base.vue">
//!   <extensions>
//!     <extension point="body"><p>Welcome</p></extension>
//!   </extensions>
//! </template>
//! ```
//!
//! Transforming `Page.vue` yields Base's template with the body point filled
//! in, followed by Page's own script, styles and custom blocks.
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use sfc_inherit::{transform, MemoryHost, ResolverOptions};
//!
//! let host = MemoryHost::new().with_file(
//!     "/app/Base.vue",
//!     r#"<template><extension-point name="body">Fallback</extension-point></template>"#,
//! );
//! let page = r#"<template extends="./Base.vue">
//!   <extensions><extension point="body">Welcome</extension></extensions>
//! </template>"#;
//!
//! let out = futures::executor::block_on(transform(
//!     page,
//!     Path::new("/app"),
//!     &host,
//!     &ResolverOptions::default(),
//! ))
//! .unwrap();
//! assert_eq!(out, "<template><template>Welcome</template></template>\n");
//! ```

pub mod assemble;
pub mod config;
pub mod document;
pub mod error;
pub mod markup;
pub mod resolver;

use std::path::Path;

pub use assemble::assemble;
pub use config::{ConfigError, ResolverOptions};
pub use document::{split, Block, Document, DocumentError};
pub use error::MarkupParseError;
pub use markup::{find_by_tag, parse_tree, serialize, Element, Node};
pub use resolver::{resolve, FsHost, Host, MemoryHost, ResolveError};

/// Output of a transform with the source map handed through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed<M> {
    pub code: String,
    /// The caller's source map, unchanged
    pub map: M,
}

/// Resolve the inheritance chain of a component and assemble the final source
///
/// `dir` is the directory of the component; `extends` paths are resolved
/// against it through `host`.
pub async fn transform<H: Host + Sync>(
    source: &str,
    dir: &Path,
    host: &H,
    options: &ResolverOptions,
) -> Result<String, ResolveError> {
    let merged = resolve(source, dir, host, options).await?;
    assemble(&merged, options)
}

/// Like [`transform`], passing a source map through untouched
pub async fn transform_with_map<H: Host + Sync, M>(
    source: &str,
    map: M,
    dir: &Path,
    host: &H,
    options: &ResolverOptions,
) -> Result<Transformed<M>, ResolveError> {
    let code = transform(source, dir, host, options).await?;
    Ok(Transformed { code, map })
}
