//! Template inheritance resolution
//!
//! A document whose template carries `extends="<path>"` is resolved against
//! that ancestor. The ancestor is resolved first, recursively, so chains of
//! any depth flatten into one document:
//!
//! ```text
//! Page.vue  --extends-->  Layout.vue  --extends-->  Base.vue
//!
//! resolve(Page)
//!   read Layout, resolve(Layout)
//!     read Base, resolve(Base) = Base          (no extends)
//!     merge Layout into Base   -> Layout'
//!   merge Page into Layout'    -> Page'
//! ```
//!
//! Each merge fills the ancestor's extension points from the deriving
//! document's extensions and keeps the deriving document's script, styles
//! and custom blocks.

mod error;
mod host;
mod merge;

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use tracing::debug;

use crate::config::ResolverOptions;
use crate::document::split;

pub use error::ResolveError;
pub use host::{normalize, FsHost, Host, MemoryHost};
pub use merge::{apply_extensions, collect_extensions, merge_level, MergeReport, GROUPING_TAG};

/// Resolve the inheritance chain of `source`, a document living in `dir`
///
/// Returns `source` unchanged when it extends nothing. Otherwise returns the
/// merged document, with every ancestor registered as a dependency on `host`.
pub async fn resolve<H: Host + Sync>(
    source: &str,
    dir: &Path,
    host: &H,
    options: &ResolverOptions,
) -> Result<String, ResolveError> {
    options.validate()?;
    resolve_level(source.to_string(), dir.to_path_buf(), None, host, options, Vec::new()).await
}

/// One step of the chain. `origin` is the file `source` was read from, or
/// `None` for the document the caller handed in.
fn resolve_level<'a, H: Host + Sync>(
    source: String,
    dir: PathBuf,
    origin: Option<PathBuf>,
    host: &'a H,
    options: &'a ResolverOptions,
    mut chain: Vec<PathBuf>,
) -> BoxFuture<'a, Result<String, ResolveError>> {
    Box::pin(async move {
        let current =
            split(&source).map_err(|e| ResolveError::from(e).in_file(origin.as_deref()))?;
        let Some(request) = current.extends(options) else {
            return Ok(source);
        };

        let path = host.resolve_path(&dir, request);
        if chain.contains(&path) {
            chain.push(path);
            return Err(ResolveError::InheritanceCycle { chain });
        }

        debug!(ancestor = %path.display(), "resolving ancestor");
        host.add_dependency(&path);
        let ancestor_source = host
            .read_to_string(&path)
            .await
            .map_err(|source| ResolveError::AncestorRead {
                path: path.clone(),
                source,
            })?;

        let ancestor_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        chain.push(path.clone());
        let resolved =
            resolve_level(ancestor_source, ancestor_dir, Some(path), host, options, chain).await?;

        merge_level(&resolved, &current, options).map_err(|e| e.in_file(origin.as_deref()))
    })
}
