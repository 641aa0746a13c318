//! Error types for inheritance resolution

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::error::MarkupParseError;

/// Errors that abort the resolution of a document
#[derive(Debug, Error)]
pub enum ResolveError {
    /// An ancestor named by `extends` could not be read
    #[error("failed to read ancestor '{}': {source}", path.display())]
    AncestorRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A document in the chain has no usable block structure
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] DocumentError),

    /// A template in the chain could not be parsed into a tree
    #[error("markup parse error: {0}")]
    MarkupParse(#[from] MarkupParseError),

    /// The resolver options are invalid
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// The chain of `extends` attributes leads back to a document already in it
    #[error("inheritance cycle: {}", format_chain(.chain))]
    InheritanceCycle { chain: Vec<PathBuf> },

    /// A document or markup error found in an ancestor file; spans in
    /// `source` point into that file
    #[error("in ancestor '{}': {source}", path.display())]
    InAncestor {
        path: PathBuf,
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// The markup error behind this error, if there is one
    pub fn markup_error(&self) -> Option<&MarkupParseError> {
        match self {
            ResolveError::MarkupParse(err)
            | ResolveError::MalformedDocument(DocumentError::Markup(err)) => Some(err),
            ResolveError::InAncestor { source, .. } => source.markup_error(),
            _ => None,
        }
    }

    /// The ancestor file this error was found in, or `None` when it belongs
    /// to the document being transformed
    pub fn ancestor_path(&self) -> Option<&Path> {
        match self {
            ResolveError::InAncestor { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Attribute this error to the file `origin`, if the document came from one
    pub(crate) fn in_file(self, origin: Option<&Path>) -> Self {
        match origin {
            Some(path) => ResolveError::InAncestor {
                path: path.to_path_buf(),
                source: Box::new(self),
            },
            None => self,
        }
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
