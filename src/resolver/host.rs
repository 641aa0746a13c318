//! The build host the resolver reads ancestors through

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

/// Services the resolver needs from the surrounding build
///
/// Reading an ancestor is the only asynchronous step of a resolution. Hosts
/// are shared by reference across resolutions, which may run on different
/// threads.
pub trait Host {
    /// Resolve `request`, as written in an `extends` attribute, against the
    /// directory of the document that contains it
    fn resolve_path(&self, dir: &Path, request: &str) -> PathBuf {
        normalize(&dir.join(request))
    }

    /// Record that the document being built depends on `path`
    fn add_dependency(&self, path: &Path);

    /// Read a UTF-8 source file
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;
}

/// Lexically remove `.` and `..` components
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Host backed by the local filesystem
///
/// Keeps every registered dependency so callers can hand them to a file
/// watcher after the build.
#[derive(Debug, Default)]
pub struct FsHost {
    dependencies: Mutex<Vec<PathBuf>>,
}

impl FsHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dependencies registered so far, in registration order
    pub fn dependencies(&self) -> Vec<PathBuf> {
        self.dependencies
            .lock()
            .map(|deps| deps.clone())
            .unwrap_or_default()
    }
}

impl Host for FsHost {
    fn add_dependency(&self, path: &Path) {
        if let Ok(mut deps) = self.dependencies.lock() {
            deps.push(path.to_path_buf());
        }
    }

    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send {
        tokio::fs::read_to_string(path.to_path_buf())
    }
}

/// Host serving sources from memory, for hosts with virtual file systems
#[derive(Debug, Default)]
pub struct MemoryHost {
    files: HashMap<PathBuf, String>,
    dependencies: Mutex<Vec<PathBuf>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.files.insert(normalize(&path.into()), source.into());
        self
    }

    pub fn dependencies(&self) -> Vec<PathBuf> {
        self.dependencies
            .lock()
            .map(|deps| deps.clone())
            .unwrap_or_default()
    }
}

impl Host for MemoryHost {
    fn add_dependency(&self, path: &Path) {
        if let Ok(mut deps) = self.dependencies.lock() {
            deps.push(path.to_path_buf());
        }
    }

    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send {
        let result = self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        });
        std::future::ready(result)
    }
}
