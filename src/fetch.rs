//! Template transport
//!
//! Definitions are loaded through the [`Fetch`] capability so the framework
//! does not care whether templates come from disk, memory or a network.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};
use thiserror::Error;

/// Errors that can occur while fetching template text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Nothing exists at the requested path
    #[error("template source not found: {path}")]
    NotFound { path: String },

    /// The source exists but could not be read
    #[error("error reading template source {path}: {message}")]
    Io { path: String, message: String },
}

/// Fetch template content by path
pub trait Fetch {
    /// Start fetching `path`; the returned future yields the text
    fn fetch_text(&self, path: &str) -> LocalBoxFuture<'static, Result<String, FetchError>>;
}

/// Reads UTF-8 template files from the filesystem
#[derive(Debug, Clone, Default)]
pub struct FsFetcher {
    /// Base path for resolving relative paths
    base_path: Option<PathBuf>,
}

impl FsFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
        }
    }

    /// Resolve a relative path against the base path
    pub fn resolve_path(&self, relative: &str) -> PathBuf {
        match &self.base_path {
            Some(base) => base.join(relative),
            None => PathBuf::from(relative),
        }
    }
}

impl Fetch for FsFetcher {
    fn fetch_text(&self, path: &str) -> LocalBoxFuture<'static, Result<String, FetchError>> {
        let full_path = self.resolve_path(path);
        let path = path.to_string();
        async move { read_file(&full_path, path) }.boxed_local()
    }
}

fn read_file(full_path: &Path, path: String) -> Result<String, FetchError> {
    std::fs::read_to_string(full_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FetchError::NotFound { path },
        _ => FetchError::Io {
            path,
            message: e.to_string(),
        },
    })
}

/// Serves templates from an in-memory table
///
/// Clones share the same table and fetch counter, so a test can keep one
/// handle while the framework owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: Rc<RefCell<HashMap<String, String>>>,
    fetches: Rc<Cell<usize>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template
    pub fn insert(&self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), contents.into());
    }

    /// Builder form of [`MemoryFetcher::insert`]
    pub fn with_file(self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Forget a template so later fetches of it fail
    pub fn remove(&self, path: &str) {
        self.files.borrow_mut().remove(path);
    }

    /// Number of fetches issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl Fetch for MemoryFetcher {
    fn fetch_text(&self, path: &str) -> LocalBoxFuture<'static, Result<String, FetchError>> {
        self.fetches.set(self.fetches.get() + 1);
        let result = self
            .files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                path: path.to_string(),
            });
        future::ready(result).boxed_local()
    }
}
