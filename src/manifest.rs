//! Component manifests
//!
//! A manifest lists the component definitions a page uses and the instances
//! to mount, each with its own model values:
//!
//! ```toml
//! base_dir = "components"
//!
//! [components.todoList]
//! source = "todo-list.html"
//!
//! [[mount]]
//! component = "todoList"
//! args = [1, 2]
//!
//! [mount.model]
//! first = "milk"
//! count = 2
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::render::Value;

/// Errors that can occur when loading or parsing manifests
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse manifest TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("mount references undeclared component: {0}")]
    UndeclaredComponent(String),
}

/// Where a component's template comes from
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentEntry {
    /// Template path, relative to the manifest's base directory
    pub source: String,
}

/// One instance to create
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MountEntry {
    pub component: String,
    /// Forwarded positionally to the component's behavior
    #[serde(default)]
    pub args: Vec<Value>,
    /// Initial model values
    #[serde(default)]
    pub model: BTreeMap<String, Value>,
}

/// A parsed manifest
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Manifest {
    /// Directory templates are resolved against
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentEntry>,
    #[serde(default, rename = "mount")]
    pub mounts: Vec<MountEntry>,
}

impl Manifest {
    /// Load a manifest from a TOML file
    ///
    /// A relative `base_dir` is resolved against the file's directory; a
    /// missing one defaults to that directory.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        let mut manifest = Self::from_str(&content)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.base_dir = Some(match manifest.base_dir.take() {
            Some(base) if base.is_relative() => dir.join(base),
            Some(base) => base,
            None => dir.to_path_buf(),
        });
        Ok(manifest)
    }

    /// Load a manifest from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Every mount must name a declared component
    fn validate(&self) -> Result<(), ManifestError> {
        for mount in &self.mounts {
            if !self.components.contains_key(&mount.component) {
                return Err(ManifestError::UndeclaredComponent(mount.component.clone()));
            }
        }
        Ok(())
    }
}
