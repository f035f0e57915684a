//! fragment-kit - A lightweight component framework for markup fragments
//!
//! Components are named templates loaded from external sources. Each
//! instance becomes a custom tagged element in a document and re-renders
//! from its model, rewriting only the binding locations whose value changed.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use fragment_kit::{Binding, Document, Framework, MemoryFetcher, SharedDom};
//! use futures::executor::block_on;
//!
//! let doc = Rc::new(RefCell::new(Document::new()));
//! let shared: SharedDom = doc.clone();
//! let fetcher = MemoryFetcher::new().with_file("todo.html", "<li>{{ item }}</li>");
//! let framework = Framework::new(shared, fetcher);
//!
//! let body = doc.borrow().body();
//! let todo = block_on(framework.mount(body, "todoItem", "todo.html", Vec::new())).unwrap();
//! todo.set("item", Binding::computed(|| "buy milk"));
//! todo.render();
//!
//! assert_eq!(doc.borrow().text_content(todo.element()), "buy milk");
//! ```

pub mod component;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod naming;
pub mod render;
pub mod template;

use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;
use thiserror::Error;
use tracing::info;

pub use component::{
    Behavior, BehaviorConstructor, Component, ComponentDefinition, ComponentId, Framework,
    FrameworkConfig, Instance, InstanceId,
};
pub use dom::{Document, Dom, DomError, NodeId, SharedDom};
pub use error::{ComponentError, ParseError};
pub use fetch::{Fetch, FetchError, FsFetcher, MemoryFetcher};
pub use manifest::{Manifest, ManifestError};
pub use naming::to_element_name;
pub use render::{Binding, BindingError, Model, RenderOutcome, Value, View};

/// Errors that can occur while rendering a manifest
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error loading the manifest
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Error loading or instancing a component
    #[error("component error: {0}")]
    Component(#[from] ComponentError),
}

/// Render every mount of a manifest into a fresh document
///
/// Returns the HTML of the document body's children. Templates are read
/// from the manifest's `base_dir` (or the working directory).
pub fn render_manifest(manifest: &Manifest) -> Result<String, RenderError> {
    render_manifest_with_config(manifest, FrameworkConfig::default())
}

/// Render a manifest with a custom framework configuration
pub fn render_manifest_with_config(
    manifest: &Manifest,
    config: FrameworkConfig,
) -> Result<String, RenderError> {
    let fetcher = match &manifest.base_dir {
        Some(base) => FsFetcher::with_base_path(base),
        None => FsFetcher::new(),
    };
    let doc = Rc::new(RefCell::new(Document::new()));
    let shared: SharedDom = doc.clone();
    let framework = Framework::new(shared, fetcher).with_config(config);
    let body = doc.borrow().body();

    let sources: Vec<(&str, &str)> = manifest
        .components
        .iter()
        .map(|(name, entry)| (name.as_str(), entry.source.as_str()))
        .collect();
    block_on(framework.initialize_all(&sources))?;

    for mount in &manifest.mounts {
        let instance = block_on(framework.instance(body, &mount.component, mount.args.clone()))?;
        for (key, value) in &mount.model {
            instance.set(key, value.clone());
        }
        instance.render();
    }

    info!(
        components = framework.num_components(),
        instances = framework.instance_count(),
        "manifest rendered"
    );

    let html = doc.borrow().inner_html(body);
    Ok(html)
}
