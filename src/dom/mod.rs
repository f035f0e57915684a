//! Host document abstraction
//!
//! The framework never owns the document it renders into. Everything it
//! needs is expressed through the [`Dom`] trait: creating nodes, linking
//! them into the tree, setting attributes and replacing text. [`Document`]
//! is an in-memory implementation used by the CLI and the tests.

mod document;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

pub use document::Document;

/// Handle to a node owned by a [`Dom`] implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised by tree mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0} is not a text node")]
    NotAText(NodeId),
}

/// Tree-mutation capability consumed by the framework
pub trait Dom {
    /// Create a detached element with the given tag name
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Create a detached text node
    fn create_text(&mut self, text: &str) -> NodeId;

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached somewhere else
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError>;

    /// Set (or overwrite) an attribute on an element
    fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<(), DomError>;

    /// Replace the data of a text node
    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError>;

    /// Unlink a node from its parent
    fn detach(&mut self, node: NodeId) -> Result<(), DomError>;
}

/// Document handle shared between the framework and every live view
pub type SharedDom = Rc<RefCell<dyn Dom>>;
