//! Binding and render engine

mod model;
mod view;

pub use model::{Binding, BindingError, Model, Value};
pub use view::{RenderOutcome, View};
