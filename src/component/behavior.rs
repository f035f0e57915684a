//! Instance behaviors
//!
//! Every instance is driven by a [`Behavior`]: something that owns the
//! mounted [`View`], can render it, and signals when its own setup is done.
//! Components without custom behavior get the generic [`Component`]
//! wrapper; a definition can instead carry a [`BehaviorConstructor`] that
//! receives the view together with the arguments passed to `instance`.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::error::ComponentError;
use crate::render::{Binding, Model, RenderOutcome, Value, View};

/// Capability every instance exposes to the framework
pub trait Behavior: Any {
    fn view(&self) -> &View;

    fn view_mut(&mut self) -> &mut View;

    /// Resolves once this instance has finished its own setup
    ///
    /// Called after the first render. The future must not borrow the
    /// behavior; clone whatever state it needs.
    fn initialized(&self) -> LocalBoxFuture<'static, Result<(), ComponentError>> {
        future::ready(Ok(())).boxed_local()
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn model(&self) -> &Model {
        self.view().model()
    }

    fn model_mut(&mut self) -> &mut Model {
        self.view_mut().model_mut()
    }

    fn set(&mut self, key: &str, binding: Binding) {
        self.view_mut().set(key, binding);
    }

    fn render(&mut self) -> RenderOutcome {
        self.view_mut().render()
    }
}

/// Display name of the generic wrapper
pub const GENERIC_CLASSNAME: &str = "Component";

/// The default behavior: a view and nothing else
pub struct Component {
    view: View,
}

impl Component {
    pub fn new(view: View) -> Self {
        Self { view }
    }
}

impl Behavior for Component {
    fn view(&self) -> &View {
        &self.view
    }

    fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type Factory = dyn Fn(View, &[Value]) -> Box<dyn Behavior>;

/// Builds a custom behavior from a mounted view and `instance` arguments
#[derive(Clone)]
pub struct BehaviorConstructor {
    classname: String,
    factory: Rc<Factory>,
}

impl BehaviorConstructor {
    pub fn new<F, B>(classname: impl Into<String>, factory: F) -> Self
    where
        F: Fn(View, &[Value]) -> B + 'static,
        B: Behavior,
    {
        Self {
            classname: classname.into(),
            factory: Rc::new(move |view, args| Box::new(factory(view, args)) as Box<dyn Behavior>),
        }
    }

    pub fn classname(&self) -> &str {
        &self.classname
    }

    pub fn construct(&self, view: View, args: &[Value]) -> Box<dyn Behavior> {
        (self.factory)(view, args)
    }
}

impl fmt::Debug for BehaviorConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorConstructor")
            .field("classname", &self.classname)
            .finish_non_exhaustive()
    }
}
