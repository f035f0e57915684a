//! Model values and bindings

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;

/// A literal value displayed at a binding location
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            // Integral floats display like integers: 3.0 -> "3"
            Value::Float(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A computed binding failed to produce a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BindingError {
    message: String,
}

impl BindingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

type ComputeFn = dyn Fn() -> Result<Value, BindingError>;

/// What a model key is bound to
#[derive(Clone)]
pub enum Binding {
    /// A fixed value
    Literal(Value),
    /// A closure evaluated on every render
    Computed(Rc<ComputeFn>),
}

impl Binding {
    /// Bind to an infallible closure
    ///
    /// A panic inside the closure is not caught and unwinds out of the
    /// render. Closures that can fail should use [`Binding::fallible`].
    pub fn computed<F, V>(f: F) -> Self
    where
        F: Fn() -> V + 'static,
        V: Into<Value>,
    {
        Binding::Computed(Rc::new(move || Ok(f().into())))
    }

    /// Bind to a closure that may fail
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, BindingError> + 'static,
    {
        Binding::Computed(Rc::new(f))
    }

    /// Produce the value this binding currently stands for
    pub fn resolve(&self) -> Result<Value, BindingError> {
        match self {
            Binding::Literal(value) => Ok(value.clone()),
            Binding::Computed(f) => f(),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Binding::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

macro_rules! literal_binding_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Binding {
                fn from(value: $ty) -> Self {
                    Binding::Literal(value.into())
                }
            }
        )*
    };
}

literal_binding_from!(Value, &str, String, i64, i32, u32, f64, bool);

/// Per-instance data read by template bindings
#[derive(Debug, Clone, Default)]
pub struct Model {
    entries: BTreeMap<String, Binding>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key`, replacing any previous binding
    pub fn set(&mut self, key: impl Into<String>, binding: impl Into<Binding>) {
        self.entries.insert(key.into(), binding.into());
    }

    pub fn get(&self, key: &str) -> Option<&Binding> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Binding> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Text shown for `key`; unbound keys display as empty
    pub fn resolve_binding(&self, key: &str) -> Result<String, BindingError> {
        match self.entries.get(key) {
            Some(binding) => binding.resolve().map(|v| v.to_string()),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("yogurt").to_string(), "yogurt");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(true).to_string(), "true");
    }

    #[test]
    fn test_unbound_key_is_empty() {
        let model = Model::new();
        assert_eq!(model.resolve_binding("missing"), Ok(String::new()));
    }

    #[test]
    fn test_computed_is_reevaluated() {
        let food = Rc::new(RefCell::new("granola".to_string()));
        let captured = Rc::clone(&food);
        let mut model = Model::new();
        model.set("foo", Binding::computed(move || captured.borrow().clone()));

        assert_eq!(model.resolve_binding("foo"), Ok("granola".to_string()));
        *food.borrow_mut() = "kale".to_string();
        assert_eq!(model.resolve_binding("foo"), Ok("kale".to_string()));
    }

    #[test]
    fn test_fallible_binding_error() {
        let mut model = Model::new();
        model.set("foo", Binding::fallible(|| Err(BindingError::new("boom"))));
        assert_eq!(model.resolve_binding("foo"), Err(BindingError::new("boom")));
    }

    #[test]
    fn test_set_replaces() {
        let mut model = Model::new();
        model.set("foo", "a");
        model.set("foo", 7);
        assert_eq!(model.len(), 1);
        assert_eq!(model.resolve_binding("foo"), Ok("7".to_string()));
        assert!(model.remove("foo").is_some());
        assert!(model.is_empty());
    }
}
