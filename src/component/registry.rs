//! Definition cache and in-flight loads

use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared};

use super::behavior::{BehaviorConstructor, GENERIC_CLASSNAME};
use crate::error::ComponentError;
use crate::template::{self, Template};

/// A loaded, parsed component template
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    name: String,
    contents: String,
    template: Template,
    behavior: Option<BehaviorConstructor>,
}

impl ComponentDefinition {
    /// Parse `contents` into a definition
    pub fn parse(
        name: impl Into<String>,
        contents: impl Into<String>,
        behavior: Option<BehaviorConstructor>,
    ) -> Result<Self, ComponentError> {
        let name = name.into();
        let contents = contents.into();
        let template = match template::parse(&contents) {
            Ok(template) => template,
            Err(errors) => {
                return Err(ComponentError::Template {
                    name,
                    contents,
                    errors,
                })
            }
        };
        Ok(Self {
            name,
            contents,
            template,
            behavior,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw template text as fetched
    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn behavior(&self) -> Option<&BehaviorConstructor> {
        self.behavior.as_ref()
    }

    /// Name of the behavior instances are built with
    pub fn classname(&self) -> &str {
        self.behavior
            .as_ref()
            .map(|b| b.classname())
            .unwrap_or(GENERIC_CLASSNAME)
    }
}

pub type LoadResult = Result<Rc<ComponentDefinition>, ComponentError>;

/// A load other callers can join
pub type PendingLoad = Shared<LocalBoxFuture<'static, LoadResult>>;

/// Registered definitions plus loads still in flight
#[derive(Default)]
pub struct Registry {
    definitions: HashMap<String, Rc<ComponentDefinition>>,
    pending: HashMap<String, PendingLoad>,
    /// Bumped on every clear so loads started before it do not register
    generation: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Rc<ComponentDefinition>> {
        self.definitions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(|s| s.as_str())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Register a definition unless one already exists under its name
    ///
    /// Returns whichever definition is authoritative afterwards.
    pub fn register(&mut self, def: ComponentDefinition) -> Rc<ComponentDefinition> {
        self.definitions
            .entry(def.name.clone())
            .or_insert_with(|| Rc::new(def))
            .clone()
    }

    pub fn pending(&self, name: &str) -> Option<PendingLoad> {
        self.pending.get(name).cloned()
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains_key(name)
    }

    pub fn begin_load(&mut self, name: &str, load: PendingLoad) {
        self.pending.insert(name.to_string(), load);
    }

    /// Settle a load started in `generation`
    ///
    /// Successful loads register (first wins); either way the pending entry
    /// is dropped so a failure can be retried. Loads that straddle a
    /// [`Registry::clear`] resolve but leave the registry untouched.
    pub fn finish_load(
        &mut self,
        name: &str,
        generation: u64,
        result: Result<ComponentDefinition, ComponentError>,
    ) -> LoadResult {
        if generation != self.generation {
            return result.map(Rc::new);
        }
        self.pending.remove(name);
        result.map(|def| self.register(def))
    }

    /// Drop every definition and pending load
    pub fn clear(&mut self) {
        self.definitions.clear();
        self.pending.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;

    fn def(name: &str, contents: &str) -> ComponentDefinition {
        ComponentDefinition::parse(name, contents, None).expect("Should parse")
    }

    #[test]
    fn test_register_first_wins() {
        let mut registry = Registry::new();
        registry.register(def("box", "first"));
        let kept = registry.register(def("box", "second"));
        assert_eq!(kept.contents(), "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_default_classname() {
        assert_eq!(def("box", "x").classname(), "Component");
    }

    #[test]
    fn test_parse_failure_is_template_error() {
        let result = ComponentDefinition::parse("box", "<div>", None);
        assert!(matches!(result, Err(ComponentError::Template { .. })));
    }

    #[test]
    fn test_failed_load_clears_pending() {
        let mut registry = Registry::new();
        let load: LocalBoxFuture<'static, LoadResult> = Box::pin(futures::future::pending());
        registry.begin_load("box", futures::FutureExt::shared(load));
        assert!(registry.is_pending("box"));

        let err = ComponentError::Fetch {
            name: "box".to_string(),
            error: FetchError::NotFound {
                path: "box.html".to_string(),
            },
        };
        let result = registry.finish_load("box", registry.generation(), Err(err));
        assert!(result.is_err());
        assert!(!registry.is_pending("box"));
        assert!(!registry.contains("box"));
    }

    #[test]
    fn test_load_from_before_clear_does_not_register() {
        let mut registry = Registry::new();
        let generation = registry.generation();
        registry.clear();
        let result = registry.finish_load("box", generation, Ok(def("box", "x")));
        assert!(result.is_ok());
        assert!(registry.is_empty());
    }
}
