//! Live instances and id allocation

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use super::behavior::Behavior;
use crate::dom::NodeId;
use crate::render::{Binding, RenderOutcome};

/// Globally unique instance id, starting at 1
pub type ComponentId = u64;

/// Id unique within one component name, starting at 1
pub type InstanceId = u64;

pub(crate) type SharedBehavior = Rc<RefCell<Box<dyn Behavior>>>;

/// Handle to one live component instance
#[derive(Clone)]
pub struct Instance {
    component_id: ComponentId,
    instance_id: InstanceId,
    name: Rc<str>,
    element: NodeId,
    behavior: SharedBehavior,
}

impl Instance {
    pub(crate) fn new(
        component_id: ComponentId,
        instance_id: InstanceId,
        name: &str,
        element: NodeId,
        behavior: SharedBehavior,
    ) -> Self {
        Self {
            component_id,
            instance_id,
            name: Rc::from(name),
            element,
            behavior,
        }
    }

    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Component name this instance was created from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element created for this instance
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Bind a model key; takes effect on the next render
    pub fn set(&self, key: &str, binding: impl Into<Binding>) {
        self.behavior.borrow_mut().set(key, binding.into());
    }

    /// Re-render this instance
    ///
    /// The behavior stays mutably borrowed while bindings resolve, so a
    /// computed binding may read the document but must not reach back into
    /// this instance (`shown`, `behavior`, `render`); doing so panics.
    pub fn render(&self) -> RenderOutcome {
        self.behavior.borrow_mut().render()
    }

    /// Borrow the behavior as a trait object
    pub fn behavior_dyn(&self) -> Ref<'_, Box<dyn Behavior>> {
        self.behavior.borrow()
    }

    /// Borrow the behavior as its concrete type
    pub fn behavior<T: Behavior>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.behavior.borrow(), |b| b.as_any().downcast_ref::<T>()).ok()
    }

    pub fn behavior_mut<T: Behavior>(&self) -> Option<RefMut<'_, T>> {
        RefMut::filter_map(self.behavior.borrow_mut(), |b| {
            b.as_any_mut().downcast_mut::<T>()
        })
        .ok()
    }

    /// Shown text at each location bound to `key`
    pub fn shown(&self, key: &str) -> Vec<String> {
        self.behavior
            .borrow()
            .view()
            .shown(key)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("component_id", &self.component_id)
            .field("instance_id", &self.instance_id)
            .field("name", &self.name)
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

/// What the framework keeps for a live instance
pub(crate) struct InstanceRecord {
    pub(crate) name: Rc<str>,
    pub(crate) instance_id: InstanceId,
    pub(crate) element: NodeId,
    // Keeps the behavior alive for as long as the instance is registered
    pub(crate) behavior: SharedBehavior,
}

impl From<&Instance> for InstanceRecord {
    fn from(instance: &Instance) -> Self {
        Self {
            name: Rc::clone(&instance.name),
            instance_id: instance.instance_id,
            element: instance.element,
            behavior: Rc::clone(&instance.behavior),
        }
    }
}

/// Counters and live instance records
#[derive(Default)]
pub(crate) struct Instances {
    created_components: u64,
    created_instances: HashMap<String, u64>,
    live: BTreeMap<ComponentId, InstanceRecord>,
}

impl Instances {
    /// Claim the next global id and the next id for `name`
    pub(crate) fn allocate(&mut self, name: &str) -> (ComponentId, InstanceId) {
        self.created_components += 1;
        let per_name = self.created_instances.entry(name.to_string()).or_insert(0);
        *per_name += 1;
        (self.created_components, *per_name)
    }

    pub(crate) fn insert(&mut self, component_id: ComponentId, record: InstanceRecord) {
        self.live.insert(component_id, record);
    }

    pub(crate) fn remove(&mut self, component_id: ComponentId) -> Option<InstanceRecord> {
        self.live.remove(&component_id)
    }

    pub(crate) fn get(&self, component_id: ComponentId) -> Option<&InstanceRecord> {
        self.live.get(&component_id)
    }

    pub(crate) fn created_components(&self) -> u64 {
        self.created_components
    }

    pub(crate) fn created_instances(&self, name: &str) -> u64 {
        self.created_instances.get(name).copied().unwrap_or(0)
    }

    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn ids(&self) -> Vec<ComponentId> {
        self.live.keys().copied().collect()
    }

    pub(crate) fn ids_of(&self, name: &str) -> Vec<ComponentId> {
        self.live
            .iter()
            .filter(|(_, r)| &*r.name == name)
            .map(|(&id, _)| id)
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.created_components = 0;
        self.created_instances.clear();
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_global_and_per_name() {
        let mut instances = Instances::default();
        assert_eq!(instances.allocate("a"), (1, 1));
        assert_eq!(instances.allocate("b"), (2, 1));
        assert_eq!(instances.allocate("a"), (3, 2));
        assert_eq!(instances.created_components(), 3);
        assert_eq!(instances.created_instances("a"), 2);
        assert_eq!(instances.created_instances("c"), 0);
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut instances = Instances::default();
        instances.allocate("a");
        instances.clear();
        assert_eq!(instances.allocate("a"), (1, 1));
    }
}
