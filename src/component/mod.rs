//! Component registry, instancing and lifecycle
//!
//! [`Framework`] is the single context that owns all shared state: the
//! definition cache, loads in flight, id counters and live instances. It is
//! cheap to clone; clones share that state. Nothing here is global, so two
//! frameworks never see each other's components, and [`Framework::reset`]
//! returns one to a pristine state in a single step.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use fragment_kit::{Document, Framework, MemoryFetcher, SharedDom};
//! use futures::executor::block_on;
//!
//! let doc = Rc::new(RefCell::new(Document::new()));
//! let shared: SharedDom = doc.clone();
//! let fetcher = MemoryFetcher::new().with_file("greeting.html", "<p>Hello, {{ name }}</p>");
//! let framework = Framework::new(shared, fetcher);
//!
//! block_on(framework.initialize("greetingCard", "greeting.html", None)).unwrap();
//! let body = doc.borrow().body();
//! let card = block_on(framework.instance(body, "greetingCard", Vec::new())).unwrap();
//!
//! card.set("name", "world");
//! card.render();
//! assert_eq!(
//!     doc.borrow().outer_html(card.element()),
//!     r#"<greeting-card data-component-id="1" data-instance-id="1"><p>Hello, world</p></greeting-card>"#
//! );
//! ```

mod behavior;
mod config;
mod instance;
mod registry;

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};
use tracing::{debug, warn};

pub use behavior::{Behavior, BehaviorConstructor, Component, GENERIC_CLASSNAME};
pub use config::FrameworkConfig;
pub use instance::{ComponentId, Instance, InstanceId};
pub use registry::{ComponentDefinition, LoadResult, PendingLoad, Registry};

use instance::{InstanceRecord, Instances};

use crate::dom::{NodeId, SharedDom};
use crate::error::ComponentError;
use crate::fetch::Fetch;
use crate::naming::to_element_name;
use crate::render::{Value, View};

/// Shared state behind every [`Framework`] clone
#[derive(Default)]
struct State {
    registry: Registry,
    instances: Instances,
}

type InitializedFuture = LocalBoxFuture<'static, Result<(), ComponentError>>;

/// Component framework context
#[derive(Clone)]
pub struct Framework {
    state: Rc<RefCell<State>>,
    dom: SharedDom,
    fetcher: Rc<dyn Fetch>,
    config: Rc<FrameworkConfig>,
}

impl Framework {
    /// Create a framework rendering into `dom` and loading through `fetcher`
    pub fn new(dom: SharedDom, fetcher: impl Fetch + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(State::default())),
            dom,
            fetcher: Rc::new(fetcher),
            config: Rc::new(FrameworkConfig::default()),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: FrameworkConfig) -> Self {
        self.config = Rc::new(config);
        self
    }

    pub fn config(&self) -> &FrameworkConfig {
        &self.config
    }

    /// Document instances are rendered into
    pub fn dom(&self) -> &SharedDom {
        &self.dom
    }

    /// Load and register the definition for `name`
    ///
    /// A registered name resolves immediately and ignores `source` and
    /// `behavior`. A name whose load is in flight joins that load. Otherwise
    /// `source` is fetched once; the decision is made when this method is
    /// called, so back-to-back calls share a single fetch even before
    /// either future is polled. Failures register nothing.
    pub fn initialize(
        &self,
        name: &str,
        source: &str,
        behavior: Option<BehaviorConstructor>,
    ) -> LocalBoxFuture<'static, LoadResult> {
        let mut state = self.state.borrow_mut();

        if let Some(def) = state.registry.get(name) {
            debug!(name, "component already registered");
            return future::ready(Ok(def)).boxed_local();
        }

        if let Some(pending) = state.registry.pending(name) {
            debug!(name, "joining in-flight load");
            return pending.boxed_local();
        }

        debug!(name, source, "loading component");
        let fetch = self.fetcher.fetch_text(source);
        let shared = Rc::clone(&self.state);
        let generation = state.registry.generation();
        let owned = name.to_string();

        let load = async move {
            let result = match fetch.await {
                Ok(contents) => ComponentDefinition::parse(owned.as_str(), contents, behavior),
                Err(error) => Err(ComponentError::Fetch {
                    name: owned.clone(),
                    error,
                }),
            };
            match &result {
                Ok(_) => debug!(name = %owned, "component registered"),
                Err(err) => warn!(name = %owned, error = %err, "component load failed"),
            }
            let settled = shared
                .borrow_mut()
                .registry
                .finish_load(&owned, generation, result);
            settled
        }
        .boxed_local()
        .shared();

        state.registry.begin_load(name, load.clone());
        load.boxed_local()
    }

    /// Initialize several components at once
    ///
    /// Resolves after every load has settled; the first failure (in input
    /// order) is returned if any failed.
    pub fn initialize_all(
        &self,
        sources: &[(&str, &str)],
    ) -> LocalBoxFuture<'static, Result<Vec<Rc<ComponentDefinition>>, ComponentError>> {
        let loads: Vec<_> = sources
            .iter()
            .map(|(name, source)| self.initialize(name, source, None))
            .collect();
        async move { future::join_all(loads).await.into_iter().collect() }.boxed_local()
    }

    /// Register template text that is already at hand
    ///
    /// Same first-wins rule as [`Framework::initialize`].
    pub fn register_contents(
        &self,
        name: &str,
        contents: &str,
        behavior: Option<BehaviorConstructor>,
    ) -> LoadResult {
        let mut state = self.state.borrow_mut();
        if let Some(def) = state.registry.get(name) {
            return Ok(def);
        }
        let def = ComponentDefinition::parse(name, contents, behavior)?;
        debug!(name, "component registered from contents");
        Ok(state.registry.register(def))
    }

    /// Create an instance of `name` under `container`
    ///
    /// Ids are allocated and the element is created and rendered before this
    /// returns; the future then waits for the behavior's own setup. If that
    /// setup fails the instance is removed again and the error returned.
    /// A `container` the document refuses to append to fails before any id
    /// is claimed.
    pub fn instance(
        &self,
        container: NodeId,
        name: &str,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'static, Result<Instance, ComponentError>> {
        let (instance, initialized) = match self.create_instance(container, name, &args) {
            Ok(created) => created,
            Err(err) => return future::ready(Err(err)).boxed_local(),
        };

        let framework = self.clone();
        async move {
            if let Err(err) = initialized.await {
                warn!(
                    name = instance.name(),
                    component_id = instance.component_id(),
                    error = %err,
                    "instance setup failed"
                );
                framework.remove(instance.component_id());
                return Err(err);
            }
            Ok(instance)
        }
        .boxed_local()
    }

    fn create_instance(
        &self,
        container: NodeId,
        name: &str,
        args: &[Value],
    ) -> Result<(Instance, InitializedFuture), ComponentError> {
        let definition =
            self.state
                .borrow()
                .registry
                .get(name)
                .ok_or_else(|| ComponentError::NotRegistered {
                    name: name.to_string(),
                })?;

        // Attach before claiming ids so a rejected container consumes none
        let element = {
            let mut dom = self.dom.borrow_mut();
            let element = dom.create_element(&to_element_name(name));
            dom.append_child(container, element)?;
            element
        };

        let (component_id, instance_id) = self.state.borrow_mut().instances.allocate(name);

        {
            let mut dom = self.dom.borrow_mut();
            dom.set_attribute(
                element,
                &self.config.component_id_attribute,
                &component_id.to_string(),
            )?;
            dom.set_attribute(
                element,
                &self.config.instance_id_attribute,
                &instance_id.to_string(),
            )?;
        }

        let view = View::mount(Rc::clone(&self.dom), element, definition.template())?;
        let mut behavior: Box<dyn Behavior> = match definition.behavior() {
            Some(constructor) => constructor.construct(view, args),
            None => Box::new(Component::new(view)),
        };

        let outcome = behavior.render();
        let initialized = behavior.initialized();

        let instance = Instance::new(
            component_id,
            instance_id,
            name,
            element,
            Rc::new(RefCell::new(behavior)),
        );
        self.state
            .borrow_mut()
            .instances
            .insert(component_id, InstanceRecord::from(&instance));

        debug!(
            name,
            component_id,
            instance_id,
            classname = definition.classname(),
            updated = outcome.updated,
            "instance created"
        );
        Ok((instance, initialized))
    }

    /// Load `name` from `source` if needed, then instance it
    pub fn mount(
        &self,
        container: NodeId,
        name: &str,
        source: &str,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'static, Result<Instance, ComponentError>> {
        let load = self.initialize(name, source, None);
        let framework = self.clone();
        let name = name.to_string();
        async move {
            load.await?;
            framework.instance(container, &name, args).await
        }
        .boxed_local()
    }

    /// Tear down a live instance
    ///
    /// The element is detached and the framework's reference to the
    /// behavior is released. Counters are left alone; ids are never reused.
    pub fn remove(&self, component_id: ComponentId) -> bool {
        let Some(record) = self.state.borrow_mut().instances.remove(component_id) else {
            return false;
        };
        if let Err(err) = self.dom.borrow_mut().detach(record.element) {
            warn!(component_id, error = %err, "could not detach instance element");
        }
        debug!(
            name = %record.name,
            component_id,
            instance_id = record.instance_id,
            "instance removed"
        );
        true
    }

    /// Handle to a live instance by its global id
    pub fn get(&self, component_id: ComponentId) -> Option<Instance> {
        let state = self.state.borrow();
        let record = state.instances.get(component_id)?;
        Some(Instance::new(
            component_id,
            record.instance_id,
            &record.name,
            record.element,
            Rc::clone(&record.behavior),
        ))
    }

    /// Clear definitions, pending loads, counters and instances
    ///
    /// Loads still in flight resolve normally but do not register.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.registry.clear();
        state.instances.clear();
        debug!("framework state reset");
    }

    pub fn definition(&self, name: &str) -> Option<Rc<ComponentDefinition>> {
        self.state.borrow().registry.get(name)
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.state.borrow().registry.is_pending(name)
    }

    /// Names of all registered definitions, sorted
    pub fn component_names(&self) -> Vec<String> {
        let state = self.state.borrow();
        let mut names: Vec<String> = state.registry.names().map(str::to_string).collect();
        names.sort();
        names
    }

    /// Number of distinct registered definitions
    pub fn num_components(&self) -> usize {
        self.state.borrow().registry.len()
    }

    /// Instances created so far across all names
    pub fn created_components(&self) -> u64 {
        self.state.borrow().instances.created_components()
    }

    /// Instances created so far for `name`
    pub fn created_instances(&self, name: &str) -> u64 {
        self.state.borrow().instances.created_instances(name)
    }

    /// Number of live instances
    pub fn instance_count(&self) -> usize {
        self.state.borrow().instances.len()
    }

    /// Ids of every live instance, ascending
    pub fn live_instances(&self) -> Vec<ComponentId> {
        self.state.borrow().instances.ids()
    }

    /// Ids of live instances of `name`, ascending
    pub fn instances_of(&self, name: &str) -> Vec<ComponentId> {
        self.state.borrow().instances.ids_of(name)
    }
}
