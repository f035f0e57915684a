//! Mounted template with binding slots

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{trace, warn};

use super::model::{Binding, Model};
use crate::dom::{Dom, DomError, NodeId, SharedDom};
use crate::template::{Node, Template};

/// One text node fed by a model key
#[derive(Debug, Clone)]
struct Slot {
    node: NodeId,
    /// Text this slot currently shows in the document
    shown: String,
}

/// Result of a render pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Slots whose text was rewritten
    pub updated: usize,
    /// Slots that already showed the resolved text
    pub unchanged: usize,
    /// Keys whose binding failed; their slots keep previous content
    pub failed: Vec<String>,
}

impl RenderOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A template mounted under an element, plus the model it renders
///
/// Structure is created once in [`View::mount`]. Rendering only rewrites
/// the text nodes standing in for `{{ key }}` references, and only when the
/// resolved text differs from what the slot shows.
pub struct View {
    dom: SharedDom,
    element: NodeId,
    model: Model,
    slots: Vec<Slot>,
    /// Slot indices per key
    keys: BTreeMap<String, Vec<usize>>,
}

impl View {
    /// Build the template's structure under `element`
    pub fn mount(dom: SharedDom, element: NodeId, template: &Template) -> Result<Self, DomError> {
        let mut view = Self {
            dom: Rc::clone(&dom),
            element,
            model: Model::new(),
            slots: Vec::new(),
            keys: BTreeMap::new(),
        };
        {
            let mut dom = dom.borrow_mut();
            view.build(&mut *dom, element, &template.nodes)?;
        }
        Ok(view)
    }

    fn build(&mut self, dom: &mut dyn Dom, parent: NodeId, nodes: &[Node]) -> Result<(), DomError> {
        for node in nodes {
            match node {
                Node::Text(text) => {
                    let child = dom.create_text(text);
                    dom.append_child(parent, child)?;
                }
                Node::Binding(binding) => {
                    let child = dom.create_text("");
                    dom.append_child(parent, child)?;
                    self.keys
                        .entry(binding.key.clone())
                        .or_default()
                        .push(self.slots.len());
                    self.slots.push(Slot {
                        node: child,
                        shown: String::new(),
                    });
                }
                Node::Element(el) => {
                    let child = dom.create_element(&el.tag);
                    for attr in &el.attributes {
                        dom.set_attribute(child, &attr.name, attr.value.as_deref().unwrap_or(""))?;
                    }
                    dom.append_child(parent, child)?;
                    self.build(dom, child, &el.children)?;
                }
            }
        }
        Ok(())
    }

    /// Element the template was mounted under
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Document this view renders into
    pub fn dom(&self) -> &SharedDom {
        &self.dom
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Shorthand for `model_mut().set(..)`
    pub fn set(&mut self, key: impl Into<String>, binding: impl Into<Binding>) {
        self.model.set(key, binding);
    }

    /// Keys referenced by the mounted template
    pub fn binding_keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(|k| k.as_str())
    }

    /// Number of binding locations in the mounted template
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Text currently shown at every location bound to `key`
    pub fn shown(&self, key: &str) -> Vec<&str> {
        self.keys
            .get(key)
            .map(|idx| idx.iter().map(|&i| self.slots[i].shown.as_str()).collect())
            .unwrap_or_default()
    }

    /// Re-evaluate every binding and write the locations that changed
    ///
    /// Never fails: a binding that errors is logged, reported in
    /// [`RenderOutcome::failed`], and its locations keep their previous text.
    /// Computed bindings may read the document, but not the instance that
    /// owns this view: it stays borrowed for the whole pass.
    pub fn render(&mut self) -> RenderOutcome {
        let mut outcome = RenderOutcome::default();

        // Resolve everything before touching the document so computed
        // bindings are free to read it
        let mut resolved = Vec::with_capacity(self.keys.len());
        for key in self.keys.keys() {
            match self.model.resolve_binding(key) {
                Ok(text) => resolved.push((key.clone(), text)),
                Err(err) => {
                    warn!(key = %key, error = %err, "binding failed, keeping previous content");
                    outcome.failed.push(key.clone());
                }
            }
        }

        let mut dom = self.dom.borrow_mut();
        for (key, text) in resolved {
            let Some(indices) = self.keys.get(&key) else {
                continue;
            };
            for &i in indices {
                let slot = &mut self.slots[i];
                if slot.shown == text {
                    outcome.unchanged += 1;
                    continue;
                }
                match dom.set_text(slot.node, &text) {
                    Ok(()) => {
                        slot.shown.clone_from(&text);
                        outcome.updated += 1;
                    }
                    Err(err) => {
                        warn!(key = %key, error = %err, "could not write binding");
                        if !outcome.failed.contains(&key) {
                            outcome.failed.push(key.clone());
                        }
                    }
                }
            }
        }

        trace!(
            updated = outcome.updated,
            unchanged = outcome.unchanged,
            failed = outcome.failed.len(),
            "render pass"
        );
        outcome
    }
}
