//! Field projection: applies the binding rules to one instance
//!
//! Each data field is applied against each binding rule independently. A
//! rule's target is the first descendant of the instance whose marker
//! attribute names the field; failing that, the instance root itself if it
//! carries the marker; failing that, the rule is a no-op. Missing targets
//! and unregistered plugins are never errors.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::bindings::BindingConfig;
use crate::data::{DataNode, FieldValue};
use crate::dom::{Document, NodeId};

/// An extension object mounted onto an instance node
///
/// A plugin is constructed once, when its descriptor field first appears for
/// a node, and receives every later payload for that field through `update`.
pub trait Plugin {
    fn update(&mut self, doc: &mut Document, target: NodeId, value: &FieldValue) {
        let _ = (doc, target, value);
    }
}

/// Constructor invoked when a descriptor field mounts onto a target node
pub type PluginFactory = Box<dyn Fn(&mut Document, NodeId, &Value) -> Box<dyn Plugin>>;

/// Explicit name-to-constructor mapping; passed into the projector instead
/// of being resolved through ambient global state
#[derive(Default)]
pub struct PluginRegistry {
    factories: HashMap<String, PluginFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under a descriptor name, replacing any
    /// previous registration
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&mut Document, NodeId, &Value) -> Box<dyn Plugin> + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn get(&self, name: &str) -> Option<&PluginFactory> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|s| s.as_str())
    }
}

/// One projection pass over one instance; borrows the engine's side tables
pub struct Projector<'a> {
    pub bindings: &'a BindingConfig,
    pub plugins: &'a PluginRegistry,
    /// Mounted extension objects, keyed by target node. Presence is the
    /// re-mount guard.
    pub mounted: &'a mut HashMap<NodeId, Box<dyn Plugin>>,
    /// Click-fetch URLs attached to target nodes
    pub actions: &'a mut HashMap<NodeId, String>,
}

impl Projector<'_> {
    /// Apply every binding rule for every projectable field of `item`
    pub fn project(&mut self, doc: &mut Document, instance: NodeId, item: &DataNode) {
        for (field, value) in &item.fields {
            self.apply_text(doc, instance, field, value);
            self.apply_link(doc, instance, field, value);
            self.apply_id(doc, instance, field, value);
            self.apply_mount(doc, instance, field, value);
            self.apply_update(doc, instance, field, value);
            self.apply_fetch(doc, instance, field, value);
        }
    }

    /// Descendant tagged for `field` under `marker`, falling back to the
    /// instance root
    fn target(
        &self,
        doc: &Document,
        instance: NodeId,
        marker: &str,
        field: &str,
    ) -> Option<NodeId> {
        doc.find_by_attr(Some(instance), marker, field)
            .or_else(|| (doc.attr(instance, marker) == Some(field)).then_some(instance))
    }

    fn apply_text(&mut self, doc: &mut Document, instance: NodeId, field: &str, value: &FieldValue) {
        let FieldValue::Scalar(text) = value else { return };
        if let Some(target) = self.target(doc, instance, &self.bindings.text, field) {
            doc.set_text(target, text);
        }
    }

    fn apply_link(&mut self, doc: &mut Document, instance: NodeId, field: &str, value: &FieldValue) {
        let FieldValue::Scalar(href) = value else { return };
        if let Some(target) = self.target(doc, instance, &self.bindings.link, field) {
            doc.set_attr(target, "href", href);
        }
    }

    fn apply_id(&mut self, doc: &mut Document, instance: NodeId, field: &str, value: &FieldValue) {
        let FieldValue::Scalar(id) = value else { return };
        if let Some(target) = self.target(doc, instance, &self.bindings.id, field) {
            doc.set_attr(target, "id", id);
        }
    }

    fn apply_mount(
        &mut self,
        doc: &mut Document,
        instance: NodeId,
        field: &str,
        value: &FieldValue,
    ) {
        let FieldValue::Descriptor { name, settings } = value else {
            return;
        };
        let Some(target) = self.target(doc, instance, &self.bindings.plugin, field) else {
            return;
        };
        // Mount happens once per target; the side table is the guard
        if self.mounted.contains_key(&target) {
            return;
        }
        match self.plugins.get(name) {
            Some(factory) => {
                let plugin = factory(doc, target, settings);
                self.mounted.insert(target, plugin);
            }
            None => debug!(plugin = %name, "plugin not registered, mount skipped"),
        }
    }

    fn apply_update(
        &mut self,
        doc: &mut Document,
        instance: NodeId,
        field: &str,
        value: &FieldValue,
    ) {
        let Some(target) = self.target(doc, instance, &self.bindings.plugin_update, field) else {
            return;
        };
        if let Some(plugin) = self.mounted.get_mut(&target) {
            plugin.update(doc, target, value);
        }
    }

    fn apply_fetch(
        &mut self,
        doc: &mut Document,
        instance: NodeId,
        field: &str,
        value: &FieldValue,
    ) {
        let FieldValue::Scalar(url) = value else { return };
        if let Some(target) = self.target(doc, instance, &self.bindings.fetch, field) {
            // Attach or replace; dispatch happens via Engine::activate
            self.actions.insert(target, url.clone());
        }
    }
}
