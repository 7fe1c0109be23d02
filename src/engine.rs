//! Tree builder: the public entry point driving reconciliation levels
//!
//! One `build` call is one complete synchronous pass: reconcile the current
//! level, project fields into every surviving instance, then recurse into
//! each instance's child data or strip its stale nested placeholders. The
//! engine takes `&mut self` for every pass, so passes are serial by
//! construction; the only external suspension point is the pluggable
//! [`Fetcher`] used by `activate`.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::bindings::BindingConfig;
use crate::data::DataNode;
use crate::dom::{Document, NodeId};
use crate::project::{Plugin, PluginRegistry, Projector};
use crate::reconcile::reconcile;
use crate::template::TemplateStore;
use crate::BuildError;

/// Collaborator that resolves a click-fetch URL into a JSON payload
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// Errors surfaced by a [`Fetcher`] implementation
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("fetch failed for {url}: {message}")]
    Failed { url: String, message: String },
}

/// Reconciliation engine bound to one document
///
/// Owns the live tree, the template clone cache, the plugin registry, and
/// the per-node side tables (mounted plugins, click-fetch actions). One
/// engine is one render root; independent roots get independent engines.
pub struct Engine {
    doc: Document,
    bindings: BindingConfig,
    store: TemplateStore,
    plugins: PluginRegistry,
    mounted: HashMap<NodeId, Box<dyn Plugin>>,
    actions: HashMap<NodeId, String>,
}

impl Engine {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            bindings: BindingConfig::default(),
            store: TemplateStore::new(),
            plugins: PluginRegistry::new(),
            mounted: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    /// Override the binding attribute names
    pub fn with_bindings(mut self, bindings: BindingConfig) -> Self {
        self.bindings = bindings;
        self
    }

    /// Replace the plugin registry wholesale
    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Whether a click-fetch action is attached to `node`
    pub fn action(&self, node: NodeId) -> Option<&str> {
        self.actions.get(&node).map(String::as_str)
    }

    /// Build or update the tree from a top-level payload. Returns the merged
    /// instance set for the top level, in data order.
    pub fn build(&mut self, data: &Value) -> Result<Vec<NodeId>, BuildError> {
        self.build_at(data, None)
    }

    /// Build against an explicit anchor instead of the whole document
    pub fn build_at(
        &mut self,
        data: &Value,
        anchor: Option<NodeId>,
    ) -> Result<Vec<NodeId>, BuildError> {
        let items = DataNode::list_from_value(data)?;
        let merged = self.build_level(&items, anchor);
        self.prune_detached();
        Ok(merged)
    }

    /// Drop side-table entries for nodes that left the tree this pass, so
    /// exited instances do not pin their plugins and actions forever
    fn prune_detached(&mut self) {
        let doc = &self.doc;
        self.mounted.retain(|&node, _| doc.is_attached(node));
        self.actions.retain(|&node, _| doc.is_attached(node));
    }

    fn build_level(&mut self, items: &[DataNode], anchor: Option<NodeId>) -> Vec<NodeId> {
        if items.is_empty() && anchor.is_none() {
            return Vec::new();
        }
        let merged = reconcile(&mut self.doc, &mut self.store, &self.bindings, items, anchor);
        let mut out = Vec::with_capacity(merged.len());
        for entry in &merged {
            let item = &items[entry.item];
            let mut projector = Projector {
                bindings: &self.bindings,
                plugins: &self.plugins,
                mounted: &mut self.mounted,
                actions: &mut self.actions,
            };
            projector.project(&mut self.doc, entry.node, item);

            if item.children.is_empty() {
                self.strip_placeholders(entry.node);
            } else {
                self.build_level(&item.children, Some(entry.node));
            }
            out.push(entry.node);
        }
        out
    }

    /// Remove nested template placeholders (and stale child instances) left
    /// under an instance whose data no longer has children
    fn strip_placeholders(&mut self, instance: NodeId) {
        let stale: Vec<NodeId> = self
            .doc
            .descendants(instance)
            .into_iter()
            .filter(|&n| self.doc.attr(n, &self.bindings.template).is_some())
            .collect();
        for node in stale {
            self.doc.detach(node);
        }
    }

    /// Dispatch the click-fetch action attached to `node`: fetch the URL's
    /// payload and re-enter `build` with it as new top-level data. A node
    /// without an action is a no-op; a failed fetch leaves the tree
    /// untouched.
    pub fn activate(
        &mut self,
        node: NodeId,
        fetcher: &dyn Fetcher,
    ) -> Result<Vec<NodeId>, BuildError> {
        let Some(url) = self.actions.get(&node).cloned() else {
            return Ok(Vec::new());
        };
        debug!(%url, "dispatching click-fetch action");
        let payload = fetcher.fetch(&url)?;
        self.build(&payload)
    }
}
