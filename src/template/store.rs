//! Template store: lazily cached fragment masters, cloned per instantiation

use std::collections::HashMap;

use tracing::warn;

use crate::bindings::BindingConfig;
use crate::dom::{Document, NodeId};

/// Clone cache keyed by template name
///
/// The first lookup for a name deep-clones the authored fragment into a
/// detached master; every lookup (including the first) clones the master
/// again, so callers never touch cached state. Once a name resolves it keeps
/// resolving even after the authored fragment leaves the tree — which it
/// does, since the first reconciliation pass removes it as an unmatched
/// keyless instance.
#[derive(Debug, Default)]
pub struct TemplateStore {
    cache: HashMap<String, NodeId>,
    source_clones: usize,
    instance_clones: usize,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a fresh instance clone for `name`, or `None` if no fragment with
    /// that name exists anywhere in the document. A miss is non-fatal and
    /// logged; a miss is not cached, so a fragment added later is found.
    pub fn get_clone(
        &mut self,
        doc: &mut Document,
        bindings: &BindingConfig,
        name: &str,
    ) -> Option<NodeId> {
        let master = match self.cache.get(name) {
            Some(&master) => master,
            None => {
                let Some(source) = doc.find_by_attr(None, &bindings.template, name) else {
                    warn!(template = name, "template not found");
                    return None;
                };
                let master = doc.clone_subtree(source);
                self.source_clones += 1;
                self.cache.insert(name.to_string(), master);
                master
            }
        };
        self.instance_clones += 1;
        Some(doc.clone_subtree(master))
    }

    /// Whether a master for `name` has been cached
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// How many times an authored fragment was cloned into the cache
    pub fn source_clones(&self) -> usize {
        self.source_clones
    }

    /// How many instance clones were handed out
    pub fn instance_clones(&self) -> usize {
        self.instance_clones
    }
}
