//! Keyed reconciliation: joins a data list against the live instances under
//! a container, classifying each as entering, updating, or exiting
//!
//! The join is keyed, not positional. Matched instances keep their node
//! identity and DOM position; entering items get a fresh template clone
//! appended at the end of the container; exiting instances are hidden and
//! detached. Callers must supply distinct keys when more than one item is
//! expected — keyless items all compete for the keyless join slots.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::bindings::BindingConfig;
use crate::data::DataNode;
use crate::dom::{Document, Lifecycle, NodeId};
use crate::template::{resolve_parent, TemplateStore};

/// One surviving instance, with the index of the data item bound to it
#[derive(Debug, Clone, Copy)]
pub struct Reconciled {
    pub node: NodeId,
    pub item: usize,
}

/// Reconcile `items` against the instances under the container resolved from
/// `anchor`. Returns the merged (entering plus updating) set in data order.
///
/// The container and the candidate selector derive from the first item's
/// `name`; mixed-template sibling lists are not supported beyond that. A
/// single anchorless item carrying a scalar `id` field selects the existing
/// element with that `id` attribute directly instead of going through the
/// template placeholder search.
pub fn reconcile(
    doc: &mut Document,
    store: &mut TemplateStore,
    bindings: &BindingConfig,
    items: &[DataNode],
    anchor: Option<NodeId>,
) -> Vec<Reconciled> {
    let (container, candidates) = match select_candidates(doc, bindings, items, anchor) {
        Some(selection) => selection,
        None => return Vec::new(),
    };

    let mut matched: HashSet<NodeId> = HashSet::new();
    let mut merged = Vec::new();
    let mut entered = 0usize;

    for (index, item) in items.iter().enumerate() {
        let existing = candidates.iter().copied().find(|&c| {
            !matched.contains(&c) && doc.attr(c, &bindings.key) == item.key.as_deref()
        });

        let node = match existing {
            Some(node) => {
                // Clears any added/removed classification from earlier passes
                doc.set_state(node, Lifecycle::Updated);
                doc.set_attr(node, &bindings.state, "updated");
                node
            }
            None => match enter(doc, store, bindings, item) {
                Some(node) => {
                    doc.append_child(container, node);
                    entered += 1;
                    node
                }
                None => continue,
            },
        };
        matched.insert(node);
        merged.push(Reconciled { node, item: index });
    }

    let mut exited = 0usize;
    for stale in candidates {
        if !matched.contains(&stale) {
            exit(doc, bindings, stale);
            exited += 1;
        }
    }

    debug!(entered, merged = merged.len(), exited, "reconciled level");

    merged
}

/// Resolve the container and the existing candidate instances beneath it
fn select_candidates(
    doc: &mut Document,
    bindings: &BindingConfig,
    items: &[DataNode],
    anchor: Option<NodeId>,
) -> Option<(NodeId, Vec<NodeId>)> {
    // Single-item id fallback: no anchor, one item, explicit id field
    if anchor.is_none() && items.len() == 1 {
        if let Some(id) = items[0].scalar_field("id") {
            if let Some(existing) = doc.find_by_attr(None, "id", id) {
                let container = doc.parent(existing)?;
                return Some((container, vec![existing]));
            }
        }
    }

    let names = distinct_names(items);
    let Some(first_name) = names.first() else {
        // Empty data list: everything template-tagged under the anchor exits
        let container = anchor?;
        for stale in doc.children_with_attr(container, &bindings.template, None) {
            exit(doc, bindings, stale);
        }
        return None;
    };

    let Some(container) = resolve_parent(doc, bindings, anchor, first_name) else {
        warn!(template = %first_name, "no container found for template");
        return None;
    };
    let candidates = doc.children_with_attr(container, &bindings.template, Some(first_name));
    Some((container, candidates))
}

/// Distinct `name` fields across the list, first appearance order
fn distinct_names(items: &[DataNode]) -> Vec<String> {
    let mut names = Vec::new();
    for item in items {
        if let Some(name) = &item.name {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}

/// Instantiate a fresh clone for an entering item
fn enter(
    doc: &mut Document,
    store: &mut TemplateStore,
    bindings: &BindingConfig,
    item: &DataNode,
) -> Option<NodeId> {
    let Some(name) = &item.name else {
        warn!("entering item has no template name, skipped");
        return None;
    };
    let node = store.get_clone(doc, bindings, name)?;
    if let Some(key) = &item.key {
        doc.set_attr(node, &bindings.key, key);
    }
    // Authored fragments may carry a hidden presentation state
    doc.remove_attr(node, &bindings.hidden);
    doc.set_state(node, Lifecycle::Added);
    doc.set_attr(node, &bindings.state, "added");
    Some(node)
}

/// Mark an instance as exiting and take it out of the tree
fn exit(doc: &mut Document, bindings: &BindingConfig, node: NodeId) {
    doc.set_state(node, Lifecycle::Removed);
    doc.set_attr(node, &bindings.state, "removed");
    doc.set_attr(node, &bindings.hidden, "true");
    doc.detach(node);
}
