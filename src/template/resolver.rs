//! Parent resolution - finds the container that instances of a template
//! should be appended under

use crate::bindings::BindingConfig;
use crate::dom::{Document, NodeId};

/// Resolve the container for instances of `name` relative to `anchor`.
///
/// With no anchor (a top-level pass) the whole document is searched for an
/// element tagged with the template name; its parent is the container. With
/// an anchor, only the anchor's proper descendants are searched, so sibling
/// instance subtrees cannot contaminate each other; if the anchor's subtree
/// has no placeholder the anchor itself is the container.
pub fn resolve_parent(
    doc: &Document,
    bindings: &BindingConfig,
    anchor: Option<NodeId>,
    name: &str,
) -> Option<NodeId> {
    match anchor {
        None => doc
            .find_by_attr(None, &bindings.template, name)
            .and_then(|placeholder| doc.parent(placeholder)),
        Some(anchor) => match doc.find_by_attr(Some(anchor), &bindings.template, name) {
            Some(placeholder) => doc.parent(placeholder),
            None => Some(anchor),
        },
    }
}
