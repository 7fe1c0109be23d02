//! Live element tree that the reconciler creates, mutates, and prunes
//!
//! Nodes live in an arena owned by a [`Document`] and are addressed by
//! [`NodeId`] handles. Handles stay valid for the lifetime of the document,
//! including after a node is detached — reconciliation relies on that to keep
//! instance identity stable across passes.

use std::fmt::Write;

/// Stable handle to a node in a [`Document`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Reconciliation classification of a node
///
/// `Fresh` is the pre-reconciliation state (authored markup, new clones).
/// The other three are mutually exclusive per pass; `Removed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Fresh,
    Added,
    Updated,
    Removed,
}

#[derive(Debug)]
struct Node {
    tag: String,
    text: Option<String>,
    /// Attributes in insertion order
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    state: Lifecycle,
}

/// Arena-backed element tree
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the synthetic root
    pub fn new() -> Self {
        let root_node = Node {
            tag: "#document".to_string(),
            text: None,
            attrs: Vec::new(),
            parent: None,
            children: Vec::new(),
            state: Lifecycle::Fresh,
        };
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// The synthetic root under which top-level elements hang
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a new detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_string(),
            text: None,
            attrs: Vec::new(),
            parent: None,
            children: Vec::new(),
            state: Lifecycle::Fresh,
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn state(&self, id: NodeId) -> Lifecycle {
        self.node(id).state
    }

    pub fn set_state(&mut self, id: NodeId, state: Lifecycle) {
        self.node_mut(id).state = state;
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).text.as_deref()
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.node_mut(id).text = Some(text.to_string());
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node(id)
            .attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) {
        let node = self.node_mut(id);
        match node.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => node.attrs.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, key: &str) {
        self.node_mut(id).attrs.retain(|(k, _)| k != key);
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        &self.node(id).attrs
    }

    /// Append `child` as the last child of `parent`, detaching it first if
    /// it already hangs somewhere else
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Unlink a node from its parent. The node stays allocated and keeps its
    /// subtree; there is no way to re-enter the tree except `append_child`.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Deep-clone a subtree. The clone is detached, carries the same tags,
    /// text, and attributes, and every node starts out `Fresh`.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let tag = self.node(id).tag.clone();
        let clone = self.create_element(&tag);
        self.node_mut(clone).text = self.node(id).text.clone();
        self.node_mut(clone).attrs = self.node(id).attrs.clone();
        let children = self.node(id).children.clone();
        for child in children {
            let child_clone = self.clone_subtree(child);
            self.append_child(clone, child_clone);
        }
        clone
    }

    /// Whether a node is reachable from the root through parent links
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current == self.root
    }

    /// All proper descendants of `id` in document (pre-)order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.node(next).children.iter().rev().copied());
        }
        out
    }

    /// First element in document order whose attribute `key` equals `value`.
    /// `scope` limits the search to proper descendants of that node; `None`
    /// searches the whole document.
    pub fn find_by_attr(&self, scope: Option<NodeId>, key: &str, value: &str) -> Option<NodeId> {
        let start = scope.unwrap_or(self.root);
        self.descendants(start)
            .into_iter()
            .find(|&n| self.attr(n, key) == Some(value))
    }

    /// Direct children of `parent` that carry attribute `key`, optionally
    /// restricted to a specific value
    pub fn children_with_attr(
        &self,
        parent: NodeId,
        key: &str,
        value: Option<&str>,
    ) -> Vec<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .filter(|&c| match (self.attr(c, key), value) {
                (Some(v), Some(want)) => v == want,
                (Some(_), None) => true,
                (None, _) => false,
            })
            .collect()
    }

    /// Render the whole tree back into markup source form
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root) {
            self.write_node(&mut out, child, 0);
        }
        out
    }

    /// Render a single subtree in markup source form
    pub fn subtree_source(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, 0);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, depth: usize) {
        let node = self.node(id);
        let indent = "    ".repeat(depth);
        let _ = write!(out, "{}{}", indent, node.tag);
        if let Some(text) = &node.text {
            let _ = write!(out, " \"{}\"", text.replace('"', "\\\""));
        }
        if !node.attrs.is_empty() {
            let rendered: Vec<String> = node
                .attrs
                .iter()
                .map(|(k, v)| format!("{}: \"{}\"", k, v.replace('"', "\\\"")))
                .collect();
            let _ = write!(out, " [{}]", rendered.join(", "));
        }
        if node.children.is_empty() {
            out.push('\n');
        } else {
            out.push_str(" {\n");
            for &child in &node.children {
                self.write_node(out, child, depth + 1);
            }
            let _ = writeln!(out, "{}}}", indent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let list = doc.create_element("ul");
        doc.append_child(root, list);
        let item = doc.create_element("li");
        doc.set_attr(item, "template", "row");
        doc.append_child(list, item);
        let label = doc.create_element("span");
        doc.set_attr(label, "bind-text", "title");
        doc.append_child(item, label);
        (doc, list, item, label)
    }

    #[test]
    fn test_append_and_detach() {
        let (mut doc, list, item, _) = sample();
        assert_eq!(doc.parent(item), Some(list));
        doc.detach(item);
        assert_eq!(doc.parent(item), None);
        assert!(doc.children(list).is_empty());
        // Detached subtree stays intact
        assert_eq!(doc.children(item).len(), 1);
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let (mut doc, _, item, _) = sample();
        doc.set_attr(item, "key", "1");
        doc.set_attr(item, "template", "other");
        assert_eq!(doc.attr(item, "template"), Some("other"));
        assert_eq!(doc.attrs(item)[0].0, "template");
    }

    #[test]
    fn test_clone_subtree_is_independent() {
        let (mut doc, list, item, label) = sample();
        let clone = doc.clone_subtree(item);
        assert_eq!(doc.parent(clone), None);
        assert_eq!(doc.tag(clone), "li");
        assert_eq!(doc.children(clone).len(), 1);
        // Mutating the clone leaves the original alone
        let clone_label = doc.children(clone)[0];
        doc.set_text(clone_label, "hello");
        assert_eq!(doc.text(label), None);
        assert_eq!(doc.children(list), &[item]);
    }

    #[test]
    fn test_find_by_attr_scoping() {
        let (mut doc, list, item, label) = sample();
        assert_eq!(doc.find_by_attr(None, "template", "row"), Some(item));
        assert_eq!(doc.find_by_attr(Some(item), "bind-text", "title"), Some(label));
        // Scoped search excludes the scope node itself
        assert_eq!(doc.find_by_attr(Some(item), "template", "row"), None);
        assert_eq!(doc.find_by_attr(Some(list), "template", "missing"), None);
    }

    #[test]
    fn test_is_attached_follows_parent_links() {
        let (mut doc, _, item, label) = sample();
        assert!(doc.is_attached(item));
        assert!(doc.is_attached(label));
        doc.detach(item);
        // The whole detached subtree is unreachable
        assert!(!doc.is_attached(item));
        assert!(!doc.is_attached(label));
        let orphan = doc.create_element("div");
        assert!(!doc.is_attached(orphan));
    }

    #[test]
    fn test_children_with_attr() {
        let (mut doc, list, item, _) = sample();
        let other = doc.create_element("li");
        doc.set_attr(other, "template", "footer");
        doc.append_child(list, other);
        let plain = doc.create_element("li");
        doc.append_child(list, plain);

        assert_eq!(doc.children_with_attr(list, "template", None), vec![item, other]);
        assert_eq!(
            doc.children_with_attr(list, "template", Some("row")),
            vec![item]
        );
    }

    #[test]
    fn test_source_round_trip_shape() {
        let (doc, ..) = sample();
        let source = doc.to_source();
        assert!(source.contains("ul {"));
        assert!(source.contains("li [template: \"row\"]"));
        assert!(source.contains("span [bind-text: \"title\"]"));
    }
}
