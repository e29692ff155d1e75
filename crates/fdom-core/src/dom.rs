#![forbid(unsafe_code)]

//! Arena-backed live document.
//!
//! # Design
//!
//! Nodes live in a [`SlotMap`] keyed by [`NodeId`]. Every node records its
//! parent; elements additionally own an ordered child list, ordered
//! attributes, and per-event listener lists. Removing or replacing a child
//! frees the detached subtree, so a stale `NodeId` reports
//! [`DomError::NodeNotFound`] instead of aliasing a new node.
//!
//! # Invariants
//!
//! 1. A node appears in at most one parent's child list, and its `parent`
//!    field names that list's owner.
//! 2. Text nodes never have children.
//! 3. The body node is never freed.
//! 4. Every mutating call bumps exactly one [`DocumentStats`] counter per
//!    observable change (no-op removals do not count).

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::error::{DomError, Result};
use crate::event::Listener;

new_key_type! {
    /// Stable handle to a node in a [`Document`].
    pub struct NodeId;
}

/// Documents are shared between the dispatcher and the listeners it installs.
pub type SharedDocument = Rc<RefCell<Document>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

struct ElementData {
    tag: String,
    attributes: SmallVec<[(String, String); 4]>,
    listeners: SmallVec<[(String, Listener); 2]>,
    children: Vec<NodeId>,
}

enum NodeData {
    Element(ElementData),
    Text(String),
}

struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

/// Mutation counters, used to observe how much work a patch performed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStats {
    pub elements_created: u64,
    pub texts_created: u64,
    pub attributes_set: u64,
    pub attributes_removed: u64,
    pub text_updates: u64,
    pub listeners_added: u64,
    pub listeners_removed: u64,
    pub nodes_inserted: u64,
    pub nodes_removed: u64,
    pub nodes_replaced: u64,
}

impl DocumentStats {
    /// Total number of mutations applied to attached or detached nodes.
    ///
    /// Node creation is not a mutation; inserting the created node is.
    #[must_use]
    pub fn mutations(&self) -> u64 {
        self.attributes_set
            + self.attributes_removed
            + self.text_updates
            + self.listeners_added
            + self.listeners_removed
            + self.nodes_inserted
            + self.nodes_removed
            + self.nodes_replaced
    }
}

/// The live document tree.
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
    stats: DocumentStats,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("body", &self.body)
            .field("stats", &self.stats)
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only an empty `body` element.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node {
            parent: None,
            data: NodeData::Element(ElementData {
                tag: "body".to_owned(),
                attributes: SmallVec::new(),
                listeners: SmallVec::new(),
                children: Vec::new(),
            }),
        });
        Self {
            nodes,
            body,
            stats: DocumentStats::default(),
        }
    }

    /// Create a new document wrapped for sharing.
    #[must_use]
    pub fn new_shared() -> SharedDocument {
        Rc::new(RefCell::new(Self::new()))
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of nodes currently alive, including the body.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn stats(&self) -> DocumentStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = DocumentStats::default();
    }

    // ── Creation ─────────────────────────────────────────────────────

    /// Create a detached element.
    ///
    /// Rejects names a browser would reject with `InvalidCharacterError`.
    pub fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        if !is_valid_name(tag) || !tag.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(DomError::InvalidTagName {
                tag: tag.to_owned(),
            });
        }
        self.stats.elements_created += 1;
        Ok(self.nodes.insert(Node {
            parent: None,
            data: NodeData::Element(ElementData {
                tag: tag.to_ascii_lowercase(),
                attributes: SmallVec::new(),
                listeners: SmallVec::new(),
                children: Vec::new(),
            }),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.stats.texts_created += 1;
        self.nodes.insert(Node {
            parent: None,
            data: NodeData::Text(text.into()),
        })
    }

    // ── Inspection ───────────────────────────────────────────────────

    pub fn kind(&self, id: NodeId) -> Result<NodeKind> {
        Ok(match self.node(id)?.data {
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
        })
    }

    pub fn tag(&self, id: NodeId) -> Result<&str> {
        Ok(&self.element(id)?.tag)
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Result<&str> {
        match &self.node(id)?.data {
            NodeData::Text(text) => Ok(text),
            NodeData::Element(_) => Err(DomError::NotAText { node: id }),
        }
    }

    /// Concatenated content of every text node under `id`, in tree order.
    pub fn text_content(&self, id: NodeId) -> Result<String> {
        let mut out = String::new();
        self.collect_text(id, &mut out)?;
        Ok(out)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) -> Result<()> {
        match &self.node(id)?.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(el) => {
                for &child in &el.children {
                    self.collect_text(child, out)?;
                }
            }
        }
        Ok(())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Result<Option<&str>> {
        Ok(self
            .element(id)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str()))
    }

    /// Attributes in insertion order.
    pub fn attributes(&self, id: NodeId) -> Result<&[(String, String)]> {
        Ok(&self.element(id)?.attributes)
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children of `id`. Text nodes report an empty list.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Ok(&el.children),
            NodeData::Text(_) => Ok(&[]),
        }
    }

    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).ok()?.get(index).copied()
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.node(id)?;
        let mut path = vec![id];
        let mut cursor = self.parent(id);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.parent(node);
        }
        Ok(path)
    }

    /// Elements under `root` (inclusive) in document order.
    pub fn descendants(&self, root: NodeId) -> Result<Vec<NodeId>> {
        self.node(root)?;
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(Node {
                data: NodeData::Element(el),
                ..
            }) = self.nodes.get(id)
            {
                out.push(id);
                stack.extend(el.children.iter().rev().copied());
            }
        }
        Ok(out)
    }

    // ── Attributes ───────────────────────────────────────────────────

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        if !is_valid_name(name) {
            return Err(DomError::InvalidAttributeName {
                name: name.to_owned(),
            });
        }
        let value = value.into();
        let el = self.element_mut(id)?;
        match el.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => el.attributes.push((name.to_owned(), value)),
        }
        self.stats.attributes_set += 1;
        Ok(())
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool> {
        let el = self.element_mut(id)?;
        let Some(pos) = el.attributes.iter().position(|(n, _)| n == name) else {
            return Ok(false);
        };
        el.attributes.remove(pos);
        self.stats.attributes_removed += 1;
        Ok(true)
    }

    // ── Text ─────────────────────────────────────────────────────────

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        match &mut self.node_mut(id)?.data {
            NodeData::Text(existing) => *existing = text.into(),
            NodeData::Element(_) => return Err(DomError::NotAText { node: id }),
        }
        self.stats.text_updates += 1;
        Ok(())
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub fn add_event_listener(&mut self, id: NodeId, event: &str, listener: Listener) -> Result<()> {
        self.element_mut(id)?
            .listeners
            .push((event.to_owned(), listener));
        self.stats.listeners_added += 1;
        Ok(())
    }

    /// Remove every listener registered for `event`. Returns how many were removed.
    pub fn remove_event_listeners(&mut self, id: NodeId, event: &str) -> Result<usize> {
        let el = self.element_mut(id)?;
        let before = el.listeners.len();
        el.listeners.retain(|(name, _)| name != event);
        let removed = before - el.listeners.len();
        self.stats.listeners_removed += removed as u64;
        Ok(removed)
    }

    /// Listeners for `event` on `id`, in registration order.
    ///
    /// Returns an empty list for vanished nodes so that dispatch can continue
    /// past a node removed by an earlier listener.
    #[must_use]
    pub fn listeners(&self, id: NodeId, event: &str) -> Vec<Listener> {
        match self.nodes.get(id) {
            Some(Node {
                data: NodeData::Element(el),
                ..
            }) => el
                .listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, listener)| Rc::clone(listener))
                .collect(),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.nodes.get(id).map_or(0, |node| match &node.data {
            NodeData::Element(el) => el.listeners.iter().filter(|(name, _)| name == event).count(),
            NodeData::Text(_) => 0,
        })
    }

    // ── Tree mutation ────────────────────────────────────────────────

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference` (or at the end).
    ///
    /// A child that already has a parent is moved, as in the browser DOM.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        self.check_insertable(parent, child)?;
        if let Some(reference) = reference {
            if reference == child || !self.children(parent)?.contains(&reference) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }
        if let Some(old_parent) = self.parent(child) {
            self.element_mut(old_parent)?.children.retain(|&c| c != child);
        }
        let el = self.element_mut(parent)?;
        let index = reference
            .and_then(|reference| el.children.iter().position(|&c| c == reference))
            .unwrap_or(el.children.len());
        el.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.stats.nodes_inserted += 1;
        Ok(())
    }

    /// Detach `child` from `parent` and free its subtree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let el = self.element_mut(parent)?;
        let pos = el
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild { parent, child })?;
        el.children.remove(pos);
        self.free_subtree(child);
        self.stats.nodes_removed += 1;
        Ok(())
    }

    /// Put `new_child` at `old_child`'s position and free `old_child`'s subtree.
    pub fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> Result<()> {
        if new_child == old_child {
            return Ok(());
        }
        self.check_insertable(parent, new_child)?;
        if !self.children(parent)?.contains(&old_child) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        if let Some(old_parent) = self.parent(new_child) {
            self.element_mut(old_parent)?
                .children
                .retain(|&c| c != new_child);
        }
        let el = self.element_mut(parent)?;
        if let Some(slot) = el.children.iter_mut().find(|c| **c == old_child) {
            *slot = new_child;
        }
        self.node_mut(new_child)?.parent = Some(parent);
        self.free_subtree(old_child);
        self.stats.nodes_replaced += 1;
        Ok(())
    }

    /// Remove and free every child of `parent`.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.element_mut(parent)?.children);
        for child in children {
            self.free_subtree(child);
            self.stats.nodes_removed += 1;
        }
        Ok(())
    }

    /// Free a detached node and its subtree.
    ///
    /// Attached nodes must go through [`Document::remove_child`]; the body
    /// cannot be discarded.
    pub fn discard(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        if id == self.body || self.parent(id).is_some() {
            return Err(DomError::HierarchyRequest {
                parent: self.parent(id).unwrap_or(self.body),
                child: id,
            });
        }
        self.free_subtree(id);
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.element(parent)?;
        self.node(child)?;
        if child == self.body || self.ancestors(parent)?.contains(&child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(Node {
                data: NodeData::Element(el),
                ..
            }) = self.nodes.remove(id)
            {
                stack.extend(el.children);
            }
        }
    }

    // ── Lookup helpers ───────────────────────────────────────────────

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(DomError::NodeNotFound { node: id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or(DomError::NodeNotFound { node: id })
    }

    fn element(&self, id: NodeId) -> Result<&ElementData> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(DomError::NotAnElement { node: id }),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(DomError::NotAnElement { node: id }),
        }
    }
}

/// XML-ish name check shared by tags and attributes.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::listener;

    fn doc_with_list(n: usize) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let list = doc.create_element("ul").unwrap();
        doc.append_child(doc.body(), list).unwrap();
        let items = (0..n)
            .map(|i| {
                let li = doc.create_element("li").unwrap();
                let text = doc.create_text(format!("item {i}"));
                doc.append_child(li, text).unwrap();
                doc.append_child(list, li).unwrap();
                li
            })
            .collect();
        (doc, list, items)
    }

    #[test]
    fn new_document_has_body() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.body()).unwrap(), "body");
        assert_eq!(doc.len(), 1);
        assert!(doc.children(doc.body()).unwrap().is_empty());
    }

    #[test]
    fn invalid_tag_names_rejected() {
        let mut doc = Document::new();
        for bad in ["", "1div", "di v", "<p>", "-x"] {
            assert!(
                matches!(doc.create_element(bad), Err(DomError::InvalidTagName { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(doc.create_element("my-widget").is_ok());
        assert_eq!(doc.stats().elements_created, 1);
    }

    #[test]
    fn tag_names_are_lowercased() {
        let mut doc = Document::new();
        let el = doc.create_element("DIV").unwrap();
        assert_eq!(doc.tag(el).unwrap(), "div");
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let mut doc = Document::new();
        let el = doc.create_element("a").unwrap();
        doc.set_attribute(el, "href", "/x").unwrap();
        doc.set_attribute(el, "class", "link").unwrap();
        doc.set_attribute(el, "href", "/y").unwrap();
        let attrs = doc.attributes(el).unwrap();
        assert_eq!(attrs[0], ("href".to_owned(), "/y".to_owned()));
        assert_eq!(attrs[1], ("class".to_owned(), "link".to_owned()));
        assert_eq!(doc.stats().attributes_set, 3);
    }

    #[test]
    fn removing_absent_attribute_is_not_counted() {
        let mut doc = Document::new();
        let el = doc.create_element("p").unwrap();
        assert!(!doc.remove_attribute(el, "title").unwrap());
        assert_eq!(doc.stats().attributes_removed, 0);
        doc.set_attribute(el, "title", "t").unwrap();
        assert!(doc.remove_attribute(el, "title").unwrap());
        assert_eq!(doc.attribute(el, "title").unwrap(), None);
        assert_eq!(doc.stats().attributes_removed, 1);
    }

    #[test]
    fn invalid_attribute_name_rejected() {
        let mut doc = Document::new();
        let el = doc.create_element("p").unwrap();
        assert!(matches!(
            doc.set_attribute(el, "a b", "x"),
            Err(DomError::InvalidAttributeName { .. })
        ));
    }

    #[test]
    fn text_nodes_reject_element_operations() {
        let mut doc = Document::new();
        let text = doc.create_text("hi");
        assert!(matches!(
            doc.set_attribute(text, "id", "x"),
            Err(DomError::NotAnElement { .. })
        ));
        let el = doc.create_element("p").unwrap();
        assert!(matches!(
            doc.append_child(text, el),
            Err(DomError::NotAnElement { .. })
        ));
        assert!(doc.children(text).unwrap().is_empty());
    }

    #[test]
    fn remove_child_frees_subtree() {
        let (mut doc, list, items) = doc_with_list(3);
        let before = doc.len();
        doc.remove_child(list, items[1]).unwrap();
        assert_eq!(doc.len(), before - 2);
        assert!(!doc.contains(items[1]));
        assert_eq!(doc.children(list).unwrap(), &[items[0], items[2]]);
        assert_eq!(doc.stats().nodes_removed, 1);
    }

    #[test]
    fn discard_frees_detached_subtree_only() {
        let (mut doc, list, items) = doc_with_list(1);
        let before = doc.len();
        let detached = doc.create_element("div").unwrap();
        let inner = doc.create_text("x");
        doc.append_child(detached, inner).unwrap();
        doc.reset_stats();

        doc.discard(detached).unwrap();
        assert_eq!(doc.len(), before);
        assert!(!doc.contains(inner));
        assert_eq!(doc.stats().mutations(), 0);

        assert!(matches!(doc.discard(items[0]), Err(DomError::HierarchyRequest { .. })));
        assert!(matches!(doc.discard(doc.body()), Err(DomError::HierarchyRequest { .. })));
        assert_eq!(doc.children(list).unwrap(), &[items[0]]);
    }

    #[test]
    fn replace_child_keeps_position() {
        let (mut doc, list, items) = doc_with_list(3);
        let fresh = doc.create_element("li").unwrap();
        doc.replace_child(list, fresh, items[1]).unwrap();
        assert_eq!(doc.children(list).unwrap(), &[items[0], fresh, items[2]]);
        assert_eq!(doc.parent(fresh), Some(list));
        assert!(!doc.contains(items[1]));
    }

    #[test]
    fn replace_with_non_child_fails() {
        let (mut doc, list, _) = doc_with_list(1);
        let stray = doc.create_element("li").unwrap();
        let other = doc.create_element("li").unwrap();
        assert!(matches!(
            doc.replace_child(list, stray, other),
            Err(DomError::NotAChild { .. })
        ));
    }

    #[test]
    fn append_moves_attached_node() {
        let (mut doc, list, items) = doc_with_list(2);
        let other = doc.create_element("ol").unwrap();
        doc.append_child(doc.body(), other).unwrap();
        doc.append_child(other, items[0]).unwrap();
        assert_eq!(doc.children(list).unwrap(), &[items[1]]);
        assert_eq!(doc.children(other).unwrap(), &[items[0]]);
        assert_eq!(doc.parent(items[0]), Some(other));
    }

    #[test]
    fn insert_before_reference() {
        let (mut doc, list, items) = doc_with_list(2);
        let li = doc.create_element("li").unwrap();
        doc.insert_before(list, li, Some(items[1])).unwrap();
        assert_eq!(doc.children(list).unwrap(), &[items[0], li, items[1]]);
    }

    #[test]
    fn cycles_rejected() {
        let (mut doc, list, items) = doc_with_list(1);
        assert!(matches!(
            doc.append_child(items[0], list),
            Err(DomError::HierarchyRequest { .. })
        ));
        let body = doc.body();
        assert!(matches!(
            doc.append_child(list, body),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn clear_children_empties_element() {
        let (mut doc, list, _) = doc_with_list(4);
        doc.clear_children(list).unwrap();
        assert!(doc.children(list).unwrap().is_empty());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn text_content_concatenates_in_order() {
        let (doc, list, _) = doc_with_list(2);
        assert_eq!(doc.text_content(list).unwrap(), "item 0item 1");
    }

    #[test]
    fn stale_ids_report_not_found() {
        let (mut doc, list, items) = doc_with_list(1);
        doc.remove_child(list, items[0]).unwrap();
        assert!(matches!(
            doc.tag(items[0]),
            Err(DomError::NodeNotFound { .. })
        ));
        assert_eq!(doc.parent(items[0]), None);
        assert!(doc.listeners(items[0], "click").is_empty());
    }

    #[test]
    fn listeners_added_and_removed_by_event() {
        let mut doc = Document::new();
        let button = doc.create_element("button").unwrap();
        let noop = listener(|_| Ok(()));
        doc.add_event_listener(button, "click", Rc::clone(&noop)).unwrap();
        doc.add_event_listener(button, "click", Rc::clone(&noop)).unwrap();
        doc.add_event_listener(button, "input", noop).unwrap();
        assert_eq!(doc.listener_count(button, "click"), 2);
        assert_eq!(doc.remove_event_listeners(button, "click").unwrap(), 2);
        assert_eq!(doc.listener_count(button, "click"), 0);
        assert_eq!(doc.listener_count(button, "input"), 1);
        let stats = doc.stats();
        assert_eq!(stats.listeners_added, 3);
        assert_eq!(stats.listeners_removed, 2);
    }

    #[test]
    fn descendants_in_document_order() {
        let (doc, list, items) = doc_with_list(2);
        let order = doc.descendants(doc.body()).unwrap();
        assert_eq!(order, vec![doc.body(), list, items[0], items[1]]);
    }

    #[test]
    fn mutations_excludes_creation() {
        let mut doc = Document::new();
        let _ = doc.create_element("p").unwrap();
        let _ = doc.create_text("x");
        assert_eq!(doc.stats().mutations(), 0);
        doc.reset_stats();
        assert_eq!(doc.stats(), DocumentStats::default());
    }
}
