//! Arena-backed document with structural mutation observation.

use slab::Slab;
use smallvec::SmallVec;
use tokio::sync::mpsc;

use super::node::{Children, ElementData, Node, NodeData, NodeId};

/// Child-list insertions under one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added: Vec<NodeId>,
}

/// Receiving end of an observer registration. Drop it to disconnect.
pub type MutationReceiver = mpsc::UnboundedReceiver<MutationRecord>;

struct Observer {
    root: NodeId,
    tx: mpsc::UnboundedSender<MutationRecord>,
}

/// A live document tree.
///
/// Nodes are created detached and become part of the tree when inserted.
/// Every insertion inside an observed subtree is reported to its observers.
pub struct Document {
    nodes: Slab<Node>,
    root: NodeId,
    next_serial: u64,
    observers: Vec<Observer>,
    /// Doctype declaration seen by the parser, re-emitted by the serializer.
    pub doctype: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Slab::new(),
            root: NodeId { key: 0, serial: 0 },
            next_serial: 0,
            observers: Vec::new(),
            doctype: None,
        };
        doc.root = doc.create_node(NodeData::Document);
        doc
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes held by the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.key).filter(|n| n.serial == id.serial)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.key).filter(|n| n.serial == id.serial)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data. Attribute edits are not structural mutations
    /// and are not reported to observers.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.get_mut(id)?.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `id` exists and its ancestor chain reaches the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Parents of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Preorder descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Concatenated text of a node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        match &node.data {
            NodeData::Text(t) => t.clone(),
            NodeData::Comment(_) => String::new(),
            NodeData::Document | NodeData::Element(_) => {
                let mut out = String::new();
                for d in self.descendants(id) {
                    if let Some(t) = self.get(d).and_then(Node::as_text) {
                        out.push_str(t);
                    }
                }
                out
            }
        }
    }

    /// First element with the given tag name, searching from the root.
    pub fn find_element(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|&id| self.element(id).is_some_and(|e| e.is(name)))
    }

    /// Root content container: `<body>`, or the document root without one.
    pub fn body(&self) -> NodeId {
        self.find_element("body").unwrap_or(self.root)
    }

    pub fn head(&self) -> Option<NodeId> {
        self.find_element("head")
    }

    // =========================================================================
    // Construction (detached)
    // =========================================================================

    fn create_node(&mut self, data: NodeData) -> NodeId {
        let serial = self.next_serial;
        self.next_serial += 1;
        let key = self.nodes.insert(Node {
            serial,
            parent: None,
            children: Children::new(),
            data,
        });
        NodeId { key, serial }
    }

    pub fn create_element(&mut self, element: ElementData) -> NodeId {
        self.create_node(NodeData::Element(element))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create_node(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.create_node(NodeData::Comment(text.to_string()))
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    fn can_have_children(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Document | NodeData::Element(_)))
    }

    /// Unlink `id` from its parent without freeing it.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    /// Detach `id` and free it along with its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get(current) {
                stack.extend(node.children.iter().copied());
                self.nodes.remove(current.key);
            }
        }
    }

    /// Insert `nodes` into `parent` before `reference` (or at the end).
    ///
    /// Returns `false` and leaves the tree untouched if `parent` cannot hold
    /// children, `reference` is not a child of `parent`, or any node is
    /// missing or would become its own ancestor.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        nodes: &[NodeId],
        reference: Option<NodeId>,
    ) -> bool {
        if nodes.is_empty() {
            return true;
        }
        if !self.can_have_children(parent) {
            return false;
        }
        if let Some(r) = reference
            && self.parent(r) != Some(parent)
        {
            return false;
        }
        if nodes
            .iter()
            .any(|&n| !self.contains(n) || n == self.root || self.is_inclusive_ancestor(n, parent))
        {
            return false;
        }

        for &n in nodes {
            self.detach(n);
            if let Some(node) = self.get_mut(n) {
                node.parent = Some(parent);
            }
        }

        let index = reference.and_then(|r| self.children(parent).iter().position(|c| *c == r));
        if let Some(p) = self.get_mut(parent) {
            let at = index.unwrap_or(p.children.len());
            p.children.insert_many(at, nodes.iter().copied());
        }

        self.notify(parent, nodes);
        true
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, &[child], None)
    }

    pub fn append_children(&mut self, parent: NodeId, children: &[NodeId]) -> bool {
        self.insert_before(parent, children, None)
    }

    /// Replace `node` with `replacements` in its parent and free `node`.
    ///
    /// A node without a parent is left alone.
    pub fn replace_with(&mut self, node: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.parent(node) else {
            return false;
        };
        if !self.insert_before(parent, replacements, Some(node)) {
            return false;
        }
        self.remove(node);
        true
    }

    /// Free all children of `parent` and append `children` instead.
    pub fn replace_children(&mut self, parent: NodeId, children: &[NodeId]) -> bool {
        if !self.can_have_children(parent) {
            return false;
        }
        let old: SmallVec<[NodeId; 4]> = self.children(parent).iter().copied().collect();
        for id in old {
            self.remove(id);
        }
        self.insert_before(parent, children, None)
    }

    /// Set text content: text nodes are rewritten in place, containers get
    /// a single text child (or none for an empty string).
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        if let NodeData::Text(t) | NodeData::Comment(t) = &mut node.data {
            *t = text.to_string();
            return true;
        }

        if text.is_empty() {
            return self.replace_children(id, &[]);
        }
        let child = self.create_text(text);
        if self.replace_children(id, &[child]) {
            true
        } else {
            self.remove(child);
            false
        }
    }

    /// Merge adjacent text children of `parent` and drop empty ones.
    pub fn normalize(&mut self, parent: NodeId) {
        let children: Vec<NodeId> = self.children(parent).to_vec();
        let mut run: Option<NodeId> = None;

        for child in children {
            let Some(text) = self.get(child).and_then(Node::as_text).map(str::to_string) else {
                run = None;
                continue;
            };
            if text.is_empty() {
                self.remove(child);
                continue;
            }
            match run {
                Some(head) => {
                    if let Some(NodeData::Text(t)) = self.get_mut(head).map(|n| &mut n.data) {
                        t.push_str(&text);
                    }
                    self.remove(child);
                }
                None => run = Some(child),
            }
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Observe child-list insertions anywhere in `root`'s subtree.
    pub fn observe(&mut self, root: NodeId) -> MutationReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(Observer { root, tx });
        rx
    }

    /// Number of connected observers.
    pub fn observer_count(&self) -> usize {
        self.observers.iter().filter(|o| !o.tx.is_closed()).count()
    }

    fn notify(&mut self, parent: NodeId, added: &[NodeId]) {
        self.observers.retain(|o| !o.tx.is_closed());
        if self.observers.is_empty() {
            return;
        }
        let targets: Vec<_> = self
            .observers
            .iter()
            .enumerate()
            .filter(|(_, o)| self.is_inclusive_ancestor(o.root, parent))
            .map(|(i, _)| i)
            .collect();
        for i in targets {
            let _ = self.observers[i].tx.send(MutationRecord {
                target: parent,
                added: added.to_vec(),
            });
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Descendants<'_> {
    /// Do not descend into the children of the node most recently yielded.
    ///
    /// Only valid right after `next()` returned that node.
    pub fn skip_children(&mut self, of: NodeId) {
        let count = self.doc.children(of).len();
        let keep = self.stack.len().saturating_sub(count);
        self.stack.truncate(keep);
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}
