//! Generic-mode traversal: visible text nodes in document order.

use crate::bionic::markers;
use crate::dom::{Document, ElementData, NodeId};
use crate::utils::html::is_non_content_element;

/// Whether `element` hides itself and its subtree.
pub fn is_hidden(element: &ElementData) -> bool {
    if element.has_attr("hidden") {
        return true;
    }
    if element
        .attr("aria-hidden")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    {
        return true;
    }
    element.attr("style").is_some_and(hides_display)
}

/// Inline style sets `display: none`.
fn hides_display(style: &str) -> bool {
    style.split(';').any(|decl| {
        let Some((name, value)) = decl.split_once(':') else {
            return false;
        };
        name.trim().eq_ignore_ascii_case("display")
            && value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .eq_ignore_ascii_case("none")
    })
}

/// Element whose subtree the walker never enters.
fn blocks_descent(element: &ElementData) -> bool {
    is_non_content_element(&element.name)
        || is_hidden(element)
        || element.has_class(markers::WORD)
        || element.has_class(markers::PROCESSED)
}

/// Whether `id` sits under a subtree the walker would have skipped.
pub fn in_skipped_subtree(doc: &Document, id: NodeId) -> bool {
    doc.ancestors(id)
        .filter_map(|a| doc.element(a))
        .any(blocks_descent)
}

/// Snapshot of the text nodes under `root` worth transforming.
///
/// Depth-first, document order. The walk is taken once; a later pass walks
/// again from the root.
#[derive(Debug)]
pub struct TextWalker {
    nodes: std::vec::IntoIter<NodeId>,
}

impl TextWalker {
    pub fn new(doc: &Document, root: NodeId) -> Self {
        let mut found = Vec::new();
        if root == doc.root() || !in_skipped_subtree(doc, root) {
            collect_into(doc, root, &mut found);
        }
        Self {
            nodes: found.into_iter(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.nodes.len()
    }
}

impl Iterator for TextWalker {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.nodes.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

/// Candidates under `root`, `root` included when it is itself a text node.
fn collect_into(doc: &Document, root: NodeId, out: &mut Vec<NodeId>) {
    if let Some(node) = doc.get(root) {
        if let Some(text) = node.as_text() {
            if !text.trim().is_empty() {
                out.push(root);
            }
            return;
        }
        if node.as_element().is_some_and(blocks_descent) {
            return;
        }
    }

    let mut walk = doc.descendants(root);
    while let Some(id) = walk.next() {
        let Some(node) = doc.get(id) else {
            continue;
        };
        if let Some(element) = node.as_element() {
            if blocks_descent(element) {
                walk.skip_children(id);
            }
        } else if node.as_text().is_some_and(|t| !t.trim().is_empty()) {
            out.push(id);
        }
    }
}

/// Text candidates inside freshly inserted nodes.
///
/// Each added node contributes itself (text) or its descendant text
/// (element), unless it landed inside a skipped subtree.
pub fn collect_added(doc: &Document, added: &[NodeId]) -> Vec<NodeId> {
    let mut out = Vec::new();
    for &id in added {
        if !doc.is_attached(id) || in_skipped_subtree(doc, id) {
            continue;
        }
        collect_into(doc, id, &mut out);
    }
    out
}
