//! Reversible Mutator.
//!
//! Splices rendered bionic fragments into live content and keeps enough
//! state to put the original text back.
//!
//! Two target shapes are accepted:
//!
//! - a **text node** with a parent: the node is replaced in its parent by the
//!   rendered nodes; restore unwraps the `bionic-word` containers
//! - a **leaf element** (every child a text node): its children are replaced
//!   and it gains the `bionic-processed` class; restore writes the ledger's
//!   original text back
//!
//! Text that renders identically (no word of two or more characters) is left
//! alone, so the renderer's own plain-text output never comes back through
//! here as new work.

mod ledger;

pub use ledger::{DEFAULT_CAPACITY, Eviction, RestorationLedger};

use rustc_hash::FxHashSet;

use crate::bionic::{PrefixLength, has_emphasis, markers, render_nodes, split};
use crate::debug;
use crate::dom::{Document, ElementData, NodeId, Selector};

/// Result of [`ReversibleMutator::apply_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Transformed,
    Skipped(SkipReason),
}

impl Applied {
    #[inline]
    pub fn is_transformed(&self) -> bool {
        matches!(self, Self::Transformed)
    }
}

/// Why a node was left untouched. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyProcessed,
    /// Freed, detached, or a text node without a parent.
    Missing,
    /// An element with element children; only leaves are rewritten.
    NotLeaf,
    NoText,
    /// Fewer than three characters after trimming.
    TooShort,
    InsideBionicWord,
    /// No word long enough to split.
    NothingToEmphasize,
}

/// What [`ReversibleMutator::restore_all`] put back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// `bionic-word` containers unwrapped.
    pub words: usize,
    /// Leaf elements restored from the ledger.
    pub elements: usize,
}

enum Target {
    Text,
    Element,
}

#[derive(Debug, Default)]
pub struct ReversibleMutator {
    ledger: RestorationLedger,
}

impl ReversibleMutator {
    pub fn new(capacity: usize) -> Self {
        Self {
            ledger: RestorationLedger::with_capacity(capacity),
        }
    }

    pub fn ledger(&self) -> &RestorationLedger {
        &self.ledger
    }

    #[inline]
    pub fn is_processed(&self, node: NodeId) -> bool {
        self.ledger.is_processed(node)
    }

    /// Transform `node` in place.
    pub fn apply_to(&mut self, doc: &mut Document, node: NodeId, prefix: PrefixLength) -> Applied {
        match self.try_apply(doc, node, prefix) {
            Ok(()) => Applied::Transformed,
            Err(reason) => Applied::Skipped(reason),
        }
    }

    fn try_apply(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        prefix: PrefixLength,
    ) -> Result<(), SkipReason> {
        if self.ledger.is_processed(node) {
            return Err(SkipReason::AlreadyProcessed);
        }
        if !doc.is_attached(node) {
            return Err(SkipReason::Missing);
        }
        let target = classify(doc, node)?;
        if inside_bionic_word(doc, node) {
            return Err(SkipReason::InsideBionicWord);
        }

        let text = doc.text_content(node);
        if text.is_empty() {
            return Err(SkipReason::NoText);
        }
        if text.trim().chars().count() < markers::MIN_TEXT_LEN {
            return Err(SkipReason::TooShort);
        }

        let segments = split(&text, prefix);
        if !has_emphasis(&segments) {
            return Err(SkipReason::NothingToEmphasize);
        }

        let eviction = self.ledger.evict_if_over_capacity(doc);
        if eviction.total() > 0 {
            debug!("mutator"; "ledger full, evicted {} detached and {} oldest", eviction.detached, eviction.oldest);
        }

        let fragment = render_nodes(doc, &segments);
        let spliced = match target {
            Target::Text => doc.replace_with(node, &fragment),
            Target::Element => doc.replace_children(node, &fragment),
        };
        if !spliced {
            for id in fragment {
                doc.remove(id);
            }
            return Err(SkipReason::Missing);
        }

        if let Target::Element = target
            && let Some(element) = doc.element_mut(node)
        {
            element.add_class(markers::PROCESSED);
        }
        self.ledger.record(node, text);
        Ok(())
    }

    /// Put every transformed node back to its original text and clear the
    /// ledger.
    pub fn restore_all(&mut self, doc: &mut Document) -> RestoreReport {
        let mut report = RestoreReport::default();
        let mut touched: FxHashSet<NodeId> = FxHashSet::default();
        let root = doc.root();

        // Leaf elements first: their ledger text covers any word containers
        // inside them.
        let processed = Selector::class(markers::PROCESSED);
        for id in doc.select_all(root, &processed) {
            let original = match self.ledger.original(id) {
                Some(text) => text.to_string(),
                None => doc.text_content(id),
            };
            doc.set_text_content(id, &original);
            if let Some(element) = doc.element_mut(id) {
                element.remove_class(markers::PROCESSED);
            }
            report.elements += 1;
        }

        let words = Selector::class(markers::WORD);
        for id in doc.select_all(root, &words) {
            // Nested containers vanish with their outer one.
            if !doc.contains(id) {
                continue;
            }
            let Some(parent) = doc.parent(id) else {
                continue;
            };
            let text = doc.text_content(id);
            let plain = doc.create_text(&text);
            if doc.replace_with(id, &[plain]) {
                touched.insert(parent);
                report.words += 1;
            } else {
                doc.remove(plain);
            }
        }

        for parent in touched {
            doc.normalize(parent);
        }

        debug!("mutator"; "restored {} words, {} elements", report.words, report.elements);
        self.ledger.clear();
        report
    }
}

fn classify(doc: &Document, node: NodeId) -> Result<Target, SkipReason> {
    let Some(data) = doc.get(node) else {
        return Err(SkipReason::Missing);
    };
    if data.is_text() {
        return match data.parent() {
            Some(_) => Ok(Target::Text),
            None => Err(SkipReason::Missing),
        };
    }
    let Some(element) = data.as_element() else {
        return Err(SkipReason::NoText);
    };
    if element.has_class(markers::PROCESSED) {
        return Err(SkipReason::AlreadyProcessed);
    }
    if is_marker(element) {
        return Err(SkipReason::InsideBionicWord);
    }
    let children = data.children();
    if children.is_empty() {
        return Err(SkipReason::NoText);
    }
    if children
        .iter()
        .all(|&c| doc.get(c).is_some_and(|n| n.is_text()))
    {
        Ok(Target::Element)
    } else {
        Err(SkipReason::NotLeaf)
    }
}

fn is_marker(element: &ElementData) -> bool {
    element.has_class(markers::WORD)
        || element.has_class(markers::BOLD)
        || element.has_class(markers::NORMAL)
}

fn inside_bionic_word(doc: &Document, node: NodeId) -> bool {
    doc.ancestors(node)
        .filter_map(|a| doc.element(a))
        .any(|e| e.has_class(markers::WORD))
}
