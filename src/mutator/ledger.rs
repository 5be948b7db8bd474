//! Restoration ledger.
//!
//! Maps node identity to the text the node held before it was transformed,
//! plus the set of identities already processed. Bounded: once full, entries
//! for nodes no longer attached to the document go first, then the oldest
//! half by insertion order.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::dom::{Document, NodeId};

pub const DEFAULT_CAPACITY: usize = 10_000;

/// Outcome of one eviction round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Eviction {
    /// Entries dropped because their node was detached.
    pub detached: usize,
    /// Entries dropped by age.
    pub oldest: usize,
}

impl Eviction {
    pub fn total(&self) -> usize {
        self.detached + self.oldest
    }
}

#[derive(Debug)]
pub struct RestorationLedger {
    originals: FxHashMap<NodeId, String>,
    processed: FxHashSet<NodeId>,
    /// Insertion order of `originals` keys.
    order: VecDeque<NodeId>,
    capacity: usize,
}

impl Default for RestorationLedger {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl RestorationLedger {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            originals: FxHashMap::default(),
            processed: FxHashSet::default(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.originals.len() >= self.capacity
    }

    #[inline]
    pub fn is_processed(&self, id: NodeId) -> bool {
        self.processed.contains(&id)
    }

    pub fn original(&self, id: NodeId) -> Option<&str> {
        self.originals.get(&id).map(String::as_str)
    }

    /// Record original text and mark the node processed.
    pub fn record(&mut self, id: NodeId, original: String) {
        if self.originals.insert(id, original).is_none() {
            self.order.push_back(id);
        }
        self.processed.insert(id);
    }

    /// Drop entries until there is room for one more.
    ///
    /// Detached nodes are purged first; if that is not enough the oldest
    /// half goes.
    pub fn evict_if_over_capacity(&mut self, doc: &Document) -> Eviction {
        let mut eviction = Eviction::default();
        if !self.is_full() {
            return eviction;
        }

        let before = self.originals.len();
        self.originals.retain(|id, _| doc.is_attached(*id));
        eviction.detached = before - self.originals.len();
        self.sync_order();

        if self.is_full() {
            let half = self.order.len().div_ceil(2);
            for id in self.order.drain(..half) {
                self.originals.remove(&id);
                self.processed.remove(&id);
            }
            eviction.oldest = half;
        }

        eviction
    }

    /// Drop order and processed entries whose original was removed.
    fn sync_order(&mut self) {
        let originals = &self.originals;
        self.order.retain(|id| originals.contains_key(id));
        self.processed.retain(|id| originals.contains_key(id));
    }

    pub fn clear(&mut self) {
        self.originals.clear();
        self.processed.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached_texts(doc: &mut Document, n: usize) -> Vec<NodeId> {
        let root = doc.root();
        (0..n)
            .map(|i| {
                let id = doc.create_text(&format!("t{i}"));
                doc.append_child(root, id);
                id
            })
            .collect()
    }

    #[test]
    fn test_record_and_lookup() {
        let mut doc = Document::new();
        let ids = attached_texts(&mut doc, 1);
        let mut ledger = RestorationLedger::with_capacity(4);
        ledger.record(ids[0], "original".into());
        assert!(ledger.is_processed(ids[0]));
        assert_eq!(ledger.original(ids[0]), Some("original"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_not_full_is_noop() {
        let mut doc = Document::new();
        let ids = attached_texts(&mut doc, 2);
        let mut ledger = RestorationLedger::with_capacity(4);
        for id in &ids {
            ledger.record(*id, String::new());
        }
        assert_eq!(ledger.evict_if_over_capacity(&doc).total(), 0);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_detached_purged_first() {
        let mut doc = Document::new();
        let ids = attached_texts(&mut doc, 4);
        let mut ledger = RestorationLedger::with_capacity(4);
        for id in &ids {
            ledger.record(*id, String::new());
        }
        doc.remove(ids[1]);
        doc.detach(ids[2]);

        let eviction = ledger.evict_if_over_capacity(&doc);
        assert_eq!(eviction.detached, 2);
        assert_eq!(eviction.oldest, 0);
        assert_eq!(ledger.len(), 2);
        assert!(ledger.is_processed(ids[0]));
        assert!(!ledger.is_processed(ids[1]));
        assert!(ledger.is_processed(ids[3]));
    }

    #[test]
    fn test_oldest_half_evicted_when_all_attached() {
        let mut doc = Document::new();
        let ids = attached_texts(&mut doc, 6);
        let mut ledger = RestorationLedger::with_capacity(6);
        for id in &ids {
            ledger.record(*id, String::new());
        }

        let eviction = ledger.evict_if_over_capacity(&doc);
        assert_eq!(eviction, Eviction { detached: 0, oldest: 3 });
        assert_eq!(ledger.len(), 3);
        for id in &ids[..3] {
            assert!(!ledger.is_processed(*id));
            assert!(ledger.original(*id).is_none());
        }
        for id in &ids[3..] {
            assert!(ledger.is_processed(*id));
        }
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let mut doc = Document::new();
        let ids = attached_texts(&mut doc, 100);
        let mut ledger = RestorationLedger::with_capacity(7);
        for id in ids {
            ledger.evict_if_over_capacity(&doc);
            ledger.record(id, String::new());
            assert!(ledger.len() <= ledger.capacity());
        }
    }

    #[test]
    fn test_clear() {
        let mut doc = Document::new();
        let ids = attached_texts(&mut doc, 3);
        let mut ledger = RestorationLedger::default();
        for id in &ids {
            ledger.record(*id, "x".into());
        }
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(!ledger.is_processed(ids[0]));
        assert_eq!(ledger.capacity(), DEFAULT_CAPACITY);
    }
}
