use std::time::Duration;

use rustc_hash::FxHashSet;
use tokio::time::Instant;

use crate::dom::{MutationRecord, NodeId};

/// Idle sleep when nothing is buffered.
const IDLE: Duration = Duration::from_secs(86400);

/// Pure debouncer: buffers inserted nodes until the window passes quietly.
/// No document access, no session state.
#[derive(Debug)]
pub struct MutationDebouncer {
    pending: Vec<NodeId>,
    seen: FxHashSet<NodeId>,
    last_event: Option<Instant>,
    window: Duration,
}

impl MutationDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: Vec::new(),
            seen: FxHashSet::default(),
            last_event: None,
            window,
        }
    }

    /// Buffer one mutation record. Every record restarts the window, even
    /// one whose nodes were all seen already.
    pub fn add(&mut self, record: &MutationRecord) {
        for &id in &record.added {
            if self.seen.insert(id) {
                self.pending.push(id);
            }
        }
        self.last_event = Some(Instant::now());
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        last_event.elapsed() >= self.window && !self.pending.is_empty()
    }

    /// Take the buffered nodes, in insertion order, once the window passed.
    pub fn take_if_ready(&mut self) -> Option<Vec<NodeId>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        self.seen.clear();
        Some(std::mem::take(&mut self.pending))
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.seen.clear();
        self.last_event = None;
    }

    /// Precise sleep duration until the next possible ready time.
    pub fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return IDLE;
        };
        self.window
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn record(doc: &mut Document, n: usize) -> MutationRecord {
        let added = (0..n).map(|i| doc.create_text(&format!("t{i}"))).collect();
        MutationRecord {
            target: doc.root(),
            added,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_quiet_window() {
        let mut doc = Document::new();
        let mut debouncer = MutationDebouncer::new(Duration::from_millis(200));
        assert_eq!(debouncer.sleep_duration(), IDLE);

        debouncer.add(&record(&mut doc, 2));
        assert!(!debouncer.is_ready());
        assert_eq!(debouncer.sleep_duration(), Duration::from_millis(200));

        tokio::time::advance(Duration::from_millis(150)).await;
        debouncer.add(&record(&mut doc, 1));
        tokio::time::advance(Duration::from_millis(150)).await;
        assert!(debouncer.take_if_ready().is_none());

        tokio::time::advance(Duration::from_millis(50)).await;
        let nodes = debouncer.take_if_ready().unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(debouncer.is_empty());
        assert_eq!(debouncer.sleep_duration(), IDLE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dedups_within_window() {
        let mut doc = Document::new();
        let mut debouncer = MutationDebouncer::new(Duration::from_millis(10));
        let first = record(&mut doc, 2);
        debouncer.add(&first);
        debouncer.add(&first);
        assert_eq!(debouncer.len(), 2);

        tokio::time::advance(Duration::from_millis(10)).await;
        assert_eq!(debouncer.take_if_ready().unwrap(), first.added);

        // A flushed node may be reported again later.
        debouncer.add(&first);
        assert_eq!(debouncer.len(), 2);
        debouncer.clear();
        assert!(!debouncer.is_ready());
    }
}
