//! Chunked application of the mutator.
//!
//! Work is split into fixed-size chunks with a pause between them. Locks are
//! taken per chunk and released before the pause. The ticket is checked at
//! the top of every chunk, with both locks held, so a disabled session stops
//! mid-pass and never writes after its restore.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::dom::{NodeId, SharedDocument};
use crate::mutator::ReversibleMutator;
use crate::session::Ticket;

/// The document and the mutator that owns its ledger.
///
/// Lock order is always document first, then mutator.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub doc: SharedDocument,
    pub mutator: Arc<Mutex<ReversibleMutator>>,
}

impl Workspace {
    pub fn new(doc: SharedDocument, mutator: ReversibleMutator) -> Self {
        Self {
            doc,
            mutator: Arc::new(Mutex::new(mutator)),
        }
    }

    /// Run `f` with both locks held.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut crate::dom::Document, &mut ReversibleMutator) -> R,
    ) -> R {
        let mut doc = self.doc.lock();
        let mut mutator = self.mutator.lock();
        f(&mut doc, &mut mutator)
    }
}

/// How a pass is cut up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub size: usize,
    pub pause: Duration,
}

impl ChunkPlan {
    pub fn new(size: usize, pause: Duration) -> Self {
        Self {
            size: size.max(1),
            pause,
        }
    }
}

/// Outcome of one chunked pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub transformed: usize,
    pub skipped: usize,
    /// Nodes never reached because the ticket died.
    pub cancelled: usize,
    /// Time spent mutating with the locks held; waiting for them is free.
    pub busy: Duration,
}

impl BatchStats {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled > 0
    }
}

/// Apply the mutator to `nodes` chunk by chunk.
///
/// The first chunk runs immediately; each following chunk runs after
/// `plan.pause`.
pub async fn apply_in_chunks(
    ws: &Workspace,
    nodes: Vec<NodeId>,
    plan: ChunkPlan,
    ticket: &Ticket,
) -> BatchStats {
    let mut stats = BatchStats::default();
    let prefix = ticket.prefix();
    let total = nodes.len();
    let mut done = 0;

    for chunk in nodes.chunks(plan.size) {
        if done > 0 {
            tokio::time::sleep(plan.pause).await;
        }

        // Checked again under the locks: a disable may land between the
        // first check and lock acquisition.
        let applied = ticket.is_live()
            && ws.with(|doc, mutator| {
                if !ticket.is_live() {
                    return false;
                }
                let started = std::time::Instant::now();
                for &node in chunk {
                    if mutator.apply_to(doc, node, prefix).is_transformed() {
                        stats.transformed += 1;
                    } else {
                        stats.skipped += 1;
                    }
                }
                stats.busy += started.elapsed();
                true
            });
        if !applied {
            stats.cancelled = total - done;
            crate::debug!("batch"; "cancelled with {} of {} nodes left", stats.cancelled, total);
            return stats;
        }
        done += chunk.len();
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bionic::PrefixLength;
    use crate::discovery::TextWalker;
    use crate::dom::{parse_html, share, to_html};
    use crate::session::SessionGate;

    fn workspace(source: &str) -> Workspace {
        Workspace::new(share(parse_html(source)), ReversibleMutator::default())
    }

    fn text_nodes(ws: &Workspace) -> Vec<NodeId> {
        let doc = ws.doc.lock();
        TextWalker::new(&doc, doc.body()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_applies_every_chunk() {
        let ws = workspace("<p>alpha</p><p>bravo</p><p>charlie</p><p>a</p><p>delta</p>");
        let gate = SessionGate::new(PrefixLength::DEFAULT);
        gate.set_enabled(true);

        let nodes = text_nodes(&ws);
        let plan = ChunkPlan::new(2, Duration::from_millis(10));
        let started = tokio::time::Instant::now();
        let stats = apply_in_chunks(&ws, nodes, plan, &gate.ticket()).await;

        assert_eq!(stats.transformed, 4);
        assert_eq!(stats.skipped, 1);
        assert!(!stats.is_cancelled());
        // Three chunks, two pauses.
        assert_eq!(started.elapsed(), Duration::from_millis(20));
        assert!(to_html(&ws.doc.lock()).contains("bionic-word"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_ticket_dies() {
        let ws = workspace("<p>alpha</p><p>bravo</p><p>charlie</p><p>delta</p>");
        let gate = SessionGate::new(PrefixLength::DEFAULT);
        gate.set_enabled(true);
        let nodes = text_nodes(&ws);
        let ticket = gate.ticket();

        let task = {
            let ws = ws.clone();
            tokio::spawn(async move {
                apply_in_chunks(&ws, nodes, ChunkPlan::new(1, Duration::from_millis(10)), &ticket)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(15)).await;
        gate.set_enabled(false);

        let stats = task.await.unwrap();
        assert_eq!(stats.transformed, 2);
        assert_eq!(stats.cancelled, 2);
        assert_eq!(ws.mutator.lock().ledger().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_disable_while_chunk_waits_for_lock() {
        let ws = workspace("<p>alpha words</p><p>bravo words</p>");
        let gate = SessionGate::new(PrefixLength::DEFAULT);
        gate.set_enabled(true);
        let nodes = text_nodes(&ws);
        let baseline = to_html(&ws.doc.lock());

        // Hold the document so the pass passes its first check and blocks.
        let held = ws.doc.lock();
        let task = {
            let ws = ws.clone();
            let ticket = gate.ticket();
            tokio::spawn(async move {
                apply_in_chunks(&ws, nodes, ChunkPlan::new(10, Duration::ZERO), &ticket).await
            })
        };
        std::thread::sleep(Duration::from_millis(50));
        gate.set_enabled(false);
        drop(held);
        ws.with(|doc, mutator| mutator.restore_all(doc));

        let stats = task.await.unwrap();
        assert_eq!(stats.transformed, 0);
        assert_eq!(stats.cancelled, 2);
        assert_eq!(stats.busy, Duration::ZERO);
        assert_eq!(to_html(&ws.doc.lock()), baseline);
        assert!(ws.mutator.lock().ledger().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_lock_wait_not_charged_as_busy() {
        let ws = workspace("<p>alpha words</p>");
        let gate = SessionGate::new(PrefixLength::DEFAULT);
        gate.set_enabled(true);
        let nodes = text_nodes(&ws);

        let held = ws.doc.lock();
        let task = {
            let ws = ws.clone();
            let ticket = gate.ticket();
            tokio::spawn(async move {
                apply_in_chunks(&ws, nodes, ChunkPlan::new(10, Duration::ZERO), &ticket).await
            })
        };
        std::thread::sleep(Duration::from_millis(200));
        drop(held);

        let stats = task.await.unwrap();
        assert_eq!(stats.transformed, 1);
        assert!(stats.busy < Duration::from_millis(100), "busy: {:?}", stats.busy);
    }

    #[test]
    fn test_chunk_plan_minimum() {
        assert_eq!(ChunkPlan::new(0, Duration::ZERO).size, 1);
    }
}
