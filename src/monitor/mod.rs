//! Change Monitor.
//!
//! Watches the body for inserted content and transforms it while the session
//! stays enabled.
//!
//! ```text
//! Document::observe → MutationDebouncer (pure timing) → collect_added
//!                   → RateBudget gate → apply_in_chunks
//! ```
//!
//! Batches that arrive while the budget is spent are dropped, not queued.

mod batch;
mod budget;
mod debouncer;

#[cfg(test)]
mod tests;

pub use batch::{BatchStats, ChunkPlan, Workspace, apply_in_chunks};
pub use budget::RateBudget;
pub use debouncer::MutationDebouncer;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::MonitorConfig;
use crate::discovery::collect_added;
use crate::dom::{MutationReceiver, NodeId};
use crate::session::Ticket;
use crate::{debug, log};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Observing,
}

/// Observation task handle: `Idle` without one, `Observing` while it runs.
#[derive(Debug)]
pub struct ChangeMonitor {
    config: MonitorConfig,
    task: Option<JoinHandle<()>>,
}

impl ChangeMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config, task: None }
    }

    pub fn state(&self) -> MonitorState {
        match &self.task {
            Some(task) if !task.is_finished() => MonitorState::Observing,
            _ => MonitorState::Idle,
        }
    }

    /// Idle → Observing. Observation is registered before this returns, so no
    /// insertion made after the call is missed. No-op while observing.
    pub fn start(&mut self, ws: Workspace, ticket: Ticket) {
        if self.state() == MonitorState::Observing {
            return;
        }
        let rx = {
            let mut doc = ws.doc.lock();
            let body = doc.body();
            doc.observe(body)
        };
        debug!("monitor"; "observing");
        self.task = Some(tokio::spawn(observe(ws, rx, ticket, self.config.clone())));
    }

    /// Observing → Idle. Pending batches are discarded with the task.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("monitor"; "stopped");
        }
    }
}

impl Drop for ChangeMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run the observation loop until the ticket dies or the document goes away.
async fn observe(ws: Workspace, mut rx: MutationReceiver, ticket: Ticket, config: MonitorConfig) {
    let mut debouncer = MutationDebouncer::new(config.debounce());
    let mut budget = RateBudget::new(config.budget(), config.budget_window());
    let plan = ChunkPlan::new(config.chunk_size, config.chunk_pause());

    loop {
        tokio::select! {
            biased;
            record = rx.recv() => match record {
                Some(record) => debouncer.add(&record),
                None => break,
            },
            _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                if !ticket.is_live() {
                    break;
                }
                if let Some(added) = debouncer.take_if_ready() {
                    flush(&ws, &added, plan, &mut budget, &ticket).await;
                }
            }
        }
    }
    debug!("monitor"; "observation ended");
}

async fn flush(
    ws: &Workspace,
    added: &[NodeId],
    plan: ChunkPlan,
    budget: &mut RateBudget,
    ticket: &Ticket,
) {
    if budget.is_exhausted(Instant::now()) {
        log!("monitor"; "budget spent, dropping {} inserted nodes", added.len());
        return;
    }

    let nodes = {
        let doc = ws.doc.lock();
        collect_added(&doc, added)
    };
    if nodes.is_empty() {
        return;
    }

    let stats = apply_in_chunks(ws, nodes, plan, ticket).await;
    budget.charge(Instant::now(), stats.busy);
    debug!(
        "monitor";
        "batch: {} transformed, {} skipped, {:?} busy",
        stats.transformed,
        stats.skipped,
        stats.busy
    );
}
