//! Session Controller: one per page, owning every piece of mutable session
//! state.
//!
//! Nothing here is ambient. The gate, the mutator, the monitor and the
//! outstanding passes all hang off one [`SessionController`], and external
//! callers reach it only through [`SessionController::handle`] (usually via
//! the actor).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::messages::{Command, Response};
use super::state::SessionGate;
use crate::bionic::PrefixLength;
use crate::config::{EngineConfig, PdfConfig};
use crate::discovery::{Mode, PageSignals, TextWalker, pdf};
use crate::dom::SharedDocument;
use crate::embed::{HeadScriptInjector, ScriptInjector};
use crate::monitor::{
    BatchStats, ChangeMonitor, ChunkPlan, MonitorState, Workspace, apply_in_chunks,
};
use crate::mutator::{ReversibleMutator, RestoreReport};
use crate::session::Ticket;
use crate::store::{PreferenceStore, Preferences, load_or_default, save_or_log};
use crate::{debug, log};

pub struct SessionController {
    ws: Workspace,
    gate: Arc<SessionGate>,
    mode: Mode,
    config: EngineConfig,
    store: Box<dyn PreferenceStore>,
    injector: Arc<dyn ScriptInjector>,
    /// Set once the viewer routine went out; never reset.
    injected: Arc<AtomicBool>,
    monitor: ChangeMonitor,
    passes: Vec<JoinHandle<()>>,
}

impl SessionController {
    /// New disabled session. PDF-context detection runs here, once.
    pub fn new(
        doc: SharedDocument,
        signals: &PageSignals,
        config: EngineConfig,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let prefs = load_or_default(store.as_ref());
        let mode = Mode::detect(signals, &doc.lock());
        debug!("session"; "{:?} mode, prefix length {}", mode, prefs.prefix_length);

        Self {
            ws: Workspace::new(doc, ReversibleMutator::new(config.ledger.capacity)),
            gate: SessionGate::new(prefs.prefix_length),
            mode,
            monitor: ChangeMonitor::new(config.monitor.clone()),
            config,
            store,
            injector: Arc::new(HeadScriptInjector),
            injected: Arc::new(AtomicBool::new(false)),
            passes: Vec::new(),
        }
    }

    /// Replace the execution-injection collaborator.
    pub fn with_injector(mut self, injector: impl ScriptInjector + 'static) -> Self {
        self.injector = Arc::new(injector);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    pub fn prefix_length(&self) -> PrefixLength {
        self.gate.prefix()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.monitor.state()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.ws
    }

    // =========================================================================
    // commands
    // =========================================================================

    pub fn handle(&mut self, command: Command) -> Response {
        match command {
            Command::Toggle => Response::status(self.toggle()),
            Command::GetStatus => Response::status(self.is_enabled()),
            Command::SetPrefixLength { value } => match PrefixLength::from_json(&value) {
                Ok(prefix) => {
                    self.set_prefix_length(prefix);
                    Response::success()
                }
                Err(e) => {
                    debug!("session"; "rejected prefix length: {}", e);
                    Response::failure(e.to_string())
                }
            },
        }
    }

    /// Flip the enabled state, returning the new one.
    pub fn toggle(&mut self) -> bool {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
        self.is_enabled()
    }

    pub fn enable(&mut self) {
        if self.is_enabled() {
            return;
        }
        self.gate.set_enabled(true);
        self.persist();
        log!("session"; "enabled");
        self.start_processing();
    }

    pub fn disable(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.gate.set_enabled(false);
        self.persist();
        self.monitor.stop();
        let report = self.restore();
        log!(
            "session";
            "disabled, restored {} words and {} elements",
            report.words,
            report.elements
        );
    }

    /// Store a validated prefix length; re-derive everything when enabled.
    pub fn set_prefix_length(&mut self, prefix: PrefixLength) {
        self.gate.set_prefix(prefix);
        self.persist();
        if !self.is_enabled() {
            return;
        }

        self.gate.invalidate();
        self.monitor.stop();
        self.restore();
        debug!("session"; "reprocessing with prefix length {}", prefix);
        self.start_processing();
    }

    /// Await every one-shot pass scheduled so far. The monitor is not a pass.
    pub async fn wait_idle(&mut self) {
        self.idle().await;
    }

    /// Detached form of [`Self::wait_idle`]: the returned future owns the
    /// pass handles, so the controller stays free to serve commands (and
    /// a shutdown, which ends any PDF poll loop) while it is awaited.
    pub fn idle(&mut self) -> impl Future<Output = ()> + Send + use<> {
        let passes = std::mem::take(&mut self.passes);
        async move {
            for pass in passes {
                let _ = pass.await;
            }
        }
    }

    /// Stop all background work without restoring the document.
    pub fn shutdown(&mut self) {
        self.gate.invalidate();
        self.monitor.stop();
    }

    // =========================================================================
    // internals
    // =========================================================================

    fn persist(&self) {
        let prefs = Preferences {
            prefix_length: self.gate.prefix(),
        };
        save_or_log(self.store.as_ref(), &prefs);
    }

    fn restore(&self) -> RestoreReport {
        self.ws.with(|doc, mutator| mutator.restore_all(doc))
    }

    fn start_processing(&mut self) {
        self.passes.retain(|pass| !pass.is_finished());
        let ticket = self.gate.ticket();

        match self.mode {
            Mode::Generic => {
                let nodes: Vec<_> = {
                    let doc = self.ws.doc.lock();
                    TextWalker::new(&doc, doc.body()).collect()
                };
                let monitor = &self.config.monitor;
                let plan = ChunkPlan::new(monitor.chunk_size, monitor.chunk_pause());
                let ws = self.ws.clone();
                let pass_ticket = ticket.clone();
                self.passes.push(tokio::spawn(async move {
                    let stats = apply_in_chunks(&ws, nodes, plan, &pass_ticket).await;
                    debug!(
                        "session";
                        "full pass: {} transformed, {} skipped",
                        stats.transformed,
                        stats.skipped
                    );
                }));
                self.monitor.start(self.ws.clone(), ticket);
            }
            Mode::Pdf => {
                let viewer = PdfViewer {
                    ws: self.ws.clone(),
                    config: self.config.pdf.clone(),
                    injector: Arc::clone(&self.injector),
                    injected: Arc::clone(&self.injected),
                };
                self.passes.push(tokio::spawn(viewer.run(ticket)));
            }
        }
    }
}

// ============================================================================
// PDF mode
// ============================================================================

/// Everything the PDF loop needs, detached from the controller.
struct PdfViewer {
    ws: Workspace,
    config: PdfConfig,
    injector: Arc<dyn ScriptInjector>,
    injected: Arc<AtomicBool>,
}

impl PdfViewer {
    /// Poll for the viewer, sweeping visible text meanwhile; once it is
    /// ready, settle and sweep the text layers.
    async fn run(self, ticket: Ticket) {
        loop {
            if !ticket.is_live() {
                return;
            }
            if pdf::is_ready(&self.ws.doc.lock()) {
                break;
            }
            let checked = Instant::now();
            self.fallback_sweep(&ticket).await;
            tokio::time::sleep_until(checked + self.config.poll_interval()).await;
        }

        debug!("pdf"; "viewer ready");
        tokio::time::sleep(self.config.settle()).await;
        if !ticket.is_live() {
            return;
        }

        let layer_nodes = pdf::text_layer_candidates(&self.ws.doc.lock());
        let stats = apply_in_chunks(&self.ws, layer_nodes, self.fallback_plan(), &ticket).await;
        debug!("pdf"; "text layers: {} transformed", stats.transformed);
        if stats.is_cancelled() {
            return;
        }

        self.inject_if_embedded();
        self.fallback_sweep(&ticket).await;
    }

    fn fallback_plan(&self) -> ChunkPlan {
        ChunkPlan::new(self.config.fallback_chunk_size, self.config.fallback_pause())
    }

    async fn fallback_sweep(&self, ticket: &Ticket) -> BatchStats {
        tokio::time::sleep(self.config.fallback_delay()).await;
        if !ticket.is_live() {
            return BatchStats::default();
        }
        let nodes = pdf::fallback_candidates(&self.ws.doc.lock());
        apply_in_chunks(&self.ws, nodes, self.fallback_plan(), ticket).await
    }

    fn inject_if_embedded(&self) {
        if !self.config.inject_embedded {
            return;
        }
        let mut doc = self.ws.doc.lock();
        if !pdf::has_embedded_viewer(&doc) || self.injected.swap(true, Ordering::SeqCst) {
            return;
        }
        let script = crate::embed::pdf::handler_script();
        match self.injector.inject(&mut doc, &script) {
            Ok(()) => log!("pdf"; "viewer routine injected"),
            Err(e) => log!("pdf"; "could not inject viewer routine: {}", e),
        }
    }
}
