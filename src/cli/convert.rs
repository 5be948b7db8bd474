//! Convert command: one full pass over a document, then serialize it.
//!
//! The session runs exactly as it would live, on a private in-memory store
//! so a `--prefix` override is never persisted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use super::args::ConvertArgs;
use super::common::{read_input, resolve_prefix, write_output};
use crate::config::EngineConfig;
use crate::discovery::PageSignals;
use crate::dom::{parse_html, share, to_html};
use crate::session::SessionController;
use crate::store::{MemoryStore, Preferences};
use crate::{debug, debug_do, log};

/// Execute convert command
pub async fn run_convert(args: &ConvertArgs, config: &EngineConfig) -> Result<()> {
    let source = read_input(&args.input)?;
    let prefix_length = resolve_prefix(args.prefix.value, config)?;

    let doc = share(parse_html(&source));
    let store = MemoryStore::with(Preferences { prefix_length });
    let mut session = SessionController::new(
        Arc::clone(&doc),
        &PageSignals::from(&args.page),
        config.clone(),
        Box::new(store),
    );

    session.enable();
    let timeout = Duration::from_millis(args.timeout_ms);
    if tokio::time::timeout(timeout, session.wait_idle()).await.is_err() {
        log!(
            "convert";
            "viewer not ready after {}ms, writing what was transformed",
            args.timeout_ms
        );
    }
    session.shutdown();

    debug_do! {
        let transformed = session.workspace().mutator.lock().ledger().len();
        debug!("convert"; "{:?} mode, {} nodes transformed", session.mode(), transformed);
    }

    let html = to_html(&doc.lock());
    write_output(args.output.as_deref(), &html)
}
