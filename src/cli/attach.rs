//! Attach command: a live session driven by JSON commands on stdin.
//!
//! Each input line is one command (`{"action": "toggle"}`), each output line
//! the JSON response. Logs and the status line go to stderr.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::args::AttachArgs;
use super::common::{open_store, read_input, write_output};
use crate::config::EngineConfig;
use crate::discovery::PageSignals;
use crate::dom::{parse_html, share, to_html};
use crate::logger::{status_error, status_release, status_success, status_warning};
use crate::session::{Response, SessionActor, SessionController, SessionHandle};
use crate::{debug, log};

/// Upper bound on waiting for outstanding passes before `--emit`.
const EMIT_SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Buffered lines between the stdin thread and the session.
const LINE_BUFFER: usize = 32;

/// Execute attach command
pub async fn run_attach(args: &AttachArgs, config: &EngineConfig) -> Result<()> {
    let source = read_input(&args.page)?;
    let doc = share(parse_html(&source));
    let controller = SessionController::new(
        Arc::clone(&doc),
        &PageSignals::from(&args.page_args),
        config.clone(),
        open_store(config),
    );
    log!("attach"; "{} ({:?} mode)", args.page.display(), controller.mode());

    let (handle, task) = SessionActor::spawn(controller);
    let lines = spawn_line_reader(io::BufReader::new(io::stdin()));
    let served = serve_lines(&handle, lines, &mut io::stdout()).await?;
    debug!("attach"; "stdin closed after {} commands", served);

    finish(&handle, task, args.emit.is_some()).await?;
    status_release();

    if let Some(path) = &args.emit {
        write_output(Some(path), &to_html(&doc.lock()))?;
        log!("attach"; "wrote {}", path.display());
    }
    Ok(())
}

/// Stop the session, first giving outstanding passes a bounded time to
/// settle when the document is about to be emitted.
async fn finish(
    handle: &SessionHandle,
    task: JoinHandle<SessionController>,
    settle: bool,
) -> Result<SessionController> {
    if settle
        && tokio::time::timeout(EMIT_SETTLE_TIMEOUT, handle.wait_idle())
            .await
            .is_err()
    {
        status_warning("passes still running, emitting current state");
    }
    handle.shutdown().await;
    Ok(task.await?)
}

/// Forward lines from a blocking reader into the runtime.
fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log!("attach"; "stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Answer every command line until the reader closes. Returns how many
/// commands were served.
async fn serve_lines(
    handle: &SessionHandle,
    mut lines: mpsc::Receiver<String>,
    out: &mut impl Write,
) -> Result<usize> {
    let mut served = 0;
    while let Some(line) = lines.recv().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle.send_json(line).await;
        report(&response);
        writeln!(out, "{}", response.to_json())?;
        out.flush()?;
        served += 1;
    }
    Ok(served)
}

fn report(response: &Response) {
    match response {
        Response::Status { enabled: true } => status_success("enabled"),
        Response::Status { enabled: false } => status_success("disabled"),
        Response::Outcome { success: true, .. } => status_success("prefix length updated"),
        Response::Outcome { error, .. } => {
            status_error("rejected", error.as_deref().unwrap_or_default());
        }
    }
}
