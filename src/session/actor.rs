//! Session Actor
//!
//! Owns the controller and serves commands one at a time, so every state
//! transition happens on a single logical thread of control.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::controller::SessionController;
use super::messages::{Command, Response, SessionMsg};
use crate::debug;

/// Channel buffer size
const CHANNEL_BUFFER: usize = 32;

pub struct SessionActor {
    controller: SessionController,
    rx: mpsc::Receiver<SessionMsg>,
}

impl SessionActor {
    /// Spawn the actor, returning the handle external callers talk to and
    /// the task that yields the controller back once the actor exits.
    pub fn spawn(controller: SessionController) -> (SessionHandle, JoinHandle<SessionController>) {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);
        let actor = Self { controller, rx };
        (SessionHandle { tx }, tokio::spawn(actor.run()))
    }

    /// Run the actor event loop
    async fn run(mut self) -> SessionController {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                SessionMsg::Command { command, reply } => {
                    debug!("session"; "command: {:?}", command);
                    let _ = reply.send(self.controller.handle(command));
                }
                SessionMsg::WaitIdle { reply } => {
                    // A PDF page without a viewer polls forever; the loop must
                    // keep reading so a later Shutdown still gets through.
                    let idle = self.controller.idle();
                    tokio::spawn(async move {
                        idle.await;
                        let _ = reply.send(());
                    });
                }
                SessionMsg::Shutdown => break,
            }
        }
        self.controller.shutdown();
        self.controller
    }
}

/// Cloneable sender side of the session actor.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionMsg>,
}

impl SessionHandle {
    /// Send one command; `None` once the actor is gone.
    pub async fn send(&self, command: Command) -> Option<Response> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionMsg::Command { command, reply })
            .await
            .ok()?;
        rx.await.ok()
    }

    /// Parse and send one JSON command. Malformed input and unknown actions
    /// get a failure response.
    pub async fn send_json(&self, line: &str) -> Response {
        let command = match Command::from_json(line) {
            Ok(command) => command,
            Err(e) => return Response::failure(format!("invalid command: {e}")),
        };
        self.send(command)
            .await
            .unwrap_or_else(|| Response::failure("session closed"))
    }

    /// Wait until every one-shot pass scheduled so far has finished.
    pub async fn wait_idle(&self) {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(SessionMsg::WaitIdle { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    pub async fn shutdown(&self) {
        let _ = self.tx.send(SessionMsg::Shutdown).await;
    }
}
