//! Session: enable/disable lifecycle, prefix changes and the command surface.
//!
//! # Module Structure
//!
//! ```text
//! session/
//! ├── state.rs       # SessionGate + Ticket (cancellation by epoch)
//! ├── controller.rs  # SessionController: enable, disable, PDF loop
//! ├── messages.rs    # Command / Response JSON, actor messages
//! └── actor.rs       # SessionActor + SessionHandle over mpsc
//! ```
//!
//! Every pass scheduled for later holds a [`Ticket`]; `disable` and prefix
//! changes kill outstanding tickets, so stale continuations do nothing.

mod actor;
mod controller;
mod messages;
mod state;


pub use actor::{SessionActor, SessionHandle};
pub use controller::SessionController;
pub use messages::{Command, Response, SessionMsg};
pub use state::{SessionGate, Ticket};
