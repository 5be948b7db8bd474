//! Live document model.
//!
//! An arena of nodes addressed by [`NodeId`], with structural mutation
//! observation, HTML parsing through `tl` and HTML serialization.
//!
//! Nodes are shared across tasks as [`SharedDocument`]; the lock is never
//! held across an `.await`.

mod document;
mod node;
mod parse;
mod query;
mod serialize;


use std::sync::Arc;

use parking_lot::Mutex;

pub use document::{Ancestors, Descendants, Document, MutationReceiver, MutationRecord};
pub use node::{ElementData, Node, NodeData, NodeId};
pub use parse::parse_html;
pub use query::Selector;
pub use serialize::{inner_html, node_to_html, to_html};

/// Document handle shared by the host, the session and its tasks.
pub type SharedDocument = Arc<Mutex<Document>>;

/// Wrap a document for sharing.
pub fn share(doc: Document) -> SharedDocument {
    Arc::new(Mutex::new(doc))
}
