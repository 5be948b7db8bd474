//! Bionic reading for HTML documents and PDF viewer text layers.
//!
//! The leading letters of every word are wrapped in a bold span so the eye
//! can anchor on them. Every change is recorded, so a session can be turned
//! off and the document returns to exactly what it was.
//!
//! # Layout
//!
//! - [`bionic`]: word splitting and rendering
//! - [`dom`]: the document model the engine mutates
//! - [`discovery`]: page mode detection and candidate text nodes
//! - [`mutator`]: reversible node replacement
//! - [`monitor`]: follows inserted content, debounced and rate limited
//! - [`session`]: enable/disable, prefix changes, the PDF viewer loop
//! - [`embed`]: the routine injected into embedded PDF viewers
//! - [`config`], [`store`]: `bionic.toml` and the persisted preference

pub mod bionic;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod dom;
pub mod embed;
pub mod logger;
pub mod monitor;
pub mod mutator;
pub mod session;
pub mod store;
pub mod utils;
