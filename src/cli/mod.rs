//! Command-line interface module.

mod args;
pub mod attach;
pub mod common;
pub mod convert;
pub mod prefix;
pub mod render;
pub mod script;

pub use args::{AttachArgs, Cli, Commands, ConvertArgs, PageArgs, PrefixArg};
