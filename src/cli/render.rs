//! Render command: bionic text for a terminal or as markup.

use std::path::Path;

use anyhow::Result;

use super::args::PrefixArg;
use super::common::{read_input, resolve_prefix, write_output};
use crate::bionic::{render_ansi, render_html, split};
use crate::config::EngineConfig;

/// Execute render command
pub fn run_render(
    text: &str,
    prefix: &PrefixArg,
    html: bool,
    config: &EngineConfig,
) -> Result<()> {
    let prefix = resolve_prefix(prefix.value, config)?;
    let input = if text == "-" {
        read_input(Path::new("-"))?
    } else {
        text.to_string()
    };

    let segments = split(&input, prefix);
    let mut out = if html {
        render_html(&segments)
    } else {
        render_ansi(&segments)
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    write_output(None, &out)
}
