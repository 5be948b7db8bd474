//! bionic - bionic reading from the command line.

use anyhow::Result;
use bionic_reader::cli::{self, Cli, Commands};
use bionic_reader::config::EngineConfig;
use clap::{ColorChoice, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = EngineConfig::load(&cli)?;

    match &cli.command {
        Commands::Render { text, prefix, html } => {
            cli::render::run_render(text, prefix, *html, &config)
        }
        Commands::Convert { args } => block_on(cli::convert::run_convert(args, &config)),
        Commands::Attach { args } => block_on(cli::attach::run_attach(args, &config)),
        Commands::Prefix { value } => cli::prefix::run_prefix(*value, &config),
        Commands::Script { css } => cli::script::print_script(*css),
    }
}

/// Run a session command to completion on a single-threaded runtime; every
/// pass and the monitor interleave cooperatively on it.
fn block_on<F>(future: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(future)
}
