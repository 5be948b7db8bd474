//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Bionic reading for HTML documents and PDF viewer pages
#[derive(Parser, Debug, Clone)]
#[command(name = "bionic", version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: bionic.toml)
    #[arg(short = 'C', long, global = true, default_value = "bionic.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Preference file, overrides `[store] path`
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether `--config` was left at its default.
    pub fn uses_default_config(&self) -> bool {
        self.config.as_os_str() == "bionic.toml"
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print text with bionic emphasis
    #[command(visible_alias = "r")]
    Render {
        /// Text to render; `-` reads stdin
        text: String,

        #[command(flatten)]
        prefix: PrefixArg,

        /// Emit HTML markup instead of terminal output
        #[arg(long)]
        html: bool,
    },

    /// Transform an HTML document and write the result
    #[command(visible_alias = "c")]
    Convert {
        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Keep a document under a live session driven by JSON commands on stdin
    #[command(visible_alias = "a")]
    Attach {
        #[command(flatten)]
        args: AttachArgs,
    },

    /// Show or set the stored prefix length
    #[command(visible_alias = "p")]
    Prefix {
        /// New prefix length (1-10); omit to print the current value
        value: Option<i64>,
    },

    /// Print the self-contained viewer routine and its stylesheet
    Script {
        /// Print the stylesheet instead of the script
        #[arg(long)]
        css: bool,
    },
}

/// Prefix length override shared by commands that transform text.
#[derive(clap::Args, Debug, Clone)]
pub struct PrefixArg {
    /// Prefix length (1-10); defaults to the stored preference
    #[arg(short = 'p', long = "prefix", value_name = "N")]
    pub value: Option<i64>,
}

/// Page description shared by `convert` and `attach`.
#[derive(clap::Args, Debug, Clone)]
pub struct PageArgs {
    /// Content type the page was served with (e.g. application/pdf)
    #[arg(long)]
    pub content_type: Option<String>,

    /// URL the page was loaded from
    #[arg(long)]
    pub url: Option<String>,
}

/// Convert command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// HTML file to transform; `-` reads stdin
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub prefix: PrefixArg,

    #[command(flatten)]
    pub page: PageArgs,

    /// Give up waiting for a PDF viewer after this many milliseconds
    #[arg(long, default_value_t = 3000)]
    pub timeout_ms: u64,
}

/// Attach command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct AttachArgs {
    /// HTML file to attach to
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub page: PathBuf,

    #[command(flatten)]
    pub page_args: PageArgs,

    /// Write the final document here when stdin closes
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub emit: Option<PathBuf>,
}
