//! Logging utilities with colored output and a live status line.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` / `debug_do!` for output that only appears with `--verbose`
//! - `StatusLine` for the overwriting status block of `bionic attach`
//!
//! Everything goes to stderr: stdout belongs to command output (rendered
//! text, converted documents, JSON responses).
//!
//! # Example
//!
//! ```ignore
//! log!("session"; "enabled");
//! debug!("monitor"; "batch of {} nodes", n);
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream};
use parking_lot::Mutex;
use std::{
    io::{Write, stderr},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Execute code only when --verbose is enabled
///
/// Use this to avoid computing expensive debug data when not needed.
///
/// # Usage
/// ```ignore
/// debug_do! {
///     let summary = expensive_computation();
///     debug!("module"; "result: {:?}", summary);
/// }
/// ```
#[macro_export]
macro_rules! debug_do {
    ($($body:tt)*) => {{
        if $crate::logger::is_verbose() {
            $($body)*
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    prefix
        .if_supports_color(Stream::Stderr, |p| match module.to_ascii_lowercase().as_str() {
            "session" => p.bright_blue().bold().to_string(),
            "monitor" | "batch" => p.bright_green().bold().to_string(),
            "pdf" => p.bright_magenta().bold().to_string(),
            "error" => p.bright_red().bold().to_string(),
            _ => p.bright_yellow().bold().to_string(),
        })
        .to_string()
}

// ============================================================================
// Status Line (single block with overwrite)
// ============================================================================

/// Get current UTC time formatted as HH:MM:SS
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Status block for attach mode
///
/// Each message overwrites the previous block, so a long session leaves a
/// single line describing its latest state.
///
/// # Example
///
/// ```ignore
/// let mut status = StatusLine::new();
/// status.success("enabled, prefix length 2");
/// status.error("rejected", "prefix length must be between 1 and 10, got 11");
/// ```
pub struct StatusLine {
    /// Lines of previous output to clear
    last_lines: usize,
}

static STATUS: LazyLock<Mutex<StatusLine>> = LazyLock::new(|| Mutex::new(StatusLine::new()));

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLine {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    /// Display success message (✓ prefix, green).
    pub fn success(&mut self, message: &str) {
        self.display(format!("{}", "✓".green()), message);
    }

    /// Display error message (✗ prefix, red) with optional detail.
    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(format!("{}", "✗".red()), &message);
    }

    /// Display warning message (⚠ prefix, yellow).
    pub fn warning(&mut self, detail: &str) {
        self.display(format!("{}", "⚠".yellow()), detail);
    }

    fn display(&mut self, symbol: String, message: &str) {
        let mut stderr = stderr().lock();

        if self.last_lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines as u16;
            execute!(stderr, cursor::MoveUp(lines)).ok();
            execute!(stderr, Clear(ClearType::FromCursorDown)).ok();
        }

        let timestamp = format!("[{}]", now()).dimmed().to_string();
        writeln!(stderr, "{timestamp} {symbol} {message}").ok();
        stderr.flush().ok();

        self.last_lines = message.matches('\n').count() + 1;
    }

    /// Forget the previous block so the next message starts below it.
    pub fn release(&mut self) {
        self.last_lines = 0;
    }
}

/// Global status: success
pub fn status_success(message: &str) {
    STATUS.lock().success(message);
}

/// Global status: error
pub fn status_error(summary: &str, detail: &str) {
    STATUS.lock().error(summary, detail);
}

/// Global status: warning
pub fn status_warning(detail: &str) {
    STATUS.lock().warning(detail);
}

/// Global status: keep the current block on screen
pub fn status_release() {
    STATUS.lock().release();
}
