//! Configuration errors and validation findings.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed config")]
    Toml(#[from] toml::de::Error),

    #[error("config `{0}` does not exist")]
    NotFound(PathBuf),

    // Displayed in full by the inner value; a `source` would repeat it.
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected value.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {}", self.field.as_str().cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({} {hint})", "try".yellow())?;
        }
        Ok(())
    }
}

/// Findings of one validation run.
///
/// Sections push into a shared collector so every bad value is reported in
/// one go; warnings are printed and never fail the load.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
    warnings: Vec<(FieldPath, String)>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message,
            hint,
        });
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.warnings.push((field, message.into()));
    }

    pub fn print_warnings(&self) {
        for (field, message) in &self.warnings {
            crate::log!("config"; "{}: {}", field.as_str(), message);
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[(FieldPath, String)] {
        &self.warnings
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    /// Errors grouped under their `[section]` header, in report order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "invalid config".red().bold())?;
        let mut section = "";
        for diagnostic in &self.errors {
            if diagnostic.field.section() != section {
                section = diagnostic.field.section();
                write!(f, "\n{}", format_args!("[{section}]").dimmed())?;
            }
            write!(f, "\n{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io = ConfigError::Io(
            PathBuf::from("bionic.toml"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        assert!(io.to_string().contains("bionic.toml"));

        let missing = ConfigError::NotFound(PathBuf::from("custom.toml"));
        assert!(missing.to_string().contains("custom.toml"));
    }

    #[test]
    fn test_diagnostics_grouped_by_section() {
        let mut diag = ConfigDiagnostics::new();
        diag.warn(FieldPath::new("ledger.capacity"), "very small");
        assert!(diag.is_empty());

        diag.error_with_hint(FieldPath::new("monitor.chunk_size"), "must be at least 1", "20");
        diag.error(FieldPath::new("monitor.budget_window_ms"), "must be at least 1");
        diag.error(FieldPath::new("pdf.poll_ms"), "must be at least 1");
        assert_eq!(diag.len(), 3);
        assert_eq!(diag.errors()[0].hint.as_deref(), Some("20"));

        let rendered = diag.into_result().unwrap_err().to_string();
        assert_eq!(rendered.matches("[monitor]").count(), 1);
        assert!(rendered.contains("[pdf]"));
        assert!(rendered.contains("monitor.budget_window_ms"));
    }
}
