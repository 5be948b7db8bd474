//! Engine configuration from `bionic.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # One module per TOML section
//! ├── types/         # ConfigError, diagnostics, field paths
//! ├── util.rs        # Config file lookup
//! └── mod.rs         # EngineConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[monitor]` | Mutation debounce, chunk size, rate budget       |
//! | `[ledger]`  | Restoration ledger capacity                      |
//! | `[pdf]`     | Viewer polling, fallback sweep, injection        |
//! | `[store]`   | Preference persistence                           |
//!
//! A missing `bionic.toml` is not an error: every field has a default.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{LedgerConfig, MonitorConfig, PdfConfig, StoreConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::Cli;
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing bionic.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Absolute path of the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub pdf: PdfConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl EngineConfig {
    /// Load configuration for the given command line.
    ///
    /// The default config name is searched upward from the working directory
    /// and silently replaced by defaults when absent; an explicit `--config`
    /// must exist.
    pub fn load(cli: &Cli) -> Result<Self> {
        crate::logger::set_verbose(cli.verbose);

        let mut config = match Self::resolve_config_path(cli)? {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self::default()
            }
        };

        config.finalize(cli)?;
        config.validate()?;
        Ok(config)
    }

    fn resolve_config_path(cli: &Cli) -> Result<Option<PathBuf>> {
        if let Some(path) = find_config_file(&cli.config) {
            return Ok(Some(path));
        }
        if cli.uses_default_config() {
            Ok(None)
        } else {
            Err(ConfigError::NotFound(cli.config.clone()).into())
        }
    }

    /// Resolve paths and apply CLI overrides.
    fn finalize(&mut self, cli: &Cli) -> Result<()> {
        let root = match self.config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::env::current_dir().context("Failed to get current working directory")?,
        };

        if let Some(path) = &cli.store {
            self.store.path = path.clone();
            self.store.enable = true;
        }
        self.store.normalize(&root);
        Ok(())
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        for field in &ignored {
            log!("config"; "unknown field `{}` in {}, ignored", field, path.display());
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, reporting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.monitor.validate(&mut diag);
        self.ledger.validate(&mut diag);
        self.pdf.validate(&mut diag);
        self.store.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> EngineConfig {
    let (parsed, ignored) = EngineConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
