//! `[store]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [store]
//! enable = true                                        # Persist preferences
//! path = "~/.config/bionic-reader/preferences.json"    # Preference file
//! ```
//!
//! With `enable = false` preferences live in memory for the process only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

pub const DEFAULT_STORE_PATH: &str = "~/.config/bionic-reader/preferences.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub enable: bool,
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl StoreConfig {
    pub const PATH: FieldPath = FieldPath::new("store.path");

    /// Expand `~` and resolve relative paths against `root`.
    pub fn normalize(&mut self, root: &Path) {
        let raw = self.path.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
        self.path = if expanded.is_relative() {
            root.join(expanded)
        } else {
            expanded
        };
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.enable && self.path.as_os_str().is_empty() {
            diag.error_with_hint(
                Self::PATH,
                "must not be empty",
                "set `enable = false` to keep preferences in memory",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_store_config() {
        let config = test_parse_config("[store]\nenable = false\npath = \"prefs.json\"");
        assert!(!config.store.enable);
        assert_eq!(config.store.path, PathBuf::from("prefs.json"));
    }

    #[test]
    fn test_store_normalize() {
        let mut store = StoreConfig {
            enable: true,
            path: PathBuf::from("state/prefs.json"),
        };
        store.normalize(Path::new("/srv/site"));
        assert_eq!(store.path, PathBuf::from("/srv/site/state/prefs.json"));

        let mut store = StoreConfig::default();
        store.normalize(Path::new("/srv/site"));
        assert!(!store.path.to_string_lossy().starts_with('~'));
        assert!(store.path.ends_with("bionic-reader/preferences.json"));
    }

    #[test]
    fn test_store_validation() {
        let mut diag = ConfigDiagnostics::new();
        StoreConfig {
            enable: true,
            path: PathBuf::new(),
        }
        .validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
