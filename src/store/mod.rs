//! Preference persistence.
//!
//! The store is an opaque key-value collaborator holding one value, the
//! prefix length. Enabled state is never persisted. Store failures are never
//! fatal: callers log them and fall back to defaults.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bionic::PrefixLength;
use crate::config::StoreConfig;
use crate::log;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference store unavailable")]
    Unavailable,

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed preferences in `{0}`")]
    Malformed(PathBuf, #[source] serde_json::Error),
}

/// Persisted preferences: `{"prefixLength": 2}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub prefix_length: PrefixLength,
}

pub trait PreferenceStore: Send + Sync {
    /// Stored preferences, `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<Preferences>, StoreError>;

    fn save(&self, prefs: &Preferences) -> Result<(), StoreError>;
}

/// Load, logging and falling back to defaults on any failure.
pub fn load_or_default(store: &dyn PreferenceStore) -> Preferences {
    match store.load() {
        Ok(prefs) => prefs.unwrap_or_default(),
        Err(e) => {
            log!("store"; "{}, using defaults", describe(&e));
            Preferences::default()
        }
    }
}

/// Save, logging any failure.
pub fn save_or_log(store: &dyn PreferenceStore, prefs: &Preferences) -> bool {
    match store.save(prefs) {
        Ok(()) => true,
        Err(e) => {
            log!("store"; "could not save preferences: {}", describe(&e));
            false
        }
    }
}

fn describe(err: &StoreError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}

/// Build the store `[store]` asks for.
pub fn from_config(config: &StoreConfig) -> Box<dyn PreferenceStore> {
    if config.enable {
        Box::new(JsonFileStore::new(&config.path))
    } else {
        Box::new(MemoryStore::default())
    }
}

// ============================================================================
// JSON file
// ============================================================================

/// Preferences as a JSON file; parent directories are created on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Result<Option<Preferences>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(self.path.clone(), e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Malformed(self.path.clone(), e))
    }

    fn save(&self, prefs: &Preferences) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
        }
        let json = serde_json::to_string_pretty(prefs)
            .map_err(|e| StoreError::Malformed(self.path.clone(), e))?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::Io(self.path.clone(), e))
    }
}

// ============================================================================
// In-memory and unavailable
// ============================================================================

/// Process-lifetime store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prefs: Mutex<Option<Preferences>>,
}

impl MemoryStore {
    pub fn with(prefs: Preferences) -> Self {
        Self {
            prefs: Mutex::new(Some(prefs)),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Option<Preferences>, StoreError> {
        Ok(*self.prefs.lock())
    }

    fn save(&self, prefs: &Preferences) -> Result<(), StoreError> {
        *self.prefs.lock() = Some(*prefs);
        Ok(())
    }
}

/// A store that is never reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
    fn load(&self) -> Result<Option<Preferences>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn save(&self, _prefs: &Preferences) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn prefs(n: i64) -> Preferences {
        Preferences {
            prefix_length: PrefixLength::new(n).unwrap(),
        }
    }

    #[test]
    fn test_json_layout() {
        let json = serde_json::to_string(&prefs(4)).unwrap();
        assert_eq!(json, r#"{"prefixLength":4}"#);
        let parsed: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Preferences::default());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/prefs.json"));
        assert_eq!(store.load().unwrap(), None);

        store.save(&prefs(7)).unwrap();
        assert_eq!(store.load().unwrap(), Some(prefs(7)));
    }

    #[test]
    fn test_out_of_range_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"prefixLength": 42}"#).unwrap();
        let store = JsonFileStore::new(&path);

        assert!(matches!(store.load(), Err(StoreError::Malformed(..))));
        assert_eq!(load_or_default(&store), Preferences::default());
    }

    #[test]
    fn test_unavailable_store_degrades() {
        let store = UnavailableStore;
        assert_eq!(load_or_default(&store), Preferences::default());
        assert!(!save_or_log(&store, &prefs(3)));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::default();
        assert_eq!(store.load().unwrap(), None);
        assert!(save_or_log(&store, &prefs(5)));
        assert_eq!(load_or_default(&store), prefs(5));
        assert_eq!(MemoryStore::with(prefs(9)).load().unwrap(), Some(prefs(9)));
    }

    #[test]
    fn test_from_config() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            enable: true,
            path: dir.path().join("p.json"),
        };
        let store = from_config(&config);
        store.save(&prefs(6)).unwrap();
        assert!(dir.path().join("p.json").exists());

        let memory = from_config(&StoreConfig {
            enable: false,
            ..config
        });
        assert_eq!(memory.load().unwrap(), None);
    }
}
