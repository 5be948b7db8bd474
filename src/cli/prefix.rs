//! Prefix command: read or write the stored prefix length.

use anyhow::{Result, bail};

use super::common::open_store;
use crate::bionic::PrefixLength;
use crate::config::EngineConfig;
use crate::log;
use crate::store::{Preferences, load_or_default};

/// Print the stored prefix length, or validate and store a new one.
pub fn run_prefix(value: Option<i64>, config: &EngineConfig) -> Result<()> {
    let store = open_store(config);

    let Some(value) = value else {
        let prefs = load_or_default(store.as_ref());
        println!("{}", prefs.prefix_length);
        return Ok(());
    };

    let prefix_length = PrefixLength::new(value)?;
    if !config.store.enable {
        log!("store"; "persistence disabled, `{}` kept for this run only", prefix_length);
    }
    if let Err(e) = store.save(&Preferences { prefix_length }) {
        bail!("could not save preferences: {e}");
    }
    log!("store"; "prefix length set to {}", prefix_length);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, PreferenceStore};

    fn config(dir: &tempfile::TempDir) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.store.path = dir.path().join("prefs.json");
        config
    }

    #[test]
    fn test_set_and_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config(&dir);
        run_prefix(Some(7), &config).unwrap();
        let prefs = JsonFileStore::new(&config.store.path).load().unwrap().unwrap();
        assert_eq!(prefs.prefix_length.get(), 7);
        run_prefix(None, &config).unwrap();
    }

    #[test]
    fn test_out_of_range_leaves_store_alone() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config(&dir);
        run_prefix(Some(3), &config).unwrap();
        assert!(run_prefix(Some(0), &config).is_err());
        assert!(run_prefix(Some(11), &config).is_err());
        let prefs = JsonFileStore::new(&config.store.path).load().unwrap().unwrap();
        assert_eq!(prefs.prefix_length.get(), 3);
    }
}
