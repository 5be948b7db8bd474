//! Common utilities shared across CLI commands.

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::bionic::PrefixLength;
use crate::config::EngineConfig;
use crate::discovery::PageSignals;
use crate::store::{self, PreferenceStore};

use super::args::PageArgs;

/// Read a file, or stdin for `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write to a file, or stdout without one.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Preference store configured by `[store]` / `--store`.
pub fn open_store(config: &EngineConfig) -> Box<dyn PreferenceStore> {
    store::from_config(&config.store)
}

/// Prefix length for a one-shot command: the flag if given, else the stored
/// preference. The flag is validated, never persisted.
pub fn resolve_prefix(flag: Option<i64>, config: &EngineConfig) -> Result<PrefixLength> {
    match flag {
        Some(value) => Ok(PrefixLength::new(value)?),
        None => Ok(store::load_or_default(open_store(config).as_ref()).prefix_length),
    }
}

impl From<&PageArgs> for PageSignals {
    fn from(args: &PageArgs) -> Self {
        PageSignals::new(args.content_type.clone(), args.url.clone())
    }
}
