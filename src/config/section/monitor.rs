//! `[monitor]` section configuration.
//!
//! Timing of the change monitor that keeps dynamically inserted content
//! transformed.
//!
//! # Example
//!
//! ```toml
//! [monitor]
//! debounce_ms = 200           # Quiet period before a mutation batch is flushed
//! chunk_size = 20             # Nodes transformed per tick
//! yield_ms = 10               # Pause between chunks
//! budget_ms = 50              # Processing time allowed per window
//! budget_window_ms = 1000     # Length of the budget window
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub debounce_ms: u64,
    pub chunk_size: usize,
    pub yield_ms: u64,
    pub budget_ms: u64,
    pub budget_window_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            chunk_size: 20,
            yield_ms: 10,
            budget_ms: 50,
            budget_window_ms: 1000,
        }
    }
}

impl MonitorConfig {
    pub const DEBOUNCE_MS: FieldPath = FieldPath::new("monitor.debounce_ms");
    pub const CHUNK_SIZE: FieldPath = FieldPath::new("monitor.chunk_size");
    pub const BUDGET_MS: FieldPath = FieldPath::new("monitor.budget_ms");
    pub const BUDGET_WINDOW_MS: FieldPath = FieldPath::new("monitor.budget_window_ms");

    #[inline]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[inline]
    pub fn chunk_pause(&self) -> Duration {
        Duration::from_millis(self.yield_ms)
    }

    #[inline]
    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }

    #[inline]
    pub fn budget_window(&self) -> Duration {
        Duration::from_millis(self.budget_window_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.chunk_size == 0 {
            diag.error(Self::CHUNK_SIZE, "must be at least 1");
        }
        if self.budget_window_ms == 0 {
            diag.error(Self::BUDGET_WINDOW_MS, "must be at least 1");
        }
        if self.budget_ms == 0 {
            diag.error_with_hint(
                Self::BUDGET_MS,
                "a zero budget drops every mutation batch",
                "disable the session instead",
            );
        } else if self.budget_window_ms > 0 && self.budget_ms > self.budget_window_ms {
            diag.warn(
                Self::BUDGET_MS,
                "larger than the window, the budget never limits anything",
            );
        }
        if self.debounce_ms == 0 {
            diag.warn(Self::DEBOUNCE_MS, "every single mutation is flushed on its own");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_monitor_config() {
        let config = test_parse_config("[monitor]\ndebounce_ms = 50\nchunk_size = 5");
        assert_eq!(config.monitor.debounce(), Duration::from_millis(50));
        assert_eq!(config.monitor.chunk_size, 5);
        assert_eq!(config.monitor.yield_ms, 10);
    }

    #[test]
    fn test_monitor_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.monitor.debounce_ms, 200);
        assert_eq!(config.monitor.chunk_size, 20);
        assert_eq!(config.monitor.budget(), Duration::from_millis(50));
        assert_eq!(config.monitor.budget_window(), Duration::from_secs(1));
    }

    #[test]
    fn test_monitor_validation() {
        let mut diag = ConfigDiagnostics::new();
        MonitorConfig {
            chunk_size: 0,
            budget_ms: 0,
            ..Default::default()
        }
        .validate(&mut diag);
        assert_eq!(diag.len(), 2);

        let mut diag = ConfigDiagnostics::new();
        MonitorConfig {
            budget_ms: 2000,
            ..Default::default()
        }
        .validate(&mut diag);
        assert!(diag.is_empty());
        assert_eq!(diag.warnings().len(), 1);
    }
}
