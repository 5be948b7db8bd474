//! `[ledger]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [ledger]
//! capacity = 10000            # Max transformed nodes remembered for restore
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::mutator::DEFAULT_CAPACITY;

/// Below this the ledger churns on any real page.
const SMALL_CAPACITY: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Maximum ledger entries before eviction kicks in.
    pub capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl LedgerConfig {
    pub const CAPACITY: FieldPath = FieldPath::new("ledger.capacity");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.capacity == 0 {
            diag.error_with_hint(
                Self::CAPACITY,
                "must be at least 1",
                format!("the default is {DEFAULT_CAPACITY}"),
            );
        } else if self.capacity < SMALL_CAPACITY {
            diag.warn(
                Self::CAPACITY,
                format!("{} entries will be evicted constantly", self.capacity),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_ledger_config() {
        let config = test_parse_config("[ledger]\ncapacity = 500");
        assert_eq!(config.ledger.capacity, 500);
        assert_eq!(test_parse_config("").ledger.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_ledger_validation() {
        let mut diag = ConfigDiagnostics::new();
        LedgerConfig { capacity: 0 }.validate(&mut diag);
        assert_eq!(diag.len(), 1);

        let mut diag = ConfigDiagnostics::new();
        LedgerConfig { capacity: 10 }.validate(&mut diag);
        assert!(diag.is_empty());
        assert_eq!(diag.warnings().len(), 1);
    }
}
