//! `[pdf]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [pdf]
//! poll_ms = 500               # Viewer readiness check interval
//! settle_ms = 1000            # Delay after readiness before the text-layer sweep
//! fallback_delay_ms = 100     # Delay before a best-effort sweep starts
//! fallback_chunk_size = 50    # Elements per fallback chunk
//! fallback_yield_ms = 10      # Pause between fallback chunks
//! inject_embedded = true      # Hand the routine to embedded viewers
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub poll_ms: u64,
    pub settle_ms: u64,
    pub fallback_delay_ms: u64,
    pub fallback_chunk_size: usize,
    pub fallback_yield_ms: u64,
    pub inject_embedded: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            poll_ms: 500,
            settle_ms: 1000,
            fallback_delay_ms: 100,
            fallback_chunk_size: 50,
            fallback_yield_ms: 10,
            inject_embedded: true,
        }
    }
}

impl PdfConfig {
    pub const POLL_MS: FieldPath = FieldPath::new("pdf.poll_ms");
    pub const FALLBACK_CHUNK_SIZE: FieldPath = FieldPath::new("pdf.fallback_chunk_size");

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    #[inline]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    #[inline]
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    #[inline]
    pub fn fallback_pause(&self) -> Duration {
        Duration::from_millis(self.fallback_yield_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.poll_ms == 0 {
            diag.error_with_hint(Self::POLL_MS, "must be at least 1", "the default is 500");
        }
        if self.fallback_chunk_size == 0 {
            diag.error(Self::FALLBACK_CHUNK_SIZE, "must be at least 1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_pdf_config() {
        let config = test_parse_config("[pdf]\npoll_ms = 250\ninject_embedded = false");
        assert_eq!(config.pdf.poll_interval(), Duration::from_millis(250));
        assert!(!config.pdf.inject_embedded);
        assert_eq!(config.pdf.settle(), Duration::from_secs(1));
        assert_eq!(config.pdf.fallback_chunk_size, 50);
    }

    #[test]
    fn test_pdf_validation() {
        let mut diag = ConfigDiagnostics::new();
        PdfConfig {
            poll_ms: 0,
            fallback_chunk_size: 0,
            ..Default::default()
        }
        .validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
