//! Dotted config field paths.

/// Path of a config field, e.g. `monitor.chunk_size`.
///
/// Sections declare theirs as associated constants, so a diagnostic never
/// spells a field name by hand:
///
/// ```ignore
/// diag.error(MonitorConfig::CHUNK_SIZE, "must be at least 1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// `monitor` for `monitor.chunk_size`.
    pub fn section(&self) -> &'static str {
        self.0.split_once('.').map_or(self.0, |(section, _)| section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section() {
        assert_eq!(FieldPath::new("monitor.chunk_size").section(), "monitor");
        assert_eq!(FieldPath::new("store").section(), "store");
    }
}
