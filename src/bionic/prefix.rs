//! Validated prefix length.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejection of a prefix length outside `1..=10` or not an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixError {
    #[error(
        "prefix length must be between {min} and {max}, got {0}",
        min = PrefixLength::MIN,
        max = PrefixLength::MAX
    )]
    OutOfRange(String),

    #[error("prefix length must be an integer, got {0}")]
    NotAnInteger(String),
}

/// Number of leading characters to emphasize per word.
///
/// Always within `MIN..=MAX`; construction is the only validation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PrefixLength(u8);

impl PrefixLength {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: Self = Self(2);

    pub fn new(value: i64) -> Result<Self, PrefixError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            // Range check above guarantees the cast is lossless
            Ok(Self(value as u8))
        } else {
            Err(PrefixError::OutOfRange(value.to_string()))
        }
    }

    /// Validate an untyped command argument. Numbers with no fractional part
    /// (`3`, `3.0`) are accepted; strings and fractions are not coerced.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PrefixError> {
        let out_of_range = || PrefixError::OutOfRange(value.to_string());
        if let Some(n) = value.as_i64() {
            return Self::new(n);
        }
        if value.is_u64() {
            return Err(out_of_range());
        }
        match value.as_f64() {
            // `as` saturates, so huge values still land outside the range.
            Some(f) if f.fract() == 0.0 => Self::new(f as i64).map_err(|_| out_of_range()),
            _ => Err(PrefixError::NotAnInteger(value.to_string())),
        }
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl Default for PrefixLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for PrefixLength {
    type Error = PrefixError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrefixLength> for i64 {
    fn from(value: PrefixLength) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for PrefixLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bounds() {
        assert!(PrefixLength::new(0).is_err());
        assert!(PrefixLength::new(11).is_err());
        assert_eq!(PrefixLength::new(1).unwrap().get(), 1);
        assert_eq!(PrefixLength::new(10).unwrap().get(), 10);
    }

    #[test]
    fn test_from_json_rejects_non_integers() {
        assert_eq!(PrefixLength::from_json(&json!(3)).unwrap().get(), 3);
        assert!(matches!(
            PrefixLength::from_json(&json!(2.5)),
            Err(PrefixError::NotAnInteger(_))
        ));
        assert!(matches!(
            PrefixLength::from_json(&json!("3")),
            Err(PrefixError::NotAnInteger(_))
        ));
        assert_eq!(
            PrefixLength::from_json(&json!(-4)),
            Err(PrefixError::OutOfRange("-4".into()))
        );
    }

    #[test]
    fn test_from_json_whole_floats_and_huge_integers() {
        assert_eq!(PrefixLength::from_json(&json!(3.0)).unwrap().get(), 3);
        assert_eq!(
            PrefixLength::from_json(&json!(11.0)),
            Err(PrefixError::OutOfRange("11.0".into()))
        );
        assert_eq!(
            PrefixLength::from_json(&json!(u64::MAX)),
            Err(PrefixError::OutOfRange(u64::MAX.to_string()))
        );
        assert!(matches!(
            PrefixLength::from_json(&json!(1e30)),
            Err(PrefixError::OutOfRange(_))
        ));
        assert!(matches!(
            PrefixLength::from_json(&serde_json::Value::Null),
            Err(PrefixError::NotAnInteger(_))
        ));
    }

    #[test]
    fn test_serde_validates() {
        let parsed: Result<PrefixLength, _> = serde_json::from_str("12");
        assert!(parsed.is_err());
        let parsed: PrefixLength = serde_json::from_str("4").unwrap();
        assert_eq!(parsed.get(), 4);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "4");
    }

    #[test]
    fn test_error_message() {
        let err = PrefixLength::new(0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "prefix length must be between 1 and 10, got 0"
        );
    }
}
