//! Marker class names.
//!
//! These are the only names the stylesheet, the restore path and the
//! injected viewer routine agree on.

/// Container of a split word: `<span class="bionic-word">`.
pub const WORD: &str = "bionic-word";

/// Emphasized prefix inside a word container.
pub const BOLD: &str = "bionic-bold";

/// Normal-weight suffix inside a word container.
pub const NORMAL: &str = "bionic-normal";

/// Element whose children were replaced in place (element path).
pub const PROCESSED: &str = "bionic-processed";

/// Word characters as a regex character-class body.
pub const WORD_CHARS: &str = "A-Za-z0-9_";

/// Minimum trimmed text length (in characters) worth transforming.
pub const MIN_TEXT_LEN: usize = 3;
