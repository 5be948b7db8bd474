//! Bionic typography: the pure word splitter and the fragment renderer.
//!
//! # Module Structure
//!
//! - `split` - text → ordered, lossless segments (whitespace / word / other)
//! - `render` - segments → arena nodes, markup or terminal preview
//! - `prefix` - validated prefix length
//! - `markers` - class names shared with the stylesheet and injected routine
//!
//! Nothing in `split` touches the document; it is the single definition the
//! injected routine mirrors.

pub mod markers;
mod prefix;
mod render;
mod split;

pub use prefix::{PrefixError, PrefixLength};
pub use render::{render_ansi, render_html, render_nodes};
pub use split::{Segment, WordUnit, bold_count, has_emphasis, is_word_char, split};
