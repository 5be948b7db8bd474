//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `inject` - Hands the viewer routine to an isolated script context
//! - `pdf` - The self-contained viewer routine (handler.js)
//! - `css` - Companion stylesheet (bionic.css)
//!
//! Both resources are minified by `build.rs`. Every constant they share with
//! the engine is a placeholder filled from [`crate::bionic::markers`] at
//! render time.

mod inject;
mod template;

pub use inject::{HeadScriptInjector, InjectError, SCRIPT_MARKER, ScriptInjector};
pub use template::{Template, TemplateVars};

use crate::bionic::markers;

/// Marker class placeholders shared by the script and the stylesheet.
fn marker_pairs() -> Vec<(&'static str, String)> {
    vec![
        ("__BIONIC_WORD_CLASS__", markers::WORD.to_string()),
        ("__BIONIC_BOLD_CLASS__", markers::BOLD.to_string()),
        ("__BIONIC_NORMAL_CLASS__", markers::NORMAL.to_string()),
        ("__BIONIC_PROCESSED_CLASS__", markers::PROCESSED.to_string()),
    ]
}

pub mod pdf {
    use super::{Template, TemplateVars, marker_pairs};
    use crate::bionic::{PrefixLength, markers};

    /// Readiness poll of the injected routine.
    pub const POLL_MS: u64 = 100;

    /// Delay before the routine sweeps layers that already exist.
    pub const SETTLE_MS: u64 = 1000;

    /// Variables for handler.js.
    ///
    /// The routine cannot read the live session, so the prefix length is the
    /// default one.
    #[derive(Debug, Clone, Copy)]
    pub struct HandlerVars {
        pub prefix: PrefixLength,
        pub poll_ms: u64,
        pub settle_ms: u64,
    }

    impl Default for HandlerVars {
        fn default() -> Self {
            Self {
                prefix: PrefixLength::DEFAULT,
                poll_ms: POLL_MS,
                settle_ms: SETTLE_MS,
            }
        }
    }

    impl TemplateVars for HandlerVars {
        fn pairs(&self) -> Vec<(&'static str, String)> {
            let mut pairs = marker_pairs();
            pairs.extend([
                ("__BIONIC_WORD_CHARS__", markers::WORD_CHARS.to_string()),
                ("__BIONIC_PREFIX_LENGTH__", self.prefix.to_string()),
                ("__BIONIC_MIN_TEXT_LENGTH__", markers::MIN_TEXT_LEN.to_string()),
                ("__BIONIC_POLL_MS__", self.poll_ms.to_string()),
                ("__BIONIC_SETTLE_MS__", self.settle_ms.to_string()),
            ]);
            pairs
        }
    }

    /// Viewer routine with placeholders.
    pub const HANDLER_JS: Template<HandlerVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/handler.min.js")));

    /// The routine as injected.
    pub fn handler_script() -> String {
        HANDLER_JS.render(&HandlerVars::default())
    }
}

pub mod css {
    use super::{Template, TemplateVars, marker_pairs};

    /// Variables for bionic.css: only the marker classes.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StyleVars;

    impl TemplateVars for StyleVars {
        fn pairs(&self) -> Vec<(&'static str, String)> {
            marker_pairs()
        }
    }

    pub const BIONIC_CSS: Template<StyleVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/bionic.min.css")));

    pub fn stylesheet() -> String {
        BIONIC_CSS.render(&StyleVars)
    }
}
