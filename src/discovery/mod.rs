//! Traversal and discovery of text worth transforming.
//!
//! # Module Structure
//!
//! - `generic` - visible text nodes of an ordinary page
//! - `pdf` - viewer readiness, fallback sweep and text-layer sweep
//! - `detect` - whether the page is a PDF context at all

pub mod detect;
pub mod generic;
pub mod pdf;

pub use detect::{PageSignals, is_pdf_context};
pub use generic::{TextWalker, collect_added};

/// Which traversal a session uses. Fixed at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Generic,
    Pdf,
}

impl Mode {
    pub fn detect(signals: &PageSignals, doc: &crate::dom::Document) -> Self {
        if is_pdf_context(signals, doc) {
            Self::Pdf
        } else {
            Self::Generic
        }
    }

    pub fn is_pdf(self) -> bool {
        self == Self::Pdf
    }
}
