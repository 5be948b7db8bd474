//! PDF-context detection, computed once per session.

use std::sync::LazyLock;

use url::Url;

use crate::dom::{Document, Selector};

static VIEWER_SIGNATURE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("embed[type=application/pdf], #viewer, #viewerContainer")
        .unwrap_or_else(|| panic!("invalid built-in selector"))
});

/// What the host knows about the page besides its tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    /// Document content type, e.g. `text/html` or `application/pdf`.
    pub content_type: Option<String>,
    /// Page URL as loaded.
    pub url: Option<String>,
}

impl PageSignals {
    pub fn new(content_type: Option<String>, url: Option<String>) -> Self {
        Self { content_type, url }
    }

    fn is_pdf_content_type(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            ct.split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/pdf"))
        })
    }

    fn is_pdf_url(&self) -> bool {
        let Some(raw) = self.url.as_deref() else {
            return false;
        };
        let path_is_pdf = Url::parse(raw)
            .map(|u| u.path().to_ascii_lowercase().ends_with(".pdf"))
            .unwrap_or_else(|_| {
                let path = raw.split(['?', '#']).next().unwrap_or(raw);
                path.to_ascii_lowercase().ends_with(".pdf")
            });
        path_is_pdf || raw.contains(".pdf")
    }
}

/// Whether the page is a PDF or a PDF viewer.
pub fn is_pdf_context(signals: &PageSignals, doc: &Document) -> bool {
    signals.is_pdf_content_type() || signals.is_pdf_url() || doc.matches_any(&VIEWER_SIGNATURE)
}
