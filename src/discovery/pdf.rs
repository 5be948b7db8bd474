//! PDF viewer integration: readiness signals, fallback and text-layer sweeps.
//!
//! Candidates here are leaf elements (every child a text node), processed
//! through the element path of the mutator.

use std::sync::LazyLock;

use regex::Regex;

use super::generic::{in_skipped_subtree, is_hidden};
use crate::bionic::markers;
use crate::dom::{Document, NodeId, Selector};

/// Minimum trimmed length for the fallback sweep.
pub const FALLBACK_MIN_CHARS: usize = 10;

fn selector(source: &str) -> Selector {
    Selector::parse(source).unwrap_or_else(|| panic!("invalid built-in selector: {source}"))
}

static READY: LazyLock<Selector> =
    LazyLock::new(|| selector(".textLayer, #viewer, #viewerContainer, [data-page-number]"));
static TEXT_LAYER: LazyLock<Selector> = LazyLock::new(|| selector(".textLayer"));
static LAYER_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("span, div"));
static FALLBACK_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("span, div, p"));
static EMBEDDED_PDF: LazyLock<Selector> =
    LazyLock::new(|| selector("embed[type=application/pdf]"));

/// Viewer chrome: page numbers, toolbar labels.
static UI_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(page|zoom|print|download|save|menu|button|[0-9]+)$").unwrap()
});

/// Any recognized viewer signal present.
pub fn is_ready(doc: &Document) -> bool {
    doc.matches_any(&READY)
}

/// An opaque `<embed type="application/pdf">` whose text the tree cannot
/// reach.
pub fn has_embedded_viewer(doc: &Document) -> bool {
    doc.matches_any(&EMBEDDED_PDF)
}

pub fn is_ui_label(text: &str) -> bool {
    UI_LABEL.is_match(text.trim())
}

fn is_leaf(doc: &Document, id: NodeId) -> bool {
    let children = doc.children(id);
    !children.is_empty()
        && children
            .iter()
            .all(|&c| doc.get(c).is_some_and(|n| n.is_text()))
}

fn is_fresh(doc: &Document, id: NodeId) -> bool {
    doc.element(id).is_some_and(|e| {
        !is_hidden(e)
            && !e.has_class(markers::PROCESSED)
            && !e.has_class(markers::WORD)
            && !e.has_class(markers::BOLD)
            && !e.has_class(markers::NORMAL)
    }) && !in_skipped_subtree(doc, id)
}

/// Best-effort candidates while the viewer is not ready: visible leaf
/// `span`/`div`/`p` with more than ten characters of non-chrome text.
pub fn fallback_candidates(doc: &Document) -> Vec<NodeId> {
    doc.select_all(doc.root(), &FALLBACK_ITEM)
        .into_iter()
        .filter(|&id| is_leaf(doc, id) && is_fresh(doc, id))
        .filter(|&id| {
            let text = doc.text_content(id);
            let trimmed = text.trim();
            trimmed.chars().count() > FALLBACK_MIN_CHARS && !is_ui_label(trimmed)
        })
        .collect()
}

/// Every leaf `span`/`div` inside every `.textLayer`.
pub fn text_layer_candidates(doc: &Document) -> Vec<NodeId> {
    let mut out = Vec::new();
    for layer in doc.select_all(doc.root(), &TEXT_LAYER) {
        out.extend(
            doc.select_all(layer, &LAYER_ITEM)
                .into_iter()
                .filter(|&id| is_leaf(doc, id) && is_fresh(doc, id)),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_readiness_signals() {
        assert!(!is_ready(&parse_html("<div><p>loading</p></div>")));
        for source in [
            r#"<div class="textLayer"></div>"#,
            r#"<div id="viewer"></div>"#,
            r#"<div id="viewerContainer"></div>"#,
            r#"<div data-page-number="1"></div>"#,
        ] {
            assert!(is_ready(&parse_html(source)), "{source}");
        }
    }

    #[test]
    fn test_ui_labels() {
        for label in ["Page", "ZOOM", " 12 ", "download", "Menu"] {
            assert!(is_ui_label(label), "{label}");
        }
        for text in ["Page 1 of 3", "Download the report", "12a"] {
            assert!(!is_ui_label(text), "{text}");
        }
    }

    #[test]
    fn test_fallback_candidates() {
        let doc = parse_html(
            r#"<div><span>short</span><span>a longer sentence</span><p hidden>hidden paragraph text</p>
<div><button>Download</button><span>  1234567890123  </span></div><p>Another paragraph <b>with</b> markup</p><span class="bionic-processed">already handled text</span></div>"#,
        );
        let found: Vec<_> = fallback_candidates(&doc)
            .into_iter()
            .map(|id| doc.text_content(id))
            .collect();
        assert_eq!(found, vec!["a longer sentence"]);
    }

    #[test]
    fn test_text_layer_candidates() {
        let doc = parse_html(
            r#"<div id="viewer"><div class="page"><div class="textLayer"><span>Ab</span><span>second item</span><div><span>nested</span></div></div></div><span>outside layer</span></div>"#,
        );
        let found: Vec<_> = text_layer_candidates(&doc)
            .into_iter()
            .map(|id| doc.text_content(id))
            .collect();
        assert_eq!(found, vec!["Ab", "second item", "nested"]);
    }

    #[test]
    fn test_embedded_viewer() {
        assert!(has_embedded_viewer(&parse_html(
            r#"<embed type="application/pdf" src="a.pdf">"#
        )));
        assert!(!has_embedded_viewer(&parse_html(r#"<embed type="image/svg+xml">"#)));
    }
}
