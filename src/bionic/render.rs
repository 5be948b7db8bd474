//! Fragment renderer.
//!
//! Turns a split into nodes: whitespace and other segments become text,
//! split words become `<span class="bionic-word">` containers holding a
//! `bionic-bold` and a `bionic-normal` span. Unsplit words (length ≤ 1) stay
//! plain text.

use owo_colors::{OwoColorize, Stream};

use super::markers;
use super::split::{Segment, WordUnit};
use crate::dom::{Document, ElementData, NodeId};
use crate::utils::html::escape;

/// Build detached nodes for `segments`, ready to be spliced into the tree.
///
/// Nothing is attached; adjacent plain segments share one text node.
pub fn render_nodes(doc: &mut Document, segments: &[Segment<'_>]) -> Vec<NodeId> {
    let mut nodes = Vec::with_capacity(segments.len());
    let mut pending = String::new();

    for segment in segments {
        match segment {
            Segment::Word(word) if word.is_split() => {
                if !pending.is_empty() {
                    nodes.push(doc.create_text(&pending));
                    pending.clear();
                }
                nodes.push(word_node(doc, word));
            }
            other => other.push_to(&mut pending),
        }
    }

    if !pending.is_empty() {
        nodes.push(doc.create_text(&pending));
    }
    nodes
}

fn word_node(doc: &mut Document, word: &WordUnit<'_>) -> NodeId {
    let container = doc.create_element(ElementData::new("span").with_class(markers::WORD));
    let bold = doc.create_element(ElementData::new("span").with_class(markers::BOLD));
    let normal = doc.create_element(ElementData::new("span").with_class(markers::NORMAL));

    let bold_text = doc.create_text(word.prefix);
    doc.append_child(bold, bold_text);
    if !word.suffix.is_empty() {
        let normal_text = doc.create_text(word.suffix);
        doc.append_child(normal, normal_text);
    }

    doc.append_children(container, &[bold, normal]);
    container
}

/// Markup for `segments`, text escaped.
pub fn render_html(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Word(word) if word.is_split() => {
                out.push_str(&format!(
                    r#"<span class="{}"><span class="{}">{}</span><span class="{}">{}</span></span>"#,
                    markers::WORD,
                    markers::BOLD,
                    escape(word.prefix),
                    markers::NORMAL,
                    escape(word.suffix),
                ));
            }
            other => {
                let mut plain = String::new();
                other.push_to(&mut plain);
                out.push_str(&escape(&plain));
            }
        }
    }
    out
}

/// Terminal preview: prefixes in bold when the terminal supports it.
pub fn render_ansi(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Word(word) if word.is_split() => {
                let prefix = word.prefix.if_supports_color(Stream::Stdout, |t| t.bold());
                out.push_str(&prefix.to_string());
                out.push_str(word.suffix);
            }
            other => other.push_to(&mut out),
        }
    }
    out
}
