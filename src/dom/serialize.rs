//! [`Document`] → HTML.

use super::{Document, NodeData, NodeId};
use crate::utils::html::{escape, escape_attr, is_raw_text_element, is_void_element};

/// Serialize the whole document, doctype included.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = &doc.doctype {
        out.push_str(doctype);
    }
    for &child in doc.children(doc.root()) {
        write_node(doc, child, false, &mut out);
    }
    out
}

/// Serialize one node and its subtree.
pub fn node_to_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, false, &mut out);
    out
}

/// Serialize only the children of `id`.
pub fn inner_html(doc: &Document, id: NodeId) -> String {
    let raw = doc.element(id).is_some_and(|e| is_raw_text_element(&e.name));
    let mut out = String::new();
    for &child in doc.children(id) {
        write_node(doc, child, raw, &mut out);
    }
    out
}

fn write_node(doc: &Document, id: NodeId, raw_text: bool, out: &mut String) {
    let Some(node) = doc.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Document => {
            for &child in node.children() {
                write_node(doc, child, false, out);
            }
        }
        NodeData::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&escape(text));
            }
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
            }
            out.push('>');

            if is_void_element(&element.name) {
                return;
            }

            let raw = is_raw_text_element(&element.name);
            for &child in node.children() {
                write_node(doc, child, raw, out);
            }

            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}
