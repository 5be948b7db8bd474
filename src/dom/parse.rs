//! HTML → [`Document`] via `tl`.
//!
//! `tl` drives the tree structure. Attributes are read back from each start
//! tag's source text instead of `tl`'s attribute map, which loses source
//! order and misreads a name that follows a valueless attribute.

use super::{Document, ElementData, NodeId};
use crate::utils::html::{is_raw_text_element, unescape};

/// Parse an HTML document or fragment.
///
/// Never fails: input `tl` rejects becomes a single text node, so a caller
/// always gets a tree to work on.
pub fn parse_html(source: &str) -> Document {
    let mut doc = Document::new();
    doc.doctype = extract_doctype(source);

    let Ok(dom) = tl::parse(source, tl::ParserOptions::default()) else {
        let text = doc.create_text(source);
        let root = doc.root();
        doc.append_child(root, text);
        return doc;
    };

    let parser = dom.parser();
    let root = doc.root();
    for handle in dom.children() {
        if let Some(id) = convert(&mut doc, *handle, parser, false) {
            doc.append_child(root, id);
        }
    }
    doc
}

/// Convert a tl node handle into a detached arena node.
fn convert(
    doc: &mut Document,
    handle: tl::NodeHandle,
    parser: &tl::Parser,
    raw_text: bool,
) -> Option<NodeId> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_lowercase();
            // Markup declarations (doctype) are kept on the document instead
            if name.starts_with('!') {
                return None;
            }

            let mut element = ElementData::new(&name);
            for (key, value) in start_tag_attrs(&tag.raw().as_utf8_str()) {
                // First occurrence wins, as in a browser.
                if !element.has_attr(&key) {
                    element.attrs.push((key, unescape(value).into_owned()));
                }
            }

            let id = doc.create_element(element);
            let raw = is_raw_text_element(&name);
            let children: Vec<_> = tag
                .children()
                .top()
                .iter()
                .filter_map(|child| convert(doc, *child, parser, raw))
                .collect();
            doc.append_children(id, &children);
            Some(id)
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            if text.is_empty() || is_doctype(&text) {
                return None;
            }
            let text: String = if raw_text {
                text.into_owned()
            } else {
                unescape(&text).into_owned()
            };
            Some(doc.create_text(&text))
        }
        tl::Node::Comment(bytes) => {
            let text = bytes.as_utf8_str();
            let inner = text
                .strip_prefix("<!--")
                .and_then(|t| t.strip_suffix("-->"))
                .unwrap_or(text.as_ref());
            Some(doc.create_comment(inner))
        }
    }
}

/// Attributes of the start tag at the head of `raw`, in source order.
/// Names are lowercased; valueless attributes get an empty value.
fn start_tag_attrs(raw: &str) -> Vec<(String, &str)> {
    let bytes = raw.as_bytes();
    let mut attrs = Vec::new();
    let is_space = |b: u8| b.is_ascii_whitespace();

    // Skip `<` and the tag name.
    let mut i = 1;
    while i < bytes.len() && !is_space(bytes[i]) && !matches!(bytes[i], b'>' | b'/') {
        i += 1;
    }

    loop {
        while i < bytes.len() && (is_space(bytes[i]) || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] == b'>' {
            return attrs;
        }

        let name_start = i;
        while i < bytes.len() && !is_space(bytes[i]) && !matches!(bytes[i], b'=' | b'>' | b'/') {
            i += 1;
        }
        let name = raw[name_start..i].to_ascii_lowercase();

        let mut j = i;
        while j < bytes.len() && is_space(bytes[j]) {
            j += 1;
        }
        if j >= bytes.len() || bytes[j] != b'=' {
            attrs.push((name, ""));
            continue;
        }

        i = j + 1;
        while i < bytes.len() && is_space(bytes[i]) {
            i += 1;
        }
        let value = match bytes.get(i) {
            Some(&quote @ (b'"' | b'\'')) => {
                let start = i + 1;
                let end = raw[start..].find(quote as char).map_or(raw.len(), |n| start + n);
                i = (end + 1).min(raw.len());
                &raw[start..end]
            }
            _ => {
                let start = i;
                while i < bytes.len() && !is_space(bytes[i]) && bytes[i] != b'>' {
                    i += 1;
                }
                &raw[start..i]
            }
        };
        attrs.push((name, value));
    }
}

fn is_doctype(text: &str) -> bool {
    text.trim_start()
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"))
}

/// Leading `<!DOCTYPE ...>` declaration, if any.
fn extract_doctype(source: &str) -> Option<String> {
    let trimmed = source.trim_start();
    if !is_doctype(trimmed) {
        return None;
    }
    let end = trimmed.find('>')?;
    Some(trimmed[..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure() {
        let doc = parse_html(
            r#"<html><head><title>T</title></head><body><p class="x">Hello <b>world</b></p></body></html>"#,
        );
        let body = doc.body();
        assert_ne!(body, doc.root());
        assert_eq!(doc.text_content(body), "Hello world");

        let p = doc.children(body)[0];
        assert!(doc.element(p).unwrap().has_class("x"));
    }

    #[test]
    fn test_entities_decoded() {
        let doc = parse_html("<p>fish &amp; chips &lt;3</p>");
        assert_eq!(doc.text_content(doc.root()), "fish & chips <3");
    }

    #[test]
    fn test_script_text_kept_raw() {
        let doc = parse_html("<script>if (a &amp;&amp; b) {}</script>");
        assert_eq!(doc.text_content(doc.root()), "if (a &amp;&amp; b) {}");
    }

    #[test]
    fn test_attrs_keep_source_order() {
        let doc = parse_html(r#"<p id="a" class='b' title=t>x</p>"#);
        let p = doc.children(doc.root())[0];
        let attrs = &doc.element(p).unwrap().attrs;
        let names: Vec<_> = attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["id", "class", "title"]);
        assert_eq!(attrs[2].1, "t");
    }

    #[test]
    fn test_attr_after_valueless_attr() {
        let doc =
            parse_html(r#"<div hidden class="note" data-x = "1 > 0" DISABLED>Some words</div>"#);
        let div = doc.children(doc.root())[0];
        let el = doc.element(div).unwrap();
        assert_eq!(el.attr("hidden"), Some(""));
        assert_eq!(el.attr("class"), Some("note"));
        assert_eq!(el.attr("data-x"), Some("1 > 0"));
        assert_eq!(el.attr("disabled"), Some(""));
        assert_eq!(doc.text_content(div), "Some words");
    }

    #[test]
    fn test_attr_entities_and_duplicates() {
        let doc = parse_html(r#"<a href="?a=1&amp;b=2" title="caf&eacute;" href="other">x</a>"#);
        let a = doc.children(doc.root())[0];
        let el = doc.element(a).unwrap();
        assert_eq!(el.attr("href"), Some("?a=1&b=2"));
        assert_eq!(el.attr("title"), Some("café"));
        assert_eq!(el.attrs.len(), 2);
    }

    #[test]
    fn test_start_tag_attrs_self_closing() {
        assert_eq!(start_tag_attrs("<br/>"), Vec::<(String, &str)>::new());
        assert_eq!(
            start_tag_attrs(r#"<img src="a.png" alt=""/>"#),
            [("src".to_string(), "a.png"), ("alt".to_string(), "")]
        );
    }

    #[test]
    fn test_named_entities_decoded() {
        let doc = parse_html("<p>caf&eacute; &mdash; &copy; done</p>");
        assert_eq!(doc.text_content(doc.root()), "café — © done");
    }

    #[test]
    fn test_doctype() {
        let doc = parse_html("<!DOCTYPE html>\n<html><body></body></html>");
        assert_eq!(doc.doctype.as_deref(), Some("<!DOCTYPE html>"));
        assert_eq!(parse_html("<p>x</p>").doctype, None);
    }

    #[test]
    fn test_fragment_has_no_body() {
        let doc = parse_html("just text");
        assert_eq!(doc.body(), doc.root());
        assert_eq!(doc.text_content(doc.root()), "just text");
    }
}
