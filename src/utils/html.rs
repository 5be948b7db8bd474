//! Markup text helpers for the document model.
//!
//! Escaping follows the HTML fragment serialization rules: text nodes escape
//! `&`, `<`, `>` and no-break spaces, attribute values escape `&`, `"` and
//! no-break spaces. Anything else is written as-is, so a parse/serialize
//! cycle over already-serialized output is stable. Decoding covers every
//! named reference via `html-escape`.

use std::borrow::Cow;

#[derive(Clone, Copy)]
enum Context {
    Text,
    Attribute,
}

impl Context {
    #[inline]
    fn entity(self, c: char) -> Option<&'static str> {
        match (self, c) {
            (_, '&') => Some("&amp;"),
            (_, '\u{00A0}') => Some("&nbsp;"),
            (Self::Text, '<') => Some("&lt;"),
            (Self::Text, '>') => Some("&gt;"),
            (Self::Attribute, '"') => Some("&quot;"),
            _ => None,
        }
    }
}

fn escape_in(s: &str, context: Context) -> Cow<'_, str> {
    let Some(first) = s.find(|c| context.entity(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 8);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match context.entity(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape a text node.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_in(s, Context::Text)
}

/// Escape a double-quoted attribute value.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_in(s, Context::Attribute)
}

/// Decode character references, the full HTML named set included.
/// Unknown or malformed references are kept verbatim.
#[inline]
pub fn unescape(s: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(s)
}

/// Elements that never have children or an end tag.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is written without escaping.
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Elements whose text is never reading material: code, styles, and form
/// controls the user types into.
#[inline]
pub fn is_non_content_element(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "noscript" | "template" | "textarea" | "input" | "select" | "option"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_borrows_clean_text() {
        assert!(matches!(escape("plain words"), Cow::Borrowed(_)));
        assert!(matches!(escape_attr("bionic-bold"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_text_node() {
        assert_eq!(escape("fish & chips <3"), "fish &amp; chips &lt;3");
        // Quotes are literal in text.
        assert_eq!(escape(r#"say "hi", it's"#), r#"say "hi", it's"#);
        assert_eq!(escape("a\u{00A0}b"), "a&nbsp;b");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attr(r#"a"b&c"#), "a&quot;b&amp;c");
        assert_eq!(escape_attr("x<y>"), "x<y>");
    }

    #[test]
    fn test_unescape_references() {
        assert_eq!(unescape("&lt;p&gt; &amp; &quot;q&quot;"), "<p> & \"q\"");
        assert_eq!(unescape("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(unescape("&nbsp;"), "\u{00A0}");
    }

    #[test]
    fn test_unescape_named_set() {
        assert_eq!(unescape("caf&eacute; &mdash; &copy; &hellip;"), "café — © …");
    }

    #[test]
    fn test_unescape_keeps_unknown() {
        assert_eq!(unescape("AT&T"), "AT&T");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("trailing &"), "trailing &");
    }

    #[test]
    fn test_text_round_trip() {
        let text = "1 < 2 && \u{00A0}\"ok\"";
        assert_eq!(unescape(&escape(text)), text);
    }

    #[test]
    fn test_element_classes() {
        assert!(is_void_element("br") && is_void_element("img"));
        assert!(!is_void_element("span"));
        assert!(is_raw_text_element("script") && !is_raw_text_element("pre"));
        assert!(is_non_content_element("textarea") && is_non_content_element("option"));
        assert!(!is_non_content_element("p"));
    }
}
