//! Minimal compound selectors.
//!
//! Supports what discovery needs and nothing more: an optional tag name
//! followed by any number of `.class`, `#id`, `[attr]` and `[attr=value]`
//! conditions, and comma-separated lists of those.

use super::{Document, ElementData, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Class(String),
    Id(String),
    Attr(String, Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse a selector list. Returns `None` on anything unsupported.
    pub fn parse(source: &str) -> Option<Self> {
        let alternatives = source
            .split(',')
            .map(|part| parse_compound(part.trim()))
            .collect::<Option<Vec<_>>>()?;
        if alternatives.is_empty() {
            return None;
        }
        Some(Self { alternatives })
    }

    /// `.name`
    pub fn class(name: &str) -> Self {
        Self {
            alternatives: vec![Compound {
                tag: None,
                conditions: vec![Condition::Class(name.to_string())],
            }],
        }
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }
}

impl Compound {
    fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && !element.is(tag)
        {
            return false;
        }
        self.conditions.iter().all(|cond| match cond {
            Condition::Class(c) => element.has_class(c),
            Condition::Id(id) => element.id() == Some(id.as_str()),
            Condition::Attr(name, None) => element.has_attr(name),
            Condition::Attr(name, Some(value)) => element.attr(name) == Some(value.as_str()),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(rest: &str) -> (&str, &str) {
    let end = rest
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    rest.split_at(end)
}

fn parse_compound(source: &str) -> Option<Compound> {
    if source.is_empty() {
        return None;
    }

    let (tag, mut rest) = take_ident(source);
    let mut compound = Compound {
        tag: (!tag.is_empty()).then(|| tag.to_ascii_lowercase()),
        conditions: Vec::new(),
    };

    while let Some(first) = rest.chars().next() {
        match first {
            '.' | '#' => {
                let (name, tail) = take_ident(&rest[1..]);
                if name.is_empty() {
                    return None;
                }
                compound.conditions.push(if first == '.' {
                    Condition::Class(name.to_string())
                } else {
                    Condition::Id(name.to_string())
                });
                rest = tail;
            }
            '[' => {
                let close = rest.find(']')?;
                let body = &rest[1..close];
                let condition = match body.split_once('=') {
                    Some((name, value)) => Condition::Attr(
                        name.trim().to_string(),
                        Some(value.trim().trim_matches(['"', '\'']).to_string()),
                    ),
                    None => Condition::Attr(body.trim().to_string(), None),
                };
                compound.conditions.push(condition);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }

    Some(compound)
}

impl Document {
    /// All elements under `root` (exclusive) matching `selector`, in
    /// document order.
    pub fn select_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| self.element(id).is_some_and(|e| selector.matches(e)))
            .collect()
    }

    pub fn select_first(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(root)
            .find(|&id| self.element(id).is_some_and(|e| selector.matches(e)))
    }

    /// Whether any element in the document matches `selector`.
    pub fn matches_any(&self, selector: &Selector) -> bool {
        self.select_first(self.root(), selector).is_some()
    }
}
