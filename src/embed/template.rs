//! Template types for typed variable injection.

use std::marker::PhantomData;

/// Variable set for one template.
///
/// Placeholders are `__NAME__` tokens; the minifier keeps them intact
/// because they are string contents or top-level identifiers.
pub trait TemplateVars {
    /// `(placeholder, replacement)` pairs.
    fn pairs(&self) -> Vec<(&'static str, String)>;

    fn apply(&self, content: &str) -> String {
        self.pairs()
            .into_iter()
            .fold(content.to_string(), |out, (placeholder, value)| {
                out.replace(placeholder, &value)
            })
    }
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }

    /// Raw content with placeholders.
    pub const fn content(&self) -> &'static str {
        self.content
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}
