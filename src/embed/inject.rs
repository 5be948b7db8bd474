//! Execution-injection collaborator.
//!
//! The engine cannot reach text inside an opaque embedded viewer. It hands a
//! self-contained routine to a [`ScriptInjector`], which runs it in the
//! viewer's own script context.

use thiserror::Error;

use crate::dom::{Document, ElementData};

/// Attribute tagging injected `<script>` elements.
pub const SCRIPT_MARKER: &str = "data-bionic-handler";

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("document has no <head> to inject into")]
    NoHead,

    #[error("injection rejected: {0}")]
    Rejected(String),
}

pub trait ScriptInjector: Send + Sync {
    /// Run `script` inside the embedded content's context.
    fn inject(&self, doc: &mut Document, script: &str) -> Result<(), InjectError>;
}

/// Appends an inline `<script>` to `<head>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadScriptInjector;

impl ScriptInjector for HeadScriptInjector {
    fn inject(&self, doc: &mut Document, script: &str) -> Result<(), InjectError> {
        let head = doc.head().ok_or(InjectError::NoHead)?;
        let element = doc.create_element(ElementData::new("script").with_attr(SCRIPT_MARKER, "pdf"));
        let body = doc.create_text(script);
        doc.append_child(element, body);
        if doc.append_child(head, element) {
            Ok(())
        } else {
            doc.remove(element);
            Err(InjectError::Rejected("head refused the script".into()))
        }
    }
}
