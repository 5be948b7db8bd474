//! Utility modules shared by the document model and renderers.

pub mod html;
