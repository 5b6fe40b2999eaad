//! Component registry and renderers for compiled folio pages.
//!
//! A compiled body names rendering roles (code blocks, callouts, embedded API
//! references). This crate maps those roles to [`Renderer`]s through a
//! [`ComponentRegistry`] and walks a body into HTML.

pub mod api_reference;
pub mod builtin;
pub mod code_block;
pub mod highlight;
pub mod html;
pub mod registry;
pub mod traits;

pub use api_reference::{ApiDocumentError, ApiReference, OperationRef, API_PAGE};
pub use builtin::{Callout, Card, Cards};
pub use code_block::{HighlightedCodeBlock, PlainCodeBlock};
pub use highlight::{highlight, highlight_css, HIGHLIGHT_THEME};
pub use html::{escape_html, markdown_to_html, render_body};
pub use registry::{
    default_registry, page_overrides, page_registry, ComponentRegistry, RegistryError, Role,
};
pub use traits::{RenderError, RenderInput, Renderer};
