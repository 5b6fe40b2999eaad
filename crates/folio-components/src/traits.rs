//! Trait definitions for component renderers.

use folio_mdx::{PropValue, Props};

/// Input handed to a renderer for one node of a compiled body.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    /// Element name as written in the content ("pre" for code blocks)
    pub name: &'a str,

    /// Props of the element
    pub props: &'a Props,

    /// Rendered HTML of the children, or the raw source for code blocks
    pub children: &'a str,
}

impl<'a> RenderInput<'a> {
    /// Look up a string prop.
    pub fn str_prop(&self, name: &str) -> Option<&'a str> {
        self.props.get(name).and_then(PropValue::as_str)
    }

    /// Look up a required string prop.
    pub fn required_str_prop(&self, name: &str) -> Result<&'a str, RenderError> {
        self.str_prop(name).ok_or_else(|| RenderError::InvalidProps {
            component: self.name.to_string(),
            message: format!("missing required prop `{}`", name),
        })
    }
}

/// Errors that can occur while rendering a body.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("No renderer registered for role '{role}' (line {line})")]
    MissingRenderer { role: String, line: usize },

    #[error("Invalid props for <{component}>: {message}")]
    InvalidProps { component: String, message: String },
}

/// Renders one role of a compiled body to HTML.
pub trait Renderer: Send + Sync {
    /// Renderer identifier (e.g., "highlighted-code-block")
    fn name(&self) -> &'static str;

    /// Render a node to HTML.
    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError>;
}
