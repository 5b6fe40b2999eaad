//! Built-in content components: callouts and cards.

use crate::html::escape_html;
use crate::traits::{RenderError, RenderInput, Renderer};

/// `<Callout type="info|warn|error|success" title="...">`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Callout;

impl Renderer for Callout {
    fn name(&self) -> &'static str {
        "callout"
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError> {
        let kind = match input.str_prop("type").unwrap_or("info") {
            "info" | "note" => "info",
            "warn" | "warning" => "warn",
            "error" | "danger" => "error",
            "success" | "tip" => "success",
            other => {
                return Err(RenderError::InvalidProps {
                    component: input.name.to_string(),
                    message: format!("unknown callout type `{}`", other),
                })
            }
        };

        let mut html = format!("<div class=\"callout callout-{}\" role=\"note\">", kind);
        if let Some(title) = input.str_prop("title") {
            html.push_str(&format!(
                "<p class=\"callout-title\">{}</p>",
                escape_html(title)
            ));
        }
        html.push_str(&format!(
            "<div class=\"callout-body\">{}</div></div>\n",
            input.children
        ));
        Ok(html)
    }
}

/// `<Card title="..." href="..." description="...">`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Card;

impl Renderer for Card {
    fn name(&self) -> &'static str {
        "card"
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError> {
        let title = input.required_str_prop("title")?;

        let mut inner = format!("<h3 class=\"card-title\">{}</h3>", escape_html(title));
        if let Some(description) = input.str_prop("description") {
            inner.push_str(&format!(
                "<p class=\"card-description\">{}</p>",
                escape_html(description)
            ));
        }
        if !input.children.trim().is_empty() {
            inner.push_str(&format!("<div class=\"card-body\">{}</div>", input.children));
        }

        Ok(match input.str_prop("href") {
            Some(href) => format!(
                "<a class=\"card\" href=\"{}\">{}</a>\n",
                escape_html(href),
                inner
            ),
            None => format!("<div class=\"card\">{}</div>\n", inner),
        })
    }
}

/// `<Cards>` grid container.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cards;

impl Renderer for Cards {
    fn name(&self) -> &'static str {
        "cards"
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError> {
        Ok(format!("<div class=\"cards\">{}</div>\n", input.children))
    }
}
