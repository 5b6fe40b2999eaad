//! Code block renderers.

use crate::highlight::highlight;
use crate::html::escape_html;
use crate::traits::{RenderError, RenderInput, Renderer};

/// Bare `<pre><code>` output, used by the default registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodeBlock;

impl Renderer for PlainCodeBlock {
    fn name(&self) -> &'static str {
        "plain-code-block"
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError> {
        let lang = input.str_prop("lang").unwrap_or("plaintext");
        Ok(format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(lang),
            escape_html(input.children)
        ))
    }
}

/// Code block wrapped in a figure with title bar and copy button.
///
/// Source is highlighted at render time; languages without a grammar are
/// emitted as escaped text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightedCodeBlock;

impl Renderer for HighlightedCodeBlock {
    fn name(&self) -> &'static str {
        "highlighted-code-block"
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError> {
        let raw_lang = input.str_prop("lang").unwrap_or("plaintext");
        let lang = escape_html(raw_lang);
        let code = highlight(input.children, raw_lang)
            .unwrap_or_else(|| escape_html(input.children));

        let mut html = format!("<figure class=\"code-block\" data-language=\"{}\">", lang);
        if let Some(title) = input.str_prop("title") {
            html.push_str(&format!(
                "<figcaption class=\"code-block-title\">{}</figcaption>",
                escape_html(title)
            ));
        }
        html.push_str(&format!(
            "<pre class=\"language-{lang}\"><code class=\"language-{lang}\">{}</code></pre>",
            code
        ));
        html.push_str(
            "<button type=\"button\" class=\"copy-btn\" aria-label=\"Copy code\">Copy</button>",
        );
        html.push_str("</figure>\n");

        Ok(html)
    }
}
