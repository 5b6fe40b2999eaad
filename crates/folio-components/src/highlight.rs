//! Server-side syntax highlighting for code blocks.
//!
//! Tokens become `<span>`s carrying `hl-*` scope classes; [`highlight_css`]
//! produces the stylesheet that colours them.

use std::sync::LazyLock;

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Theme the stylesheet is generated from.
pub const HIGHLIGHT_THEME: &str = "InspiredGitHub";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Grammar for a `language-*` token. The bundled grammars have no TypeScript,
/// so TS and JSX flavours use the JavaScript one.
fn syntax_for(lang: &str) -> Option<&'static SyntaxReference> {
    let token = match lang {
        "typescript" | "tsx" | "jsx" => "js",
        "bash" => "sh",
        "plaintext" | "" => return None,
        other => other,
    };
    SYNTAXES.find_syntax_by_token(token)
}

/// Highlight `source` as `lang`.
///
/// Returns `None` when no grammar matches; callers fall back to escaped text.
pub fn highlight(source: &str, lang: &str) -> Option<String> {
    let syntax = syntax_for(lang)?;
    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, CLASS_STYLE);

    for line in LinesWithEndings::from(source) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::warn!("Failed to highlight {} code: {}", lang, e);
            return None;
        }
    }

    Some(generator.finalize())
}

/// Stylesheet for the classes emitted by [`highlight`].
pub fn highlight_css() -> Result<String, syntect::Error> {
    let themes = ThemeSet::load_defaults();
    let Some(theme) = themes.themes.get(HIGHLIGHT_THEME) else {
        tracing::warn!("Highlight theme {} not bundled", HIGHLIGHT_THEME);
        return Ok(String::new());
    };
    css_for_theme_with_class_style(theme, CLASS_STYLE)
}
