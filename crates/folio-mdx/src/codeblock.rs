//! Fenced code block parsing.

/// Programming language of a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Tsx,
    Jsx,
    TypeScript,
    JavaScript,
    Rust,
    Go,
    Python,
    Html,
    Css,
    Json,
    Yaml,
    Toml,
    Http,
    Bash,
    #[default]
    Unknown,
}

impl Language {
    /// Parse language from code fence info string.
    pub fn from_info(info: &str) -> Self {
        let lang = info.split_whitespace().next().unwrap_or("");
        match lang.to_lowercase().as_str() {
            "tsx" => Self::Tsx,
            "jsx" => Self::Jsx,
            "ts" | "typescript" => Self::TypeScript,
            "js" | "javascript" | "mjs" => Self::JavaScript,
            "rs" | "rust" => Self::Rust,
            "go" | "golang" => Self::Go,
            "py" | "python" => Self::Python,
            "html" => Self::Html,
            "css" => Self::Css,
            "json" => Self::Json,
            "yml" | "yaml" => Self::Yaml,
            "toml" => Self::Toml,
            "http" => Self::Http,
            "bash" | "sh" | "shell" | "zsh" | "console" => Self::Bash,
            _ => Self::Unknown,
        }
    }

    /// Canonical token used in `language-*` class names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tsx => "tsx",
            Self::Jsx => "jsx",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Python => "python",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Http => "http",
            Self::Bash => "bash",
            Self::Unknown => "plaintext",
        }
    }
}

/// A fenced code block from MDX.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Unique identifier for this block (format: block-{line_number})
    pub id: String,

    /// Programming language
    pub language: Language,

    /// Source code content, without the fences
    pub source: String,

    /// Line number where the block starts (1-indexed)
    pub line_number: usize,

    /// Optional title from the info string
    pub title: Option<String>,
}

impl CodeBlock {
    /// Create a new code block.
    pub fn new(language: Language, source: String, line_number: usize) -> Self {
        Self {
            id: format!("block-{}", line_number),
            language,
            source,
            line_number,
            title: None,
        }
    }

    /// Build a code block from a fence info string.
    pub fn from_fence(info: &str, source: String, line_number: usize) -> Self {
        let mut block = Self::new(Language::from_info(info), source, line_number);
        block.title = extract_title(info);
        block
    }
}

/// Extract a title from a code fence info string if present.
///
/// Supports formats like:
/// - `ts title="client.ts"`
/// - `ts filename="client.ts"`
/// - `ts file=client.ts`
pub fn extract_title(info: &str) -> Option<String> {
    for key in ["title=\"", "filename=\""] {
        if let Some(start) = info.find(key) {
            let rest = &info[start + key.len()..];
            if let Some(end) = rest.find('"') {
                return Some(rest[..end].to_string());
            }
        }
    }

    if let Some(start) = info.find("file=") {
        let rest = &info[start + 5..];
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let filename = rest[..end].trim_matches('"');
        if !filename.is_empty() {
            return Some(filename.to_string());
        }
    }

    None
}
