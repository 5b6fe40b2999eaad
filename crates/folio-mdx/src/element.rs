//! JSX component elements embedded in MDX.
//!
//! Handles tags like `<APIPage document="./openapi.json" />` or
//! `<Callout type="warn">...</Callout>`: tag boundaries, props and the
//! position of the matching close tag.

use std::collections::BTreeMap;

use crate::body::{fence_marker, read_fence, Node};

/// Props of an element, ordered by name.
pub type Props = BTreeMap<String, PropValue>;

/// A component element with its compiled children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Component name as written (e.g., "APIPage")
    pub name: String,

    /// Props as key-value pairs
    pub props: Props,

    /// Compiled child nodes (empty for self-closing tags)
    pub children: Vec<Node>,

    /// Line number of the opening tag (1-indexed)
    pub line_number: usize,
}

impl Element {
    /// Look up a prop by name.
    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }
}

/// A prop value from JSX.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// String literal: type="warn"
    String(String),
    /// Boolean (presence, or `{true}` / `{false}`): external
    Boolean(bool),
    /// Expression source without the braces: operations={[...]}
    Expression(String),
}

impl PropValue {
    /// Get as string if it's a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the raw expression source if this is an expression.
    pub fn as_expression(&self) -> Option<&str> {
        match self {
            PropValue::Expression(s) => Some(s),
            _ => None,
        }
    }
}

/// An opening tag found at the start of a source slice.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OpenTag<'a> {
    pub name: &'a str,
    pub attrs: &'a str,
    pub self_closing: bool,
    /// Byte length of the tag including `<` and `>`
    pub len: usize,
}

/// Parse a component opening tag at the start of `source`.
///
/// Component names start with an uppercase ASCII letter; lowercase tags are
/// plain HTML and left to the markdown renderer.
pub(crate) fn parse_open_tag(source: &str) -> Option<OpenTag<'_>> {
    let rest = source.strip_prefix('<')?;
    if !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }

    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.'))
        .unwrap_or(rest.len());
    let name = &rest[..name_len];
    let after = &rest[name_len..];

    if !after.starts_with(|c: char| c.is_whitespace() || c == '/' || c == '>') {
        return None;
    }

    let end = find_tag_end(after)?;
    let inner = &after[..end];
    let (attrs, self_closing) = match inner.trim_end().strip_suffix('/') {
        Some(attrs) => (attrs, true),
        None => (inner, false),
    };

    Some(OpenTag {
        name,
        attrs: attrs.trim(),
        self_closing,
        len: 1 + name_len + end + 1,
    })
}

/// Find the `>` that closes a tag, skipping quoted strings and `{...}` expressions.
fn find_tag_end(source: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for (i, c) in source.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                '>' if depth == 0 => return Some(i),
                _ => {}
            },
        }
    }

    None
}

/// Find the `}` matching the `{` at the start of `source`.
fn find_closing_brace(source: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for (i, c) in source.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }

    None
}

/// Find the close tag matching an already consumed opening tag.
///
/// Nested elements with the same name are balanced and tags inside fenced
/// code blocks are ignored. Returns the byte offset of `</name>` within
/// `source`.
pub(crate) fn find_matching_close_tag(source: &str, name: &str) -> Option<usize> {
    let open_pattern = format!("<{}", name);
    let close_tag = format!("</{}>", name);
    let fences = fenced_ranges(source);
    let fence_end = |at: usize| {
        fences
            .iter()
            .find(|(start, end)| (*start..*end).contains(&at))
            .map(|(_, end)| *end)
    };

    let mut depth = 1;
    let mut pos = 0;

    while pos < source.len() {
        let next_open = source[pos..].find(&open_pattern).map(|o| pos + o);
        let next_close = source[pos..].find(&close_tag).map(|c| pos + c);

        let first = match (next_open, next_close) {
            (Some(o), Some(c)) => Some(o.min(c)),
            (_, c) => c,
        };
        if let Some(end) = first.and_then(fence_end) {
            pos = end;
            continue;
        }

        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => match parse_open_tag(&source[o..]) {
                Some(tag) if tag.name == name => {
                    if !tag.self_closing {
                        depth += 1;
                    }
                    pos = o + tag.len;
                }
                _ => pos = o + open_pattern.len(),
            },
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    return Some(c);
                }
                pos = c + close_tag.len();
            }
            (_, None) => return None,
        }
    }

    None
}

/// Byte ranges of the fenced code blocks in `source`, fences included.
fn fenced_ranges(source: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        let line_end = source[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(source.len());
        let line = &source[pos..line_end];
        let trimmed = line.trim_start();

        if line.len() - trimmed.len() < 4 {
            if let Some(fence) = fence_marker(trimmed) {
                let (_, end) = read_fence(source, line_end, fence);
                ranges.push((pos, end));
                pos = end;
                continue;
            }
        }
        pos = line_end;
    }

    ranges
}

/// Parse props from the attribute section of a tag.
pub(crate) fn parse_props(source: &str) -> Props {
    let mut props = Props::new();
    let mut rest = source.trim_start();

    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'))
            .unwrap_or(rest.len());

        if name_len == 0 {
            // Stray character (e.g. a spread); skip it
            let skip = rest.chars().next().map_or(1, char::len_utf8);
            rest = rest[skip..].trim_start();
            continue;
        }

        let name = &rest[..name_len];
        rest = rest[name_len..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after_eq) => {
                let after_eq = after_eq.trim_start();
                let (value, consumed) = parse_value(after_eq);
                rest = &after_eq[consumed..];
                value
            }
            None => PropValue::Boolean(true),
        };

        props.insert(name.to_string(), value);
        rest = rest.trim_start();
    }

    props
}

/// Parse a single prop value, returning it with the number of bytes consumed.
fn parse_value(source: &str) -> (PropValue, usize) {
    match source.chars().next() {
        Some(q @ ('"' | '\'')) => match source[1..].find(q) {
            Some(end) => (PropValue::String(source[1..1 + end].to_string()), end + 2),
            None => (PropValue::String(source[1..].to_string()), source.len()),
        },
        Some('{') => {
            let (inner, consumed) = match find_closing_brace(source) {
                Some(end) => (&source[1..end], end + 1),
                None => (&source[1..], source.len()),
            };
            let value = match inner.trim() {
                "true" => PropValue::Boolean(true),
                "false" => PropValue::Boolean(false),
                expr => PropValue::Expression(expr.to_string()),
            };
            (value, consumed)
        }
        _ => {
            let end = source.find(char::is_whitespace).unwrap_or(source.len());
            (PropValue::String(source[..end].to_string()), end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_self_closing() {
        let tag = parse_open_tag(r#"<APIPage document="./openapi.json" />"#).unwrap();

        assert_eq!(tag.name, "APIPage");
        assert!(tag.self_closing);
        assert_eq!(tag.attrs, r#"document="./openapi.json""#);
    }

    #[test]
    fn parses_open_tag_with_trailing_content() {
        let source = "<Callout type=\"warn\">\nBody\n</Callout>";
        let tag = parse_open_tag(source).unwrap();

        assert_eq!(tag.name, "Callout");
        assert!(!tag.self_closing);
        assert_eq!(&source[..tag.len], "<Callout type=\"warn\">");
    }

    #[test]
    fn ignores_html_and_lookalikes() {
        assert!(parse_open_tag("<div class=\"x\">").is_none());
        assert!(parse_open_tag("<Callout").is_none());
        assert!(parse_open_tag("<Callout-ish>").is_none());
    }

    #[test]
    fn skips_gt_inside_expressions() {
        let tag = parse_open_tag("<Card onClick={() => go()} title=\"a > b\" />").unwrap();

        assert!(tag.self_closing);
        let props = parse_props(tag.attrs);
        assert_eq!(
            props.get("onClick"),
            Some(&PropValue::Expression("() => go()".to_string()))
        );
        assert_eq!(props.get("title"), Some(&PropValue::String("a > b".to_string())));
    }

    #[test]
    fn parses_prop_kinds() {
        let props = parse_props(
            r#"document="./openapi.json" external hidden={false} operations={[{ path: '/files', method: 'post' }]}"#,
        );

        assert_eq!(props.get("document").and_then(PropValue::as_str), Some("./openapi.json"));
        assert_eq!(props.get("external"), Some(&PropValue::Boolean(true)));
        assert_eq!(props.get("hidden"), Some(&PropValue::Boolean(false)));
        assert_eq!(
            props.get("operations").and_then(PropValue::as_expression),
            Some("[{ path: '/files', method: 'post' }]")
        );
    }

    #[test]
    fn finds_matching_close_tag_with_nesting() {
        let source = "a <Cards><Card title=\"x\" /></Cards> <Card>in</Card> b</Card> tail";
        let pos = find_matching_close_tag(source, "Card").unwrap();

        assert_eq!(&source[pos..], "</Card> tail");
    }

    #[test]
    fn skips_close_tags_in_fenced_code() {
        let source = "\n~~~tsx\n<Tabs>\n</Tabs>\n~~~\n</Tabs>\n";
        let pos = find_matching_close_tag(source, "Tabs").unwrap();

        assert_eq!(&source[pos..], "</Tabs>\n");
    }

    #[test]
    fn missing_close_tag_is_none() {
        assert!(find_matching_close_tag("no close here", "Callout").is_none());
    }
}
