//! Compiled MDX body.
//!
//! The body is the renderable part of a page: markdown prose interleaved with
//! fenced code blocks and component elements. It is produced once at load
//! time and never mutated afterwards.
//!
//! Components written inside a line of prose (`Install <Badge text="beta" />`)
//! are compiled too. The markdown keeps an [`inline_marker`] in their place
//! and the element itself is stored on the [`Markdown`] segment.

use crate::codeblock::CodeBlock;
use crate::element::{find_matching_close_tag, parse_open_tag, parse_props, Element};
use crate::parser::ParseError;

/// A compiled document body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    /// Top-level nodes in document order
    pub nodes: Vec<Node>,
}

/// A node of the compiled body.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Plain markdown prose
    Markdown(Markdown),
    /// Fenced code block
    Code(CodeBlock),
    /// Component element with compiled children
    Element(Element),
}

/// A markdown segment with the anchor ids assigned to its headings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markdown {
    /// Markdown source
    pub source: String,

    /// Anchor ids of the headings in this segment, in order
    pub heading_ids: Vec<String>,

    /// Components used inline; `source` holds the marker for each, in order
    pub inline: Vec<Element>,
}

/// Placeholder left in markdown source for the inline element at `index`.
///
/// It is an HTML comment, so markdown renderers pass it through untouched.
pub fn inline_marker(index: usize) -> String {
    format!("<!--folio:inline:{}-->", index)
}

impl Body {
    /// Number of nodes, counting element children recursively.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Element(el) => 1 + count(&el.children),
                    Node::Markdown(md) => {
                        1 + md.inline.iter().map(|el| 1 + count(&el.children)).sum::<usize>()
                    }
                    Node::Code(_) => 1,
                })
                .sum()
        }
        count(&self.nodes)
    }
}

/// Compile MDX content (without frontmatter) into body nodes.
///
/// `first_line` is the 1-indexed line number of the first line of `content`
/// in the original file.
pub(crate) fn compile_body(content: &str, first_line: usize) -> Result<Vec<Node>, ParseError> {
    let mut nodes = Vec::new();
    let mut prose = String::new();
    let mut inline = Vec::new();
    let mut pos = 0;

    while pos < content.len() {
        let line_end = content[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(content.len());
        let line = &content[pos..line_end];
        let indent = line.len() - line.trim_start().len();
        let trimmed = line.trim_start();
        let line_number = first_line + content[..pos].matches('\n').count();

        if let Some(fence) = fence_marker(trimmed) {
            flush_prose(&mut prose, &mut inline, &mut nodes);

            let info = trimmed[fence.len()..].trim();
            let (source, next) = read_fence(content, line_end, fence);
            nodes.push(Node::Code(CodeBlock::from_fence(info, source, line_number)));
            pos = next;
            continue;
        }

        if indent < 4 {
            if let Some(tag) = parse_open_tag(&content[pos + indent..]) {
                flush_prose(&mut prose, &mut inline, &mut nodes);

                let tag_start = pos + indent;
                let after_open = tag_start + tag.len;
                let props = parse_props(tag.attrs);

                let (children, after_element) = if tag.self_closing {
                    (Vec::new(), after_open)
                } else {
                    let close = find_matching_close_tag(&content[after_open..], tag.name)
                        .ok_or_else(|| ParseError::Parse {
                            line: line_number,
                            message: format!("missing closing tag </{}>", tag.name),
                        })?;
                    let inner = &content[after_open..after_open + close];
                    let leading = inner.len() - inner.trim_start_matches('\n').len();
                    let inner_line = line_number
                        + content[tag_start..after_open].matches('\n').count()
                        + leading;
                    let children = compile_body(inner.trim_matches('\n'), inner_line)?;
                    (children, after_open + close + tag.name.len() + 3)
                };

                nodes.push(Node::Element(Element {
                    name: tag.name.to_string(),
                    props,
                    children,
                    line_number,
                }));

                // Keep whatever follows the element on its last line
                let rest_end = content[after_element..]
                    .find('\n')
                    .map(|i| after_element + i + 1)
                    .unwrap_or(content.len());
                let trailing = &content[after_element..rest_end];
                if !trailing.trim().is_empty() {
                    let trailing_line = first_line + content[..after_element].matches('\n').count();
                    prose.push_str(&extract_inline(trailing, trailing_line, &mut inline)?);
                }
                pos = rest_end;
                continue;
            }

            if trimmed.starts_with('<') && trimmed[1..].starts_with(|c: char| c.is_ascii_uppercase()) {
                return Err(ParseError::Parse {
                    line: line_number,
                    message: format!("unterminated component tag: {}", trimmed.trim_end()),
                });
            }

            prose.push_str(&extract_inline(line, line_number, &mut inline)?);
        } else {
            prose.push_str(line);
        }

        pos = line_end;
    }

    flush_prose(&mut prose, &mut inline, &mut nodes);
    Ok(nodes)
}

/// Compile component tags inside a line of prose, replacing each with its marker.
///
/// Tags inside code spans, escaped `\<`, and `<` directly after a word
/// character (`Vec<String>`) are left as text. A paired tag must close on the
/// same line.
fn extract_inline(
    line: &str,
    line_number: usize,
    inline: &mut Vec<Element>,
) -> Result<String, ParseError> {
    let mut out = String::with_capacity(line.len());
    let mut prev: Option<char> = None;
    let mut pos = 0;

    while let Some(c) = line[pos..].chars().next() {
        let rest = &line[pos..];

        if c == '\\' {
            let len = 1 + rest[1..].chars().next().map_or(0, char::len_utf8);
            out.push_str(&rest[..len]);
            pos += len;
            prev = Some(c);
            continue;
        }

        if c == '`' {
            let run = rest.len() - rest.trim_start_matches('`').len();
            let end = code_span_end(&rest[run..], run).map_or(run, |end| run + end);
            out.push_str(&rest[..end]);
            pos += end;
            prev = Some(c);
            continue;
        }

        if c == '<' && !prev.is_some_and(char::is_alphanumeric) {
            if let Some(tag) = parse_open_tag(rest) {
                let (children, consumed) = if tag.self_closing {
                    (Vec::new(), tag.len)
                } else {
                    let after = &rest[tag.len..];
                    let close = find_matching_close_tag(after, tag.name).ok_or_else(|| {
                        ParseError::Parse {
                            line: line_number,
                            message: format!("missing closing tag </{}>", tag.name),
                        }
                    })?;
                    let children = compile_body(after[..close].trim(), line_number)?;
                    (children, tag.len + close + tag.name.len() + 3)
                };

                out.push_str(&inline_marker(inline.len()));
                inline.push(Element {
                    name: tag.name.to_string(),
                    props: parse_props(tag.attrs),
                    children,
                    line_number,
                });
                pos += consumed;
                prev = Some('>');
                continue;
            }
        }

        out.push(c);
        pos += c.len_utf8();
        prev = Some(c);
    }

    Ok(out)
}

/// Offset just past the backtick run of length `run` that closes a code span.
fn code_span_end(source: &str, run: usize) -> Option<usize> {
    let mut pos = 0;
    while let Some(i) = source[pos..].find('`') {
        let start = pos + i;
        let len = source[start..].len() - source[start..].trim_start_matches('`').len();
        if len == run {
            return Some(start + len);
        }
        pos = start + len;
    }
    None
}

/// Return the fence marker (``` or ~~~, possibly longer) opening a code block.
pub(crate) fn fence_marker(line: &str) -> Option<&str> {
    for ch in ['`', '~'] {
        let len = line.chars().take_while(|c| *c == ch).count();
        if len >= 3 {
            return Some(&line[..len]);
        }
    }
    None
}

/// Read a fenced block body starting at `start`, returning it and the offset after the closing fence.
///
/// An unclosed fence runs to the end of the content, as in CommonMark.
pub(crate) fn read_fence(content: &str, start: usize, fence: &str) -> (String, usize) {
    let fence_char = fence.chars().next().unwrap_or('`');
    let mut pos = start;
    let mut source = String::new();

    while pos < content.len() {
        let line_end = content[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(content.len());
        let line = &content[pos..line_end];
        let trimmed = line.trim();

        let closing = trimmed.len() >= fence.len() && trimmed.chars().all(|c| c == fence_char);
        if closing {
            return (source.trim_end_matches('\n').to_string(), line_end);
        }

        source.push_str(line);
        pos = line_end;
    }

    (source.trim_end_matches('\n').to_string(), content.len())
}

/// Move accumulated prose into a markdown node, dropping blank-only text.
fn flush_prose(prose: &mut String, inline: &mut Vec<Element>, nodes: &mut Vec<Node>) {
    if !prose.trim().is_empty() {
        nodes.push(Node::Markdown(Markdown {
            source: std::mem::take(prose),
            heading_ids: Vec::new(),
            inline: std::mem::take(inline),
        }));
    }
    prose.clear();
    inline.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeblock::Language;
    use crate::element::PropValue;

    fn markdown(node: &Node) -> &str {
        match node {
            Node::Markdown(md) => &md.source,
            other => panic!("expected markdown, got {other:?}"),
        }
    }

    #[test]
    fn splits_prose_code_and_elements() {
        let content = "# Upload\n\nIntro text.\n\n```ts title=\"upload.ts\"\nconst a = 1;\n```\n\n<APIPage document=\"./openapi.json\" />\n\nOutro.\n";

        let nodes = compile_body(content, 1).unwrap();

        assert_eq!(nodes.len(), 4);
        assert!(markdown(&nodes[0]).contains("Intro text."));

        let Node::Code(block) = &nodes[1] else {
            panic!("expected code block");
        };
        assert_eq!(block.language, Language::TypeScript);
        assert_eq!(block.title.as_deref(), Some("upload.ts"));
        assert_eq!(block.source, "const a = 1;");
        assert_eq!(block.line_number, 5);

        let Node::Element(el) = &nodes[2] else {
            panic!("expected element");
        };
        assert_eq!(el.name, "APIPage");
        assert_eq!(el.line_number, 9);
        assert!(el.children.is_empty());

        assert!(markdown(&nodes[3]).contains("Outro."));
    }

    #[test]
    fn compiles_children_recursively() {
        let content = "<Callout type=\"warn\">\nUploads **expire** after a day.\n\n```bash\ncurl -X POST\n```\n</Callout>\n";

        let nodes = compile_body(content, 1).unwrap();

        assert_eq!(nodes.len(), 1);
        let Node::Element(el) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(el.prop("type"), Some(&PropValue::String("warn".to_string())));
        assert_eq!(el.children.len(), 2);
        assert!(markdown(&el.children[0]).contains("**expire**"));
        assert!(matches!(&el.children[1], Node::Code(b) if b.line_number == 4));
    }

    #[test]
    fn ignores_tags_inside_code_fences() {
        let content = "```tsx\n<Callout>not a component\n```\n";

        let nodes = compile_body(content, 1).unwrap();

        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], Node::Code(b) if b.source.contains("<Callout>")));
    }

    #[test]
    fn keeps_lowercase_html_in_prose() {
        let nodes = compile_body("<div align=\"center\">hi</div>\n", 1).unwrap();

        assert_eq!(nodes.len(), 1);
        assert!(markdown(&nodes[0]).contains("<div"));
    }

    #[test]
    fn errors_on_missing_close_tag() {
        let result = compile_body("text\n\n<Callout>\nnever closed\n", 1);

        assert!(matches!(result, Err(ParseError::Parse { line: 3, .. })));
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let nodes = compile_body("```js\nlet x;\n", 1).unwrap();

        assert!(matches!(&nodes[0], Node::Code(b) if b.source == "let x;"));
    }

    #[test]
    fn compiles_inline_components() {
        let content = "Install with <Badge text=\"beta\" /> today.\n";

        let nodes = compile_body(content, 3).unwrap();

        assert_eq!(nodes.len(), 1);
        let Node::Markdown(md) = &nodes[0] else {
            panic!("expected markdown");
        };
        assert_eq!(md.source, "Install with <!--folio:inline:0--> today.\n");
        assert_eq!(md.inline.len(), 1);
        assert_eq!(md.inline[0].name, "Badge");
        assert_eq!(md.inline[0].line_number, 3);
        assert_eq!(md.inline[0].prop("text").and_then(PropValue::as_str), Some("beta"));
    }

    #[test]
    fn compiles_paired_inline_components() {
        let nodes = compile_body("Status: <Badge>stable</Badge> and <Icon name=\"ok\" />.\n", 1).unwrap();

        let Node::Markdown(md) = &nodes[0] else {
            panic!("expected markdown");
        };
        assert_eq!(
            md.source,
            "Status: <!--folio:inline:0--> and <!--folio:inline:1-->.\n"
        );
        assert_eq!(md.inline[0].children.len(), 1);
        assert!(markdown(&md.inline[0].children[0]).contains("stable"));
        assert_eq!(md.inline[1].name, "Icon");
    }

    #[test]
    fn leaves_code_spans_and_generics_alone() {
        let content = "Write `<Badge />` or ``a <Card /> b``, returns Vec<String> \\<Note />.\n";

        let nodes = compile_body(content, 1).unwrap();

        let Node::Markdown(md) = &nodes[0] else {
            panic!("expected markdown");
        };
        assert!(md.inline.is_empty());
        assert_eq!(md.source, content);
    }

    #[test]
    fn keeps_inline_components_after_block_element() {
        let nodes = compile_body("<Card title=\"A\" /> see <Badge />\n", 1).unwrap();

        assert_eq!(nodes.len(), 2);
        let Node::Markdown(md) = &nodes[1] else {
            panic!("expected markdown");
        };
        assert_eq!(md.inline[0].name, "Badge");
    }

    #[test]
    fn errors_on_unclosed_inline_component() {
        let result = compile_body("intro\n\nUse <Badge>beta here.\n", 1);

        assert!(matches!(result, Err(ParseError::Parse { line: 3, .. })));
    }

    #[test]
    fn close_tag_inside_child_fence_does_not_end_element() {
        let content = "<Callout>\n```mdx\n</Callout>\n```\nAfter the fence.\n</Callout>\n";

        let nodes = compile_body(content, 1).unwrap();

        assert_eq!(nodes.len(), 1);
        let Node::Element(el) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(el.children.len(), 2);
        assert!(matches!(&el.children[0], Node::Code(b) if b.source == "</Callout>"));
        assert!(markdown(&el.children[1]).contains("After the fence."));
    }

    #[test]
    fn counts_nested_nodes() {
        let nodes = compile_body("<Cards>\n<Card title=\"A\" />\n<Card title=\"B\" />\n</Cards>\n", 1).unwrap();
        let body = Body { nodes };

        assert_eq!(body.node_count(), 3);
    }
}
