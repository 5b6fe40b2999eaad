//! MDX document parser.

use std::collections::HashMap;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::body::{compile_body, Body, Node};
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Compiled body
    pub body: Body,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Markdown extensions enabled for every document.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse an MDX document.
///
/// Extracts frontmatter, compiles the body and generates a table of contents.
/// Heading anchors are unique across the whole document and recorded on the
/// markdown nodes so renderers emit the same ids the TOC links to.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let prefix_len = source.len() - content.len();
    let first_line = source[..prefix_len].matches('\n').count() + 1;

    let mut body = Body {
        nodes: compile_body(content, first_line)?,
    };

    let mut toc = Vec::new();
    let mut slugger = Slugger::default();
    index_headings(&mut body.nodes, &mut slugger, &mut toc);

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        body,
        toc,
    })
}

/// Walk markdown nodes in document order, assigning heading anchors.
fn index_headings(nodes: &mut [Node], slugger: &mut Slugger, toc: &mut Vec<TocEntry>) {
    for node in nodes {
        match node {
            Node::Markdown(md) => {
                md.heading_ids.clear();
                let mut current_heading: Option<(u8, String)> = None;

                for event in Parser::new_ext(&md.source, markdown_options()) {
                    match event {
                        Event::Start(Tag::Heading { level, .. }) => {
                            current_heading = Some((level as u8, String::new()));
                        }
                        Event::Text(text) | Event::Code(text) => {
                            if let Some((_, ref mut heading_text)) = current_heading {
                                heading_text.push_str(&text);
                            }
                        }
                        Event::End(TagEnd::Heading(_)) => {
                            if let Some((level, title)) = current_heading.take() {
                                let id = slugger.slug(&title);
                                md.heading_ids.push(id.clone());
                                toc.push(TocEntry { title, id, level });
                            }
                        }
                        _ => {}
                    }
                }

                for el in &mut md.inline {
                    index_headings(&mut el.children, slugger, toc);
                }
            }
            Node::Element(el) => index_headings(&mut el.children, slugger, toc),
            Node::Code(_) => {}
        }
    }
}

/// Hands out unique slugs, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        slug
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
