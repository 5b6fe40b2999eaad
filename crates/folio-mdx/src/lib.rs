//! MDX compiler for folio documentation.
//!
//! Splits an MDX source into YAML front matter, a table of contents and a
//! compiled [`Body`]: a tree of markdown segments, fenced code blocks and
//! component elements that a renderer walks later.

pub mod body;
pub mod codeblock;
pub mod element;
pub mod frontmatter;
pub mod parser;

pub use body::{inline_marker, Body, Markdown, Node};
pub use codeblock::{CodeBlock, Language};
pub use element::{Element, PropValue, Props};
pub use frontmatter::Frontmatter;
pub use parser::{markdown_options, parse_mdx, slugify, ParseError, ParsedDoc, TocEntry};
