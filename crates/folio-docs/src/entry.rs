//! Content entries held by a content source.

use std::path::PathBuf;
use std::sync::Arc;

use folio_mdx::{Body, ParsedDoc, TocEntry};

use crate::slug::Slug;

/// Page layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// Content with a table of contents column
    #[default]
    Standard,
    /// Content spanning the full width, no table of contents
    FullWidth,
}

/// A single resolvable documentation page.
#[derive(Debug, Clone)]
pub struct ContentEntry {
    pub slug: Slug,
    pub title: String,
    pub description: Option<String>,
    pub toc: Vec<TocEntry>,
    pub layout: Layout,

    /// Compiled body, shared with every render context built from this entry
    pub body: Arc<Body>,

    /// Path of the source file relative to the docs root
    pub source_path: PathBuf,
}

impl ContentEntry {
    /// Build an entry from a parsed document.
    ///
    /// Without a front matter title, the first heading is used, then the
    /// last slug segment.
    pub fn from_parsed(slug: Slug, source_path: PathBuf, doc: ParsedDoc) -> Self {
        let frontmatter = doc.frontmatter.unwrap_or_default();

        let title = if !frontmatter.title.is_empty() {
            frontmatter.title
        } else if let Some(first) = doc.toc.first() {
            first.title.clone()
        } else {
            slug.segments()
                .last()
                .cloned()
                .unwrap_or_else(|| "Documentation".to_string())
        };

        Self {
            slug,
            title,
            description: frontmatter.description,
            toc: doc.toc,
            layout: if frontmatter.full {
                Layout::FullWidth
            } else {
                Layout::Standard
            },
            body: Arc::new(doc.body),
            source_path,
        }
    }
}
