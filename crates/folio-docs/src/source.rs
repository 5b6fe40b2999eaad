//! Content sources: the compiled documentation tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use folio_mdx::parse_mdx;

use crate::entry::ContentEntry;
use crate::slug::{Slug, SlugError};

/// Read access to compiled documentation entries.
pub trait ContentSource: Send + Sync {
    /// Look up the entry for a slug.
    fn get_page(&self, slug: &Slug) -> Option<&ContentEntry>;

    /// Every slug with an entry.
    fn slugs(&self) -> Vec<Slug>;
}

/// Errors that can occur loading a docs tree.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Docs directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid page path {path}: {source}")]
    InvalidSlug {
        path: PathBuf,
        #[source]
        source: SlugError,
    },

    #[error("Pages {first} and {second} both map to '/{slug}'")]
    DuplicateSlug {
        slug: Slug,
        first: PathBuf,
        second: PathBuf,
    },
}

/// In-memory content source loaded from a directory of MDX files.
#[derive(Debug, Default)]
pub struct DocsSource {
    entries: BTreeMap<Slug, ContentEntry>,
}

impl DocsSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, rejecting a second entry for the same slug.
    pub fn insert(&mut self, entry: ContentEntry) -> Result<(), SourceError> {
        if let Some(existing) = self.entries.get(&entry.slug) {
            return Err(SourceError::DuplicateSlug {
                slug: entry.slug.clone(),
                first: existing.source_path.clone(),
                second: entry.source_path,
            });
        }
        self.entries.insert(entry.slug.clone(), entry);
        Ok(())
    }

    /// Load every `.mdx` and `.md` file under `dir`.
    ///
    /// `guides/uploads.mdx` becomes `guides/uploads`; `guides/index.mdx`
    /// becomes `guides`.
    pub fn load(dir: &Path) -> Result<Self, SourceError> {
        if !dir.is_dir() {
            return Err(SourceError::NotFound(dir.to_path_buf()));
        }

        let mut source = Self::new();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "mdx" && ext != "md" {
                continue;
            }

            let relative = path.strip_prefix(dir).unwrap_or(path).to_path_buf();
            let slug = slug_for(&relative).map_err(|e| SourceError::InvalidSlug {
                path: relative.clone(),
                source: e,
            })?;

            let content = fs::read_to_string(path).map_err(|e| SourceError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;

            let doc = parse_mdx(&content).map_err(|e| SourceError::Parse {
                path: relative.clone(),
                message: e.to_string(),
            })?;

            tracing::debug!("Loaded {} as /{}", relative.display(), slug);
            source.insert(ContentEntry::from_parsed(slug, relative, doc))?;
        }

        tracing::info!("Loaded {} pages from {}", source.len(), dir.display());
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in slug order.
    pub fn entries(&self) -> impl Iterator<Item = &ContentEntry> {
        self.entries.values()
    }
}

impl ContentSource for DocsSource {
    fn get_page(&self, slug: &Slug) -> Option<&ContentEntry> {
        self.entries.get(slug)
    }

    fn slugs(&self) -> Vec<Slug> {
        self.entries.keys().cloned().collect()
    }
}

/// Map a path relative to the docs root to its slug.
fn slug_for(relative: &Path) -> Result<Slug, SlugError> {
    let mut segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem != "index" {
        segments.push(stem);
    }

    Slug::new(segments)
}
