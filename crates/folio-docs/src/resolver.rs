//! Page resolution: slug to render context.

use std::path::{Component, Path};
use std::sync::Arc;

use jiff::Timestamp;

use folio_mdx::{Body, TocEntry};

use crate::entry::{ContentEntry, Layout};
use crate::provenance::{LastEditProvider, RepoIdentity};
use crate::slug::Slug;
use crate::source::ContentSource;

/// Errors that can occur resolving a page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("No page at '/{0}'")]
    NotFound(Slug),
}

/// Everything needed to display one page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub slug: Slug,
    pub title: String,
    pub description: Option<String>,
    pub toc: Vec<TocEntry>,
    pub layout: Layout,
    pub body: Arc<Body>,
    pub source_path: String,
    pub last_updated: Option<Timestamp>,
    pub edit_url: Option<String>,
}

/// Title and description for document metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: Option<String>,
}

/// Resolves slugs against a content source, attaching provenance.
#[derive(Clone)]
pub struct PageResolver {
    source: Arc<dyn ContentSource>,
    provenance: Arc<dyn LastEditProvider>,
    repo: Option<RepoIdentity>,
    path_prefix: String,
}

impl std::fmt::Debug for PageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageResolver")
            .field("repo", &self.repo)
            .field("path_prefix", &self.path_prefix)
            .finish_non_exhaustive()
    }
}

impl PageResolver {
    /// Create a resolver with no repository; pages get neither a last-edit
    /// timestamp nor an edit link.
    pub fn new(source: Arc<dyn ContentSource>, provenance: Arc<dyn LastEditProvider>) -> Self {
        Self {
            source,
            provenance,
            repo: None,
            path_prefix: String::new(),
        }
    }

    /// Set the repository the docs live in.
    ///
    /// `path_prefix` is the docs root within the repository, e.g.
    /// `content/docs`.
    pub fn with_repo(mut self, repo: RepoIdentity, path_prefix: impl Into<String>) -> Self {
        self.repo = Some(repo);
        self.path_prefix = path_prefix.into().trim_matches('/').to_string();
        self
    }

    pub fn source(&self) -> &dyn ContentSource {
        self.source.as_ref()
    }

    /// Resolve a slug to a render context.
    ///
    /// The only failure is [`ResolveError::NotFound`]; provenance problems
    /// leave `last_updated` empty.
    pub async fn resolve(&self, slug: &Slug) -> Result<RenderContext, ResolveError> {
        let entry = self.lookup(slug)?;
        let source_path = self.repo_path(&entry.source_path);

        let (last_updated, edit_url) = match &self.repo {
            Some(repo) => (
                self.provenance.last_edit(repo, &source_path).await,
                Some(repo.blob_url(&source_path)),
            ),
            None => (None, None),
        };

        tracing::debug!(
            slug = %slug,
            last_updated = ?last_updated,
            "Resolved page"
        );

        Ok(RenderContext {
            slug: entry.slug.clone(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            toc: entry.toc.clone(),
            layout: entry.layout,
            body: Arc::clone(&entry.body),
            source_path,
            last_updated,
            edit_url,
        })
    }

    /// Title and description of a page, without any provenance lookup.
    pub fn metadata(&self, slug: &Slug) -> Result<PageMetadata, ResolveError> {
        let entry = self.lookup(slug)?;
        Ok(PageMetadata {
            title: entry.title.clone(),
            description: entry.description.clone(),
        })
    }

    fn lookup(&self, slug: &Slug) -> Result<&ContentEntry, ResolveError> {
        self.source
            .get_page(slug)
            .ok_or_else(|| ResolveError::NotFound(slug.clone()))
    }

    /// Path of a source file within the repository, `/`-separated.
    fn repo_path(&self, source_path: &Path) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.path_prefix.is_empty() {
            parts.push(self.path_prefix.clone());
        }
        parts.extend(source_path.components().filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        }));
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provenance::NoLastEdit;
    use crate::routes::enumerate_routes;
    use crate::source::DocsSource;
    use async_trait::async_trait;
    use folio_mdx::parse_mdx;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::time::Duration;

    /// Answers a fixed timestamp for one file.
    struct KnownEdit {
        path: &'static str,
        at: Timestamp,
    }

    #[async_trait]
    impl LastEditProvider for KnownEdit {
        async fn last_edit(&self, _repo: &RepoIdentity, path: &str) -> Option<Timestamp> {
            (path == self.path).then_some(self.at)
        }
    }

    /// Never answers in time.
    struct Stalled;

    #[async_trait]
    impl LastEditProvider for Stalled {
        async fn last_edit(&self, _repo: &RepoIdentity, _path: &str) -> Option<Timestamp> {
            let never = std::future::pending::<Option<Timestamp>>();
            tokio::time::timeout(Duration::from_millis(20), never)
                .await
                .ok()
                .flatten()
        }
    }

    fn entry(segments: &[&str], file: &str, source: &str) -> ContentEntry {
        ContentEntry::from_parsed(
            Slug::new(segments.iter().copied()).unwrap(),
            PathBuf::from(file),
            parse_mdx(source).unwrap(),
        )
    }

    fn docs() -> Arc<DocsSource> {
        let mut source = DocsSource::new();
        source
            .insert(entry(&[], "index.mdx", "---\ntitle: Tusflow Docs\n---\n# Welcome\n"))
            .unwrap();
        source
            .insert(entry(
                &["getting-started"],
                "getting-started.mdx",
                "---\ntitle: Getting Started\ndescription: Install the client\n---\n## Install\n",
            ))
            .unwrap();
        source
            .insert(entry(&["guides", "uploads"], "guides/uploads.mdx", "# Uploads\n"))
            .unwrap();
        Arc::new(source)
    }

    fn resolver(provenance: Arc<dyn LastEditProvider>) -> PageResolver {
        PageResolver::new(docs(), provenance).with_repo(
            RepoIdentity::new("tusflow", "tusflow", "main"),
            "content/docs/",
        )
    }

    fn known_edit() -> Arc<dyn LastEditProvider> {
        Arc::new(KnownEdit {
            path: "content/docs/getting-started.mdx",
            at: "2024-03-01T00:00:00Z".parse().unwrap(),
        })
    }

    #[tokio::test]
    async fn resolves_page_with_last_edit() {
        let resolver = resolver(known_edit());

        let ctx = resolver
            .resolve(&Slug::new(["getting-started"]).unwrap())
            .await
            .unwrap();

        assert_eq!(ctx.title, "Getting Started");
        assert_eq!(ctx.description.as_deref(), Some("Install the client"));
        assert_eq!(
            ctx.last_updated,
            Some("2024-03-01T00:00:00Z".parse::<Timestamp>().unwrap())
        );
        assert_eq!(ctx.source_path, "content/docs/getting-started.mdx");
        assert_eq!(
            ctx.edit_url.as_deref(),
            Some("https://github.com/tusflow/tusflow/blob/main/content/docs/getting-started.mdx")
        );
        assert_eq!(ctx.toc[0].id, "install");
    }

    #[tokio::test]
    async fn unknown_page_is_not_found() {
        let resolver = resolver(known_edit());
        let slug = Slug::new(["nonexistent"]).unwrap();

        assert_eq!(
            resolver.resolve(&slug).await,
            Err(ResolveError::NotFound(slug.clone()))
        );
        assert_eq!(
            resolver.metadata(&slug),
            Err(ResolveError::NotFound(slug))
        );
    }

    #[tokio::test]
    async fn provenance_timeout_leaves_last_updated_empty() {
        let resolver = resolver(Arc::new(Stalled));

        let ctx = resolver
            .resolve(&Slug::new(["getting-started"]).unwrap())
            .await
            .unwrap();

        assert_eq!(ctx.title, "Getting Started");
        assert_eq!(ctx.last_updated, None);
        assert!(ctx.edit_url.is_some());
    }

    #[tokio::test]
    async fn empty_slug_resolves_root_index() {
        let resolver = resolver(Arc::new(NoLastEdit));

        let ctx = resolver.resolve(&Slug::root()).await.unwrap();

        assert_eq!(ctx.title, "Tusflow Docs");
        assert_eq!(ctx.source_path, "content/docs/index.mdx");
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let resolver = resolver(known_edit());
        let slug = Slug::new(["getting-started"]).unwrap();

        let first = resolver.resolve(&slug).await.unwrap();
        let second = resolver.resolve(&slug).await.unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first.body, &second.body));
    }

    #[tokio::test]
    async fn every_enumerated_route_resolves() {
        let resolver = resolver(Arc::new(NoLastEdit));

        for slug in enumerate_routes(resolver.source()) {
            assert!(resolver.resolve(&slug).await.is_ok(), "/{} did not resolve", slug);
        }
    }

    #[tokio::test]
    async fn without_repo_has_no_provenance() {
        let resolver = PageResolver::new(docs(), known_edit());

        let ctx = resolver
            .resolve(&Slug::new(["guides", "uploads"]).unwrap())
            .await
            .unwrap();

        assert_eq!(ctx.last_updated, None);
        assert_eq!(ctx.edit_url, None);
        assert_eq!(ctx.source_path, "guides/uploads.mdx");
    }

    #[test]
    fn metadata_skips_provenance() {
        let resolver = resolver(Arc::new(Stalled));

        let meta = resolver
            .metadata(&Slug::new(["getting-started"]).unwrap())
            .unwrap();

        assert_eq!(
            meta,
            PageMetadata {
                title: "Getting Started".to_string(),
                description: Some("Install the client".to_string()),
            }
        );
    }
}
