//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};
use pulldown_cmark::{Event, Parser, TagEnd};
use rayon::prelude::*;

use folio_docs::{enumerate_routes, PageResolver, RenderContext, ResolveError, Slug};
use folio_mdx::{markdown_options, Body, Node};

use crate::assets::AssetPipeline;
use crate::render::{build_navigation, format_date, PageError, PageRenderer};
use crate::templates::NavItem;

/// Default number of pages resolved at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Characters of page text kept in the search index.
const SEARCH_EXCERPT_LEN: usize = 500;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Public origin used for absolute URLs in the sitemap
    /// (e.g. `https://tusflow.dev`)
    pub site_url: String,

    /// Pages resolved concurrently
    pub concurrency: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            minify: true,
            site_url: String::new(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Pages with a known last-edit timestamp
    pub with_last_edit: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to resolve page: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Failed to render /{slug}: {source}")]
    Render {
        slug: Slug,
        #[source]
        source: PageError,
    },

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    resolver: PageResolver,
    renderer: PageRenderer,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig, resolver: PageResolver, renderer: PageRenderer) -> Self {
        Self {
            config,
            resolver,
            renderer,
        }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let routes = enumerate_routes(self.resolver.source());
        tracing::info!("Resolving {} routes", routes.len());

        let contexts = self.resolve_all(&routes).await?;
        let nav = build_navigation(&self.resolver, &routes, &self.renderer.site().base_url);

        // Render and write pages in parallel
        let results: Vec<Result<(), BuildError>> = contexts
            .par_iter()
            .map(|ctx| self.build_page(ctx, &nav))
            .collect();

        for result in results {
            result?;
        }

        self.generate_not_found(&nav)?;
        self.generate_assets()?;
        self.generate_search_index(&contexts)?;
        self.generate_sitemap(&contexts)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: contexts.len(),
            with_last_edit: contexts.iter().filter(|c| c.last_updated.is_some()).count(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Resolve every route, at most `concurrency` at a time.
    async fn resolve_all(&self, routes: &[Slug]) -> Result<Vec<RenderContext>, BuildError> {
        let resolver = &self.resolver;

        let mut contexts: Vec<RenderContext> = stream::iter(routes)
            .map(|slug| resolver.resolve(slug))
            .buffer_unordered(self.config.concurrency.max(1))
            .try_collect()
            .await?;

        contexts.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(contexts)
    }

    /// Output path for a page: `guides/uploads` -> `dist/guides/uploads/index.html`.
    fn output_path(&self, slug: &Slug) -> PathBuf {
        let mut path = self.config.output_dir.clone();
        for segment in slug.segments() {
            path.push(segment);
        }
        path.join("index.html")
    }

    /// Build a single page.
    fn build_page(&self, ctx: &RenderContext, nav: &[NavItem]) -> Result<(), BuildError> {
        let html = self
            .renderer
            .render_page(ctx, nav)
            .map_err(|e| BuildError::Render {
                slug: ctx.slug.clone(),
                source: e,
            })?;

        let output_path = self.output_path(&ctx.slug);
        write_file(&output_path, &html)?;

        tracing::debug!("Wrote {}", output_path.display());
        Ok(())
    }

    fn generate_not_found(&self, nav: &[NavItem]) -> Result<(), BuildError> {
        let html = self
            .renderer
            .render_not_found(nav)
            .map_err(|e| BuildError::Render {
                slug: Slug::root(),
                source: e,
            })?;

        write_file(&self.config.output_dir.join("404.html"), &html)
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Serving unminified CSS: {}", e);
                css
            })
        } else {
            css
        };
        write_file(&assets_dir.join("main.css"), &css)?;
        write_file(&assets_dir.join("main.js"), &AssetPipeline::generate_js())
    }

    /// Generate search index.
    fn generate_search_index(&self, contexts: &[RenderContext]) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = contexts
            .iter()
            .map(|ctx| {
                serde_json::json!({
                    "title": ctx.title,
                    "description": ctx.description.clone().unwrap_or_default(),
                    "url": self.renderer.url_for(&ctx.slug),
                    "headings": ctx.toc.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
                    "content": plain_text(&ctx.body, SEARCH_EXCERPT_LEN),
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        write_file(&self.config.output_dir.join("search-index.json"), &json)
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, contexts: &[RenderContext]) -> Result<(), BuildError> {
        let site_url = self.config.site_url.trim_end_matches('/');

        let urls: Vec<String> = contexts
            .iter()
            .map(|ctx| {
                let lastmod = ctx
                    .last_updated
                    .map(|ts| format!("\n    <lastmod>{}</lastmod>", format_date(ts)))
                    .unwrap_or_default();
                let loc = format!("{}{}", site_url, self.renderer.url_for(&ctx.slug));
                format!(
                    "  <url>\n    <loc>{}</loc>{}\n  </url>",
                    escape_xml(&loc),
                    lastmod
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );
        write_file(&self.config.output_dir.join("sitemap.xml"), &sitemap)?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}{}sitemap.xml\n",
            site_url,
            self.renderer.site().base_url
        );
        write_file(&self.config.output_dir.join("robots.txt"), &robots)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, content)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

/// Prose of a body as plain text, truncated to `limit` characters.
///
/// Text runs are joined as written; block boundaries become spaces and runs
/// of whitespace collapse to one.
fn plain_text(body: &Body, limit: usize) -> String {
    fn collect(nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Markdown(md) => {
                    for event in Parser::new_ext(&md.source, markdown_options()) {
                        match event {
                            Event::Text(text) | Event::Code(text) => out.push_str(&text),
                            Event::SoftBreak
                            | Event::HardBreak
                            | Event::End(
                                TagEnd::Paragraph
                                | TagEnd::Heading(_)
                                | TagEnd::Item
                                | TagEnd::TableCell,
                            ) => out.push(' '),
                            _ => {}
                        }
                    }
                }
                Node::Element(el) => collect(&el.children, out),
                Node::Code(_) => {}
            }
            out.push(' ');
        }
    }

    let mut text = String::new();
    collect(&body.nodes, &mut text);
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(limit)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Escape text for an XML element body.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SiteConfig;
    use async_trait::async_trait;
    use folio_components::{page_registry, ApiReference, RenderError};
    use folio_docs::{DocsSource, LastEditProvider, NoLastEdit, RepoIdentity};
    use jiff::Timestamp;
    use std::sync::Arc;
    use tempfile::tempdir;

    struct FixedEdit;

    #[async_trait]
    impl LastEditProvider for FixedEdit {
        async fn last_edit(&self, _repo: &RepoIdentity, path: &str) -> Option<Timestamp> {
            (path == "content/docs/getting-started.mdx")
                .then(|| "2024-03-01T00:00:00Z".parse().unwrap())
        }
    }

    fn write_docs(docs: &Path) {
        fs::create_dir_all(docs.join("guides")).unwrap();
        fs::write(docs.join("index.mdx"), "---\ntitle: Home\n---\n# Welcome\n").unwrap();
        fs::write(
            docs.join("getting-started.mdx"),
            "---\ntitle: Getting Started\ndescription: Install the client\n---\n## Install\n\nRun the **installer**.\n\n<Callout type=\"info\">\nNeeds Node 18.\n</Callout>\n",
        )
        .unwrap();
        fs::write(docs.join("guides/uploads.mdx"), "# Uploads\n\nChunked.\n").unwrap();
    }

    fn builder(docs: &Path, out: &Path, provenance: Arc<dyn LastEditProvider>) -> StaticBuilder {
        let source = DocsSource::load(docs).unwrap();
        let resolver = PageResolver::new(Arc::new(source), provenance).with_repo(
            RepoIdentity::new("tusflow", "tusflow", "main"),
            "content/docs",
        );
        let renderer = PageRenderer::new(
            SiteConfig::new("Tusflow Docs", "/docs/"),
            page_registry(ApiReference::new()),
        );
        StaticBuilder::new(
            BuildConfig {
                output_dir: out.to_path_buf(),
                site_url: "https://tusflow.dev".to_string(),
                concurrency: 2,
                ..Default::default()
            },
            resolver,
            renderer,
        )
    }

    #[tokio::test]
    async fn builds_site() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);

        let result = builder(&docs, &out, Arc::new(FixedEdit)).build().await.unwrap();

        assert_eq!(result.pages, 3);
        assert_eq!(result.with_last_edit, 1);
        assert!(out.join("index.html").exists());
        assert!(out.join("guides/uploads/index.html").exists());
        assert!(out.join("404.html").exists());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("assets/main.js").exists());

        let page = fs::read_to_string(out.join("getting-started/index.html")).unwrap();
        assert!(page.contains("<title>Getting Started - Tusflow Docs</title>"));
        assert!(page.contains("Last updated on 2024-03-01"));
        assert!(page.contains("callout-info"));
    }

    #[tokio::test]
    async fn generates_sitemap_with_lastmod() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);

        builder(&docs, &out, Arc::new(FixedEdit)).build().await.unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains(
            "<loc>https://tusflow.dev/docs/getting-started/</loc>\n    <lastmod>2024-03-01</lastmod>"
        ));
        assert!(sitemap.contains("<loc>https://tusflow.dev/docs/guides/uploads/</loc>\n  </url>"));

        let robots = fs::read_to_string(out.join("robots.txt")).unwrap();
        assert!(robots.contains("Sitemap: https://tusflow.dev/docs/sitemap.xml"));
    }

    #[tokio::test]
    async fn generates_search_index() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);

        builder(&docs, &out, Arc::new(NoLastEdit)).build().await.unwrap();

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("search-index.json")).unwrap())
                .unwrap();
        let page = index
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["title"] == "Getting Started")
            .unwrap();
        assert_eq!(page["url"], "/docs/getting-started/");
        assert_eq!(page["description"], "Install the client");
        assert_eq!(page["headings"][0], "Install");
        assert!(page["content"]
            .as_str()
            .unwrap()
            .contains("Install Run the installer. Needs Node 18."));
    }

    #[tokio::test]
    async fn missing_renderer_fails_build() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);
        fs::write(docs.join("steps.mdx"), "---\ntitle: Steps\n---\n<Steps />\n").unwrap();

        let err = builder(&docs, &out, Arc::new(NoLastEdit))
            .build()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::Render {
                source: PageError::Render(RenderError::MissingRenderer { .. }),
                ..
            }
        ));
    }

    #[test]
    fn extracts_plain_text() {
        let doc = folio_mdx::parse_mdx("# Title\n\nSome `code` here.\n\n```sh\nhidden\n```\n")
            .unwrap();

        assert_eq!(plain_text(&doc.body, 100), "Title Some code here.");
        assert_eq!(plain_text(&doc.body, 5), "Title");
    }

    #[test]
    fn plain_text_keeps_punctuation_attached() {
        let doc = folio_mdx::parse_mdx(
            "Uploads **resume** after `PATCH`, then _finish_.\nNext line (see [docs](/x)).\n",
        )
        .unwrap();

        assert_eq!(
            plain_text(&doc.body, 200),
            "Uploads resume after PATCH, then finish. Next line (see docs)."
        );
    }

    #[test]
    fn escapes_xml_text() {
        assert_eq!(escape_xml("https://a.dev/?x=1&y=<2>"), "https://a.dev/?x=1&amp;y=&lt;2&gt;");
    }

    #[tokio::test]
    async fn sitemap_escapes_site_url() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);

        let mut site = builder(&docs, &out, Arc::new(NoLastEdit));
        site.config.site_url = "https://tusflow.dev/r&d".to_string();
        site.build().await.unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://tusflow.dev/r&amp;d/docs/getting-started/</loc>"));
        assert!(!sitemap.contains("r&d"));
    }
}
