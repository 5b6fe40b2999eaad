//! Page rendering: render contexts to complete HTML documents.

use jiff::Timestamp;

use folio_components::{render_body, ComponentRegistry, RenderError};
use folio_docs::{Layout, PageResolver, RenderContext, Slug};

use crate::templates::{Context, NavItem, TemplateEngine, TocEntry};

/// Site-wide values shared by every page.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Site title
    pub title: String,
    /// Base URL path, always ending in `/`
    pub base_url: String,
}

impl SiteConfig {
    pub fn new(title: impl Into<String>, base_url: &str) -> Self {
        Self {
            title: title.into(),
            base_url: normalize_base_url(base_url),
        }
    }
}

/// Errors that can occur rendering a page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),
}

/// Renders resolved pages through a component registry and the site templates.
pub struct PageRenderer {
    site: SiteConfig,
    registry: ComponentRegistry,
    templates: TemplateEngine,
}

impl PageRenderer {
    pub fn new(site: SiteConfig, registry: ComponentRegistry) -> Self {
        Self {
            site,
            registry,
            templates: TemplateEngine::new(),
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// URL path of a page.
    pub fn url_for(&self, slug: &Slug) -> String {
        url_for(&self.site.base_url, slug)
    }

    /// Render the body of a page to HTML.
    pub fn render_content(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        render_body(&ctx.body, &self.registry)
    }

    /// Render a complete page.
    pub fn render_page(&self, ctx: &RenderContext, nav: &[NavItem]) -> Result<String, PageError> {
        let content = self.render_content(ctx)?;

        let context = Context {
            title: ctx.title.clone(),
            description: ctx.description.clone(),
            site_title: self.site.title.clone(),
            content,
            nav: nav.to_vec(),
            current_path: self.url_for(&ctx.slug),
            toc: ctx
                .toc
                .iter()
                .map(|e| TocEntry {
                    title: e.title.clone(),
                    id: e.id.clone(),
                    level: e.level,
                })
                .collect(),
            full_width: ctx.layout == Layout::FullWidth,
            last_updated: ctx.last_updated.map(format_date),
            edit_url: ctx.edit_url.clone(),
            base_url: self.site.base_url.clone(),
        };

        Ok(self.templates.render_page("doc.html", &context)?)
    }

    /// Render the not-found page.
    pub fn render_not_found(&self, nav: &[NavItem]) -> Result<String, PageError> {
        let context = Context {
            title: "Page not found".to_string(),
            description: None,
            site_title: self.site.title.clone(),
            content: String::new(),
            nav: nav.to_vec(),
            current_path: String::new(),
            toc: Vec::new(),
            full_width: true,
            last_updated: None,
            edit_url: None,
            base_url: self.site.base_url.clone(),
        };

        Ok(self.templates.render_page("404.html", &context)?)
    }
}

/// Build the sidebar from page metadata, in route order.
pub fn build_navigation(resolver: &PageResolver, routes: &[Slug], base_url: &str) -> Vec<NavItem> {
    let base_url = normalize_base_url(base_url);

    routes
        .iter()
        .filter_map(|slug| {
            let meta = resolver.metadata(slug).ok()?;
            Some(NavItem {
                title: meta.title,
                path: url_for(&base_url, slug),
                depth: slug.segments().len().saturating_sub(1),
            })
        })
        .collect()
}

/// URL path of a slug under `base_url`: `/docs/` + `guides/uploads` gives
/// `/docs/guides/uploads/`.
pub fn url_for(base_url: &str, slug: &Slug) -> String {
    if slug.is_root() {
        base_url.to_string()
    } else {
        format!("{}{}/", base_url, slug)
    }
}

/// Ensure a base URL starts and ends with `/`.
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Date shown in the "last updated" line.
pub fn format_date(timestamp: Timestamp) -> String {
    timestamp.strftime("%Y-%m-%d").to_string()
}
