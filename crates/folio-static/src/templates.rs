//! Template engine for rendering documentation pages.

use minijinja::{context, Environment};

/// A sidebar navigation item.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
    /// Nesting depth (0 for top-level pages)
    pub depth: usize,
}

/// A table of contents entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Context for rendering a page template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Page description for `<meta>` and the page header
    pub description: Option<String>,
    /// Site title
    pub site_title: String,
    /// Rendered content HTML
    pub content: String,
    /// Navigation items
    pub nav: Vec<NavItem>,
    /// URL path of this page, for marking the active nav item
    pub current_path: String,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Drop the table of contents column
    pub full_width: bool,
    /// Formatted last-edit date
    pub last_updated: Option<String>,
    /// Link to the page source
    pub edit_url: Option<String>,
    /// Base URL
    pub base_url: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("base.html", BASE_TEMPLATE)
            .expect("Failed to add base template");
        env.add_template("doc.html", DOC_TEMPLATE)
            .expect("Failed to add doc template");
        env.add_template("nav.html", NAV_TEMPLATE)
            .expect("Failed to add nav template");
        env.add_template("404.html", NOT_FOUND_TEMPLATE)
            .expect("Failed to add 404 template");

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            title => &context.title,
            description => &context.description,
            site_title => &context.site_title,
            content => &context.content,
            nav => &context.nav,
            current_path => &context.current_path,
            toc => &context.toc,
            full_width => context.full_width,
            last_updated => &context.last_updated,
            edit_url => &context.edit_url,
            base_url => &context.base_url,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}<link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body>
  <button class="menu-btn" type="button" aria-label="Toggle navigation">Menu</button>
  <div class="layout">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main{% if full_width %} main-full{% endif %}">
      {% block content %}{% endblock %}
    </main>
  </div>
  <script src="{{ base_url }}assets/main.js"></script>
</body>
</html>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="doc">
  <header class="doc-header">
    <h1 class="doc-title">{{ title }}</h1>
    {% if description %}<p class="doc-description">{{ description }}</p>{% endif %}
  </header>
  <div class="content">
    {{ content | safe }}
  </div>
  {% if last_updated or edit_url %}
  <footer class="doc-footer">
    {% if last_updated %}<span class="last-updated">Last updated on {{ last_updated }}</span>{% endif %}
    {% if edit_url %}<a class="edit-link" href="{{ edit_url }}" rel="noopener">Edit on GitHub</a>{% endif %}
  </footer>
  {% endif %}
</article>

{% if toc and not full_width %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <a href="{{ base_url }}" class="nav-logo">{{ site_title }}</a>
</div>
<ul class="nav-list">
{% for item in nav %}
  <li class="nav-item nav-depth-{{ item.depth }}{% if item.path == current_path %} active{% endif %}">
    <a href="{{ item.path }}">{{ item.title }}</a>
  </li>
{% endfor %}
</ul>"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="doc not-found">
  <header class="doc-header">
    <h1 class="doc-title">Page not found</h1>
    <p class="doc-description">The page you are looking for does not exist.</p>
  </header>
  <p><a href="{{ base_url }}">Back to {{ site_title }}</a></p>
</article>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        Context {
            title: "Uploads".to_string(),
            description: None,
            site_title: "Tusflow Docs".to_string(),
            content: "<p>Hello world</p>".to_string(),
            nav: vec![],
            current_path: "/docs/uploads/".to_string(),
            toc: vec![],
            full_width: false,
            last_updated: None,
            edit_url: None,
            base_url: "/docs/".to_string(),
        }
    }

    #[test]
    fn renders_basic_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_page("doc.html", &context()).unwrap();

        assert!(html.contains("<title>Uploads - Tusflow Docs</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(html.contains("main.css"));
        assert!(!html.contains("doc-footer"));
        assert!(!html.contains("name=\"description\""));
    }

    #[test]
    fn renders_metadata_and_provenance() {
        let engine = TemplateEngine::new();
        let context = Context {
            description: Some("Resumable uploads".to_string()),
            last_updated: Some("2024-03-01".to_string()),
            edit_url: Some("https://github.com/tusflow/tusflow/blob/main/uploads.mdx".to_string()),
            ..context()
        };

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains(r#"<meta name="description" content="Resumable uploads">"#));
        assert!(html.contains("Last updated on 2024-03-01"));
        assert!(html.contains("Edit on GitHub"));
    }

    #[test]
    fn marks_active_navigation() {
        let engine = TemplateEngine::new();
        let context = Context {
            nav: vec![
                NavItem {
                    title: "Home".to_string(),
                    path: "/docs/".to_string(),
                    depth: 0,
                },
                NavItem {
                    title: "Uploads".to_string(),
                    path: "/docs/uploads/".to_string(),
                    depth: 0,
                },
            ],
            ..context()
        };

        let html = engine.render_page("doc.html", &context).unwrap();

        let active: Vec<_> = html
            .split("<li class=")
            .filter(|li| li.contains(" active\""))
            .collect();
        assert_eq!(active.len(), 1);
        assert!(active[0].contains(">Uploads</a>"));
    }

    #[test]
    fn full_width_drops_toc() {
        let engine = TemplateEngine::new();
        let toc = vec![TocEntry {
            title: "Limits".to_string(),
            id: "limits".to_string(),
            level: 2,
        }];

        let standard = engine
            .render_page(
                "doc.html",
                &Context {
                    toc: toc.clone(),
                    ..context()
                },
            )
            .unwrap();
        let full = engine
            .render_page(
                "doc.html",
                &Context {
                    toc,
                    full_width: true,
                    ..context()
                },
            )
            .unwrap();

        assert!(standard.contains(r##"<a href="#limits">Limits</a>"##));
        assert!(!full.contains("On this page"));
        assert!(full.contains("main main-full"));
    }

    #[test]
    fn renders_not_found_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_page("404.html", &context()).unwrap();

        assert!(html.contains("Page not found"));
        assert!(html.contains("Back to Tusflow Docs</a>"));
    }
}
