//! Asset pipeline for CSS and JavaScript processing.

use folio_components::highlight_css;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file: the site theme plus code highlighting colours.
    pub fn generate_css() -> String {
        let mut css = DEFAULT_CSS.to_string();
        match highlight_css() {
            Ok(highlight) => {
                css.push_str("\n/* Code highlighting */\n");
                css.push_str(&highlight);
            }
            Err(e) => tracing::warn!("Failed to generate highlight CSS: {}", e),
        }
        css
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Host stylesheets may override the custom properties in :root.
const DEFAULT_CSS: &str = r#"/* Folio docs theme */

:root {
  --sidebar-width: 280px;
  --toc-width: 200px;
  --content-max-width: 800px;
  --background: #ffffff;
  --foreground: #0a0a0a;
  --muted: #f5f5f5;
  --muted-foreground: #6b7280;
  --border: #e5e7eb;
  --card: #fafafa;
  --primary: #2563eb;
  --primary-foreground: #ffffff;
  --radius: 0.5rem;
  --info: #2563eb;
  --warn: #d97706;
  --error: #dc2626;
  --success: #16a34a;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-sans, system-ui, -apple-system, sans-serif);
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

/* Sidebar */
.sidebar {
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-header {
  margin-bottom: 1.5rem;
}

.nav-logo {
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--foreground);
  text-decoration: none;
}

.nav-list {
  list-style: none;
}

.nav-item {
  margin-bottom: 0.25rem;
}

.nav-item a {
  display: block;
  padding: 0.5rem 0.75rem;
  color: var(--muted-foreground);
  text-decoration: none;
  border-radius: var(--radius);
  transition: background 0.15s, color 0.15s;
}

.nav-item a:hover {
  color: var(--foreground);
}

.nav-item.active > a {
  background: var(--primary);
  color: var(--primary-foreground);
}

.nav-depth-1 {
  margin-left: 1rem;
}

.nav-depth-2 {
  margin-left: 2rem;
}

/* Main content */
.main {
  display: grid;
  grid-template-columns: 1fr var(--toc-width);
  gap: 2rem;
  padding: 2rem;
  max-width: calc(var(--content-max-width) + var(--toc-width) + 4rem);
}

.main-full {
  grid-template-columns: 1fr;
  max-width: none;
}

.doc {
  max-width: var(--content-max-width);
}

.main-full .doc {
  max-width: none;
}

.doc-header {
  margin-bottom: 2rem;
}

.doc-title {
  font-size: 2.5rem;
  font-weight: 700;
}

.doc-description {
  font-size: 1.125rem;
  color: var(--muted-foreground);
}

.doc-footer {
  display: flex;
  justify-content: space-between;
  margin-top: 3rem;
  padding-top: 1rem;
  border-top: 1px solid var(--border);
  font-size: 0.875rem;
  color: var(--muted-foreground);
}

.edit-link {
  color: var(--primary);
}

.content h1 {
  font-size: 2rem;
  font-weight: 700;
  margin-bottom: 1.5rem;
}

.content h2 {
  font-size: 1.5rem;
  font-weight: 600;
  margin: 2rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.content h3 {
  font-size: 1.25rem;
  font-weight: 600;
  margin: 1.5rem 0 0.75rem;
}

.content p,
.content ul,
.content ol,
.content table {
  margin-bottom: 1rem;
}

.content ul,
.content ol {
  padding-left: 1.5rem;
}

.content a {
  color: var(--primary);
  text-decoration: underline;
  text-underline-offset: 4px;
}

.content table {
  width: 100%;
  border-collapse: collapse;
  font-size: 0.875rem;
}

.content th,
.content td {
  text-align: left;
  padding: 0.5rem;
  border-bottom: 1px solid var(--border);
}

/* Code blocks */
.content pre {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  font-family: var(--font-mono, ui-monospace, monospace);
  font-size: 0.875rem;
  margin-bottom: 1rem;
}

.content code {
  font-family: var(--font-mono, ui-monospace, monospace);
  font-size: 0.875em;
  background: var(--muted);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

.content pre code {
  background: none;
  padding: 0;
}

.code-block {
  position: relative;
  margin-bottom: 1rem;
}

.code-block pre {
  margin-bottom: 0;
}

.code-block-title {
  font-family: var(--font-mono, ui-monospace, monospace);
  font-size: 0.75rem;
  padding: 0.5rem 1rem;
  background: var(--muted);
  border: 1px solid var(--border);
  border-bottom: none;
  border-radius: var(--radius) var(--radius) 0 0;
}

.code-block-title + pre {
  border-radius: 0 0 var(--radius) var(--radius);
}

.copy-btn {
  position: absolute;
  bottom: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  font-weight: 500;
  background: var(--muted);
  color: var(--foreground);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  cursor: pointer;
}

/* Callouts */
.callout {
  border-left: 4px solid var(--info);
  background: var(--card);
  border-radius: var(--radius);
  padding: 1rem;
  margin-bottom: 1rem;
}

.callout-warn {
  border-left-color: var(--warn);
}

.callout-error {
  border-left-color: var(--error);
}

.callout-success {
  border-left-color: var(--success);
}

.callout-title {
  font-weight: 600;
  margin-bottom: 0.25rem;
}

.callout-body > :last-child {
  margin-bottom: 0;
}

/* Cards */
.cards {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
  gap: 1rem;
  margin-bottom: 1rem;
}

.card {
  display: block;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  color: inherit;
  text-decoration: none;
}

.content a.card {
  text-decoration: none;
  color: inherit;
}

a.card:hover {
  border-color: var(--primary);
}

.card-title {
  font-size: 1rem;
  font-weight: 600;
}

.card-description {
  font-size: 0.875rem;
  color: var(--muted-foreground);
}

/* API reference */
.api-operation {
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1.5rem;
  margin-bottom: 1.5rem;
}

.api-operation-header {
  display: flex;
  align-items: center;
  gap: 0.75rem;
  margin-bottom: 0.75rem;
}

.api-method {
  font-size: 0.75rem;
  font-weight: 700;
  padding: 0.125rem 0.5rem;
  border-radius: 0.25rem;
  color: #ffffff;
  background: var(--muted-foreground);
}

.api-method-get {
  background: var(--success);
}

.api-method-post {
  background: var(--info);
}

.api-method-put,
.api-method-patch {
  background: var(--warn);
}

.api-method-delete {
  background: var(--error);
}

.api-summary {
  font-weight: 600;
}

.api-section {
  font-size: 0.875rem;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted-foreground);
  margin: 1rem 0 0.5rem;
}

/* Table of contents */
.toc {
  position: sticky;
  top: 2rem;
  align-self: start;
}

.toc h2 {
  font-size: 0.75rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted-foreground);
  margin-bottom: 0.75rem;
}

.toc ul {
  list-style: none;
}

.toc li {
  margin-bottom: 0.25rem;
}

.toc a {
  font-size: 0.875rem;
  color: var(--muted-foreground);
  text-decoration: none;
}

.toc a:hover {
  color: var(--foreground);
}

.toc-level-3 {
  padding-left: 1rem;
}

.toc-level-4 {
  padding-left: 2rem;
}

/* Mobile */
.menu-btn {
  display: none;
  position: fixed;
  top: 1rem;
  left: 1rem;
  z-index: 100;
  padding: 0.5rem;
  background: var(--primary);
  color: var(--primary-foreground);
  border: none;
  border-radius: var(--radius);
  cursor: pointer;
}

@media (max-width: 1024px) {
  .layout {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: fixed;
    left: -100%;
    z-index: 50;
    transition: left 0.3s;
    width: var(--sidebar-width);
  }

  .sidebar.open {
    left: 0;
  }

  .main {
    grid-template-columns: 1fr;
  }

  .toc {
    display: none;
  }

  .menu-btn {
    display: block;
  }
}
"#;

const DEFAULT_JS: &str = r#"// Folio docs runtime
(function() {
  'use strict';

  const menuBtn = document.querySelector('.menu-btn');
  const sidebar = document.querySelector('.sidebar');

  if (menuBtn && sidebar) {
    menuBtn.addEventListener('click', () => {
      sidebar.classList.toggle('open');
    });
  }

  // Copy buttons are rendered with highlighted code blocks
  document.querySelectorAll('.code-block .copy-btn').forEach(btn => {
    btn.addEventListener('click', async () => {
      const code = btn.closest('.code-block').querySelector('code');
      const text = code ? code.textContent : '';

      try {
        await navigator.clipboard.writeText(text || '');
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(":root"));
        assert!(css.contains(".code-block"));
        assert!(css.contains(".callout-warn"));
        assert!(css.contains(".api-operation"));
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn generates_js() {
        let js = AssetPipeline::generate_js();
        assert!(js.contains(".code-block .copy-btn"));
        assert!(js.contains("clipboard"));
    }

    #[test]
    fn default_css_minifies() {
        let css = AssetPipeline::generate_css();

        let minified = AssetPipeline::minify_css(&css).unwrap();

        assert!(minified.len() < css.len());
        assert!(minified.contains(".callout-title"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }
}
