//! Content check command.

use anyhow::Result;

use folio_components::{render_body, ComponentRegistry};
use folio_docs::{enumerate_routes, ContentSource, DocsSource};

use crate::config::Config;
use crate::site::Site;

/// Render every page's body, collecting failures as `path: error` lines.
fn check_pages(source: &DocsSource, registry: &ComponentRegistry) -> Vec<String> {
    let mut problems = Vec::new();

    for slug in enumerate_routes(source) {
        let Some(entry) = source.get_page(&slug) else {
            continue;
        };

        let result = registry
            .check(&entry.body)
            .and_then(|_| render_body(&entry.body, registry).map(|_| ()));

        if let Err(e) = result {
            problems.push(format!("{}: {}", entry.source_path.display(), e));
        }
    }

    problems
}

/// Run the check command.
pub fn run(config: &Config) -> Result<()> {
    let site = Site::load(config, true)?;

    let problems = check_pages(&site.source, &site.registry);
    for problem in &problems {
        tracing::error!("{}", problem);
    }

    if !problems.is_empty() {
        anyhow::bail!("{} of {} pages failed to render", problems.len(), site.source.len());
    }

    tracing::info!("All {} pages render", site.source.len());
    Ok(())
}
