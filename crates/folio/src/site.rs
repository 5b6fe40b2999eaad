//! Assembling the content source, provenance, registry and resolver from
//! configuration.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};

use folio_components::{page_registry, ApiReference, ComponentRegistry};
use folio_docs::{CachedLastEdit, DocsSource, LastEditProvider, NoLastEdit, PageResolver};
use folio_github::{GithubClient, GithubConfig};
use folio_static::{PageRenderer, SiteConfig};

use crate::config::Config;

/// A loaded documentation site.
pub struct Site {
    pub source: Arc<DocsSource>,
    pub resolver: PageResolver,
    pub registry: ComponentRegistry,
    pub site: SiteConfig,
}

impl Site {
    /// Load the docs tree and wire up the pipeline.
    ///
    /// With `offline`, or without a configured repository, pages carry no
    /// last-edit timestamps.
    pub fn load(config: &Config, offline: bool) -> Result<Self> {
        let docs_dir = config.resolve(&config.docs.dir);
        let source = Arc::new(
            DocsSource::load(&docs_dir)
                .with_context(|| format!("Failed to load docs from {}", docs_dir.display()))?,
        );

        let api = ApiReference::load(&config.root, &config.openapi.documents)
            .context("Failed to load OpenAPI documents")?;
        if !api.is_empty() {
            tracing::info!("Loaded {} OpenAPI documents", api.len());
        }
        let registry = page_registry(api);

        let mut resolver = PageResolver::new(source.clone(), provenance(config, offline)?);
        if let Some(repo) = config.github.repo_identity() {
            resolver = resolver.with_repo(repo, config.github.path_prefix.as_str());
        }

        Ok(Self {
            source,
            resolver,
            registry,
            site: SiteConfig::new(&config.docs.title, &config.docs.base_url),
        })
    }

    /// Page renderer over this site's registry.
    pub fn renderer(&self) -> PageRenderer {
        PageRenderer::new(self.site.clone(), self.registry.clone())
    }
}

fn provenance(config: &Config, offline: bool) -> Result<Arc<dyn LastEditProvider>> {
    let github = &config.github;

    if offline || !github.enabled || github.repo_identity().is_none() {
        tracing::debug!("Last-edit lookups disabled");
        return Ok(Arc::new(NoLastEdit));
    }

    let mut client_config = GithubConfig::default()
        .with_api_base(&github.api_base)
        .with_timeout(github.timeout());
    match env::var(&github.token_env) {
        Ok(token) if !token.is_empty() => client_config = client_config.with_token(token),
        _ => tracing::debug!("{} not set, using unauthenticated requests", github.token_env),
    }

    let client = GithubClient::new(client_config).context("Failed to create GitHub client")?;
    Ok(Arc::new(CachedLastEdit::new(Arc::new(client))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_paths_relative_to_config() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("site");
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/index.mdx"), "---\ntitle: Home\n---\nHi\n").unwrap();
        fs::write(root.join("openapi.json"), r#"{"openapi":"3.0.0","paths":{}}"#).unwrap();
        fs::write(
            root.join("folio.toml"),
            "[openapi]\ndocuments = [\"./openapi.json\"]\n",
        )
        .unwrap();

        let config = Config::load(&root.join("folio.toml")).unwrap();
        let site = Site::load(&config, true).unwrap();

        assert_eq!(site.source.len(), 1);
    }
}
