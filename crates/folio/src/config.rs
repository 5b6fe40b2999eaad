//! Configuration file structure (folio.toml).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_docs::RepoIdentity;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub github: GithubSettings,
    #[serde(default)]
    pub openapi: OpenApiConfig,
    #[serde(default)]
    pub build: BuildSettings,

    /// Directory holding the config file
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_docs_dir")]
    pub dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Public origin for absolute sitemap URLs
    #[serde(default)]
    pub site_url: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
            output: default_output(),
            title: default_title(),
            base_url: default_base_url(),
            site_url: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GithubSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default = "default_ref", rename = "ref")]
    pub reference: String,
    /// Docs directory within the repository
    #[serde(default)]
    pub path_prefix: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            owner: None,
            repo: None,
            reference: default_ref(),
            path_prefix: String::new(),
            api_base: default_api_base(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GithubSettings {
    /// Repository the docs live in, when both owner and repo are set.
    pub fn repo_identity(&self) -> Option<RepoIdentity> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Some(RepoIdentity::new(owner, repo, &self.reference))
            }
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct OpenApiConfig {
    /// OpenAPI documents (JSON or YAML) available to `<APIPage>`
    #[serde(default)]
    pub documents: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_true")]
    pub minify: bool,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: true,
            concurrency: default_concurrency(),
        }
    }
}

fn default_docs_dir() -> String {
    "docs".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_title() -> String {
    "Documentation".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_true() -> bool {
    true
}
fn default_ref() -> String {
    "main".to_string()
}
fn default_api_base() -> String {
    folio_github::DEFAULT_API_BASE.to_string()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}
fn default_timeout_secs() -> u64 {
    folio_github::DEFAULT_TIMEOUT.as_secs()
}
fn default_concurrency() -> usize {
    folio_static::DEFAULT_CONCURRENCY
}

impl Config {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    ///
    /// Relative paths in the file are taken relative to its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();

        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self {
                root,
                ..Self::default()
            });
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.root = root;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve a path from the config against the config file's directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}
