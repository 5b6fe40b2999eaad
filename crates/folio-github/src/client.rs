//! GitHub commit history client.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::Client;
use serde::Deserialize;

use folio_docs::{LastEditProvider, RepoIdentity};

use crate::config::GithubConfig;
use crate::error::{Error, Result};

/// Tracing target for GitHub client operations.
pub const TRACING_TARGET: &str = "folio_github::client";

/// Inner client that holds the HTTP client and configuration.
struct GithubClientInner {
    http: Client,
    config: GithubConfig,
}

impl std::fmt::Debug for GithubClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClientInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Reads last-edit timestamps from a repository's commit history.
///
/// Sends one `GET /repos/{owner}/{repo}/commits?path=..&sha=..&per_page=1`
/// per lookup and reads the committer date of the newest commit. Every
/// failure is logged and reported as `None`.
#[derive(Clone, Debug)]
pub struct GithubClient {
    inner: Arc<GithubClientInner>,
}

impl GithubClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: GithubConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            api_base = config.effective_api_base(),
            timeout_ms = config.effective_timeout().as_millis(),
            authenticated = config.token.is_some(),
            "Creating GitHub client"
        );

        let http = Client::builder()
            .timeout(config.effective_timeout())
            .user_agent(config.effective_user_agent())
            .build()?;

        Ok(Self {
            inner: Arc::new(GithubClientInner { http, config }),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &GithubConfig {
        &self.inner.config
    }

    fn commits_url(&self, repo: &RepoIdentity) -> String {
        format!(
            "{}/repos/{}/{}/commits",
            self.inner.config.effective_api_base(),
            repo.owner,
            repo.repo
        )
    }

    async fn fetch(&self, repo: &RepoIdentity, path: &str) -> Result<Timestamp> {
        let mut request = self
            .inner
            .http
            .get(self.commits_url(repo))
            .query(&[
                ("path", path),
                ("sha", repo.reference.as_str()),
                ("per_page", "1"),
            ])
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.inner.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }

        let body = response.text().await?;
        parse_last_edit(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: Commit,
}

#[derive(Debug, Deserialize)]
struct Commit {
    committer: Option<Signature>,
    author: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    date: Option<String>,
}

/// Read the newest commit date from a `/commits` response body.
///
/// Uses the committer date, falling back to the author date.
pub fn parse_last_edit(body: &str) -> Result<Timestamp> {
    let commits: Vec<CommitEntry> = serde_json::from_str(body)?;
    let newest = commits.into_iter().next().ok_or(Error::EmptyHistory)?;

    let date = newest
        .commit
        .committer
        .and_then(|s| s.date)
        .or_else(|| newest.commit.author.and_then(|s| s.date))
        .ok_or(Error::EmptyHistory)?;

    date.parse::<Timestamp>()
        .map_err(|e| Error::Timestamp { value: date, source: e })
}

#[async_trait]
impl LastEditProvider for GithubClient {
    async fn last_edit(&self, repo: &RepoIdentity, path: &str) -> Option<Timestamp> {
        let started_at = Instant::now();

        match self.fetch(repo, path).await {
            Ok(timestamp) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    repo = %repo,
                    path,
                    %timestamp,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Fetched last edit"
                );
                Some(timestamp)
            }
            Err(Error::EmptyHistory) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    repo = %repo,
                    path,
                    "No commit history for file"
                );
                None
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    repo = %repo,
                    path,
                    kind = err.kind(),
                    error = %err,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Last edit lookup failed"
                );
                None
            }
        }
    }
}
