//! Configuration for the GitHub client.

use std::time::Duration;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default timeout for provenance requests: 10 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`GithubClient`](crate::GithubClient).
#[derive(Clone)]
pub struct GithubConfig {
    /// API base URL, without trailing slash.
    pub api_base: String,
    /// Bearer token; unauthenticated requests are heavily rate limited.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header (required by the GitHub API).
    pub user_agent: String,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: Self::default_user_agent(),
        }
    }
}

impl GithubConfig {
    fn default_user_agent() -> String {
        format!("folio/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the effective API base, using default if empty.
    pub fn effective_api_base(&self) -> &str {
        let base = self.api_base.trim_end_matches('/');
        if base.is_empty() {
            DEFAULT_API_BASE
        } else {
            base
        }
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Returns the effective user agent, using default if empty.
    pub fn effective_user_agent(&self) -> String {
        if self.user_agent.is_empty() {
            Self::default_user_agent()
        } else {
            self.user_agent.clone()
        }
    }
}
