//! Error types for folio-github.
//!
//! Errors never leave [`GithubClient::last_edit`](crate::GithubClient), which
//! logs them and answers `None`; they exist for construction and logging.

use thiserror::Error;

/// Result type alias for folio-github operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for folio-github operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("GitHub API returned {0}")]
    Status(reqwest::StatusCode),
    /// Response body was not the expected JSON.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// No commit touches the file.
    #[error("No commits found")]
    EmptyHistory,
    /// The commit date is not an RFC 3339 timestamp.
    #[error("Invalid commit timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: jiff::Error,
    },
}

impl Error {
    /// Short kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Reqwest(e) if e.is_timeout() => "timeout",
            Error::Reqwest(e) if e.is_connect() => "connect",
            Error::Reqwest(_) => "http",
            Error::Status(_) => "status",
            Error::Serde(_) => "json",
            Error::EmptyHistory => "empty",
            Error::Timestamp { .. } => "timestamp",
        }
    }
}
