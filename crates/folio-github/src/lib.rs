//! GitHub-backed last-edit provenance for folio docs.
//!
//! [`GithubClient`] implements [`folio_docs::LastEditProvider`] by asking the
//! GitHub REST API for the newest commit touching a file.
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_docs::{LastEditProvider, RepoIdentity};
//! use folio_github::{GithubClient, GithubConfig};
//!
//! let client = GithubClient::new(GithubConfig::default())?;
//! let repo = RepoIdentity::new("tusflow", "tusflow", "main");
//! let last_edit = client.last_edit(&repo, "content/docs/index.mdx").await;
//! ```

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;

pub use crate::client::{parse_last_edit, GithubClient, TRACING_TARGET};
pub use crate::config::{GithubConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use crate::error::{Error, Result};
