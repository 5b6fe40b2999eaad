//! Last-edit provenance for documentation files.
//!
//! Provenance is best effort: providers answer `None` whenever the hosting
//! provider cannot give a timestamp, and never return an error.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jiff::Timestamp;

/// The repository a docs tree is published from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoIdentity {
    pub owner: String,
    pub repo: String,
    /// Branch, tag or commit the docs are built from
    pub reference: String,
}

impl RepoIdentity {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            reference: reference.into(),
        }
    }

    /// Link to a file's source view.
    pub fn blob_url(&self, path: &str) -> String {
        format!(
            "https://github.com/{}/{}/blob/{}/{}",
            self.owner, self.repo, self.reference, path
        )
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.reference)
    }
}

/// Source of last-modification timestamps.
#[async_trait]
pub trait LastEditProvider: Send + Sync {
    /// Timestamp of the most recent change to `path`, if known.
    async fn last_edit(&self, repo: &RepoIdentity, path: &str) -> Option<Timestamp>;
}

/// Provider for offline builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLastEdit;

#[async_trait]
impl LastEditProvider for NoLastEdit {
    async fn last_edit(&self, _repo: &RepoIdentity, _path: &str) -> Option<Timestamp> {
        None
    }
}

type CacheKey = (RepoIdentity, String);

/// Memoises another provider, so each file is looked up at most once per
/// build pass. Misses (`None`) are cached too.
pub struct CachedLastEdit {
    inner: Arc<dyn LastEditProvider>,
    cache: Mutex<HashMap<CacheKey, Option<Timestamp>>>,
}

impl CachedLastEdit {
    pub fn new(inner: Arc<dyn LastEditProvider>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, key: &CacheKey) -> Option<Option<Timestamp>> {
        match self.cache.lock() {
            Ok(cache) => cache.get(key).copied(),
            Err(_) => None,
        }
    }
}

impl fmt::Debug for CachedLastEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedLastEdit").finish_non_exhaustive()
    }
}

#[async_trait]
impl LastEditProvider for CachedLastEdit {
    async fn last_edit(&self, repo: &RepoIdentity, path: &str) -> Option<Timestamp> {
        let key = (repo.clone(), path.to_string());
        if let Some(hit) = self.cached(&key) {
            return hit;
        }

        // The lock is not held across the fetch; concurrent misses may both fetch
        let result = self.inner.last_edit(repo, path).await;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, result);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        answer: Option<Timestamp>,
    }

    #[async_trait]
    impl LastEditProvider for Counting {
        async fn last_edit(&self, _repo: &RepoIdentity, _path: &str) -> Option<Timestamp> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    fn repo() -> RepoIdentity {
        RepoIdentity::new("tusflow", "docs", "main")
    }

    #[tokio::test]
    async fn caches_per_path() {
        let counting = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            answer: Some("2024-03-01T00:00:00Z".parse().unwrap()),
        });
        let cached = CachedLastEdit::new(counting.clone());

        let first = cached.last_edit(&repo(), "a.mdx").await;
        let second = cached.last_edit(&repo(), "a.mdx").await;
        cached.last_edit(&repo(), "b.mdx").await;

        assert_eq!(first, second);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn caches_misses() {
        let counting = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            answer: None,
        });
        let cached = CachedLastEdit::new(counting.clone());

        assert_eq!(cached.last_edit(&repo(), "a.mdx").await, None);
        assert_eq!(cached.last_edit(&repo(), "a.mdx").await, None);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn offline_provider_knows_nothing() {
        assert_eq!(NoLastEdit.last_edit(&repo(), "a.mdx").await, None);
    }

    #[test]
    fn builds_blob_urls() {
        assert_eq!(
            repo().blob_url("content/docs/index.mdx"),
            "https://github.com/tusflow/docs/blob/main/content/docs/index.mdx"
        );
    }
}
