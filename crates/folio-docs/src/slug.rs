//! URL slugs identifying documentation pages.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Errors that can occur constructing a slug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("Empty slug segment at position {0}")]
    EmptySegment(usize),

    #[error("Invalid character {ch:?} in slug segment '{segment}'")]
    InvalidCharacter { segment: String, ch: char },
}

/// An ordered sequence of URL-safe path segments.
///
/// The empty slug addresses the root index page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slug {
    segments: Vec<String>,
}

impl Slug {
    /// The root slug.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a slug from segments, validating each one.
    pub fn new<I, S>(segments: I) -> Result<Self, SlugError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();

        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(SlugError::EmptySegment(i));
            }
            if let Some(ch) = segment.chars().find(|c| !is_url_safe(*c)) {
                return Err(SlugError::InvalidCharacter {
                    segment: segment.clone(),
                    ch,
                });
            }
        }

        Ok(Self { segments })
    }

    /// Parse a URL path such as `/guides/uploads/`.
    ///
    /// Leading and trailing slashes are ignored.
    pub fn from_path(path: &str) -> Result<Self, SlugError> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        Self::new(trimmed.split('/'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Slug with one more segment.
    pub fn join(&self, segment: &str) -> Result<Self, SlugError> {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self::new(segments)
    }
}

/// Unreserved URL characters (RFC 3986).
fn is_url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s)
    }
}

impl Serialize for Slug {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.segments.serialize(serializer)
    }
}
