//! Documentation content resolution for folio.
//!
//! A [`ContentSource`] holds the compiled documentation tree. The
//! [`PageResolver`] turns a URL [`Slug`] into a [`RenderContext`], pulling
//! last-edit provenance through a [`LastEditProvider`], and
//! [`enumerate_routes`] lists every slug a static build has to produce.

pub mod entry;
pub mod provenance;
pub mod resolver;
pub mod routes;
pub mod slug;
pub mod source;

pub use entry::{ContentEntry, Layout};
pub use provenance::{CachedLastEdit, LastEditProvider, NoLastEdit, RepoIdentity};
pub use resolver::{PageMetadata, PageResolver, RenderContext, ResolveError};
pub use routes::enumerate_routes;
pub use slug::{Slug, SlugError};
pub use source::{ContentSource, DocsSource, SourceError};
