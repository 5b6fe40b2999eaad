//! Static site generator for folio documentation.
//!
//! Resolves every enumerated route, renders each page through the merged
//! component registry and writes the site with its sitemap, search index and
//! assets.

pub mod assets;
pub mod builder;
pub mod render;
pub mod templates;

pub use assets::AssetPipeline;
pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder, DEFAULT_CONCURRENCY};
pub use render::{build_navigation, normalize_base_url, url_for, PageError, PageRenderer, SiteConfig};
pub use templates::NavItem;
