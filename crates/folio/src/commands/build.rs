//! Static site build command.

use std::path::PathBuf;

use anyhow::Result;
use folio_static::{BuildConfig, StaticBuilder};

use crate::config::Config;
use crate::site::Site;

/// Run the build command.
pub async fn run(
    config: &Config,
    output: Option<PathBuf>,
    minify: Option<bool>,
    offline: bool,
) -> Result<()> {
    tracing::info!("Building static site...");

    let site = Site::load(config, offline)?;

    let build_config = BuildConfig {
        output_dir: output.unwrap_or_else(|| config.resolve(&config.docs.output)),
        minify: minify.unwrap_or(config.build.minify),
        site_url: config.docs.site_url.clone(),
        concurrency: config.build.concurrency,
    };

    let renderer = site.renderer();
    let result = StaticBuilder::new(build_config, site.resolver, renderer)
        .build()
        .await?;

    tracing::info!(
        "Built {} pages ({} with last-edit dates) in {}ms",
        result.pages,
        result.with_last_edit,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
