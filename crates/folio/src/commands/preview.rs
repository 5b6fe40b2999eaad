//! Preview server command for a built site.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use folio_static::normalize_base_url;

use crate::config::Config;

/// Run the preview command.
pub async fn run(config: &Config, port: u16, dir: PathBuf) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'folio build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    let base_url = normalize_base_url(&config.docs.base_url);
    let files = ServeDir::new(&dir);

    // The built site expects to live under the base URL
    let app = if base_url == "/" {
        Router::new().fallback_service(files)
    } else {
        let target = base_url.clone();
        Router::new()
            .route("/", get(move || async move { Redirect::temporary(&target) }))
            .nest_service(base_url.trim_end_matches('/'), files)
    };

    let url = format!("http://{}{}", addr, base_url);
    tracing::info!("Serving {} at {}", dir.display(), url);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let _ = open::that(&url);

    axum::serve(listener, app).await?;

    Ok(())
}
