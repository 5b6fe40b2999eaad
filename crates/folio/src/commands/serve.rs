//! On-demand docs server command.

use anyhow::Result;
use folio_server::{DocsServer, ServerConfig};

use crate::config::Config;
use crate::site::Site;

/// Run the docs server.
pub async fn run(config: &Config, port: u16, open: bool, offline: bool) -> Result<()> {
    tracing::info!("Starting docs server on port {}", port);

    let site = Site::load(config, offline)?;
    let renderer = site.renderer();

    let server_config = ServerConfig {
        port,
        open,
        ..Default::default()
    };

    DocsServer::new(server_config, site.resolver, renderer)
        .start()
        .await?;

    Ok(())
}
