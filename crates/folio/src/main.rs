//! Folio CLI - documentation site generator with GitHub provenance.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod site;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Documentation site generator with GitHub provenance")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to folio.toml config file
    #[arg(short, long, default_value = "folio.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize documentation in current project
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build static documentation site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,

        /// Skip last-edit lookups
        #[arg(long)]
        offline: bool,
    },

    /// Serve docs, rendering each page on request
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "7777")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,

        /// Skip last-edit lookups
        #[arg(long)]
        offline: bool,
    },

    /// Preview a built site
    Preview {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to config or "dist")
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print every route as JSON
    Routes,

    /// Compile every page and verify all components have renderers
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = || Config::load(&cli.config);

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build {
            output,
            no_minify,
            offline,
        } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&config()?, output, minify, offline).await?;
        }
        Commands::Serve {
            port,
            no_open,
            offline,
        } => {
            commands::serve::run(&config()?, port, !no_open, offline).await?;
        }
        Commands::Preview { port, dir } => {
            let config = config()?;
            let dir = dir.unwrap_or_else(|| config.resolve(&config.docs.output));
            commands::preview::run(&config, port, dir).await?;
        }
        Commands::Routes => {
            commands::routes::run(&config()?)?;
        }
        Commands::Check => {
            commands::check::run(&config()?)?;
        }
    }

    Ok(())
}
