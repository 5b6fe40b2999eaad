//! Route listing command.

use anyhow::Result;
use serde::Serialize;

use folio_docs::{enumerate_routes, DocsSource, Slug};

use crate::config::Config;
use crate::site::Site;

/// One static route, as consumed by deployment tooling.
#[derive(Debug, Serialize)]
struct Route<'a> {
    slug: &'a Slug,
}

fn routes_json(source: &DocsSource) -> Result<String> {
    let slugs = enumerate_routes(source);
    let routes: Vec<Route<'_>> = slugs.iter().map(|slug| Route { slug }).collect();
    Ok(serde_json::to_string_pretty(&routes)?)
}

/// Print every route as JSON on stdout.
pub fn run(config: &Config) -> Result<()> {
    let site = Site::load(config, true)?;
    println!("{}", routes_json(&site.source)?);
    Ok(())
}
