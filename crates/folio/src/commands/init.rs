//! Initialize documentation in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Write `content` to `path` unless it exists and `overwrite` is false.
fn scaffold(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::info!("Keeping existing {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    let docs_dir = Path::new("docs");
    if docs_dir.exists() && !yes {
        tracing::warn!("docs/ directory already exists. Use --yes to overwrite.");
        return Ok(());
    }

    scaffold(config_path, DEFAULT_CONFIG, yes)?;
    scaffold(&docs_dir.join("index.mdx"), DEFAULT_INDEX, yes)?;
    scaffold(
        &docs_dir.join("getting-started.mdx"),
        DEFAULT_GETTING_STARTED,
        yes,
    )?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio serve' to preview your docs.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Folio Configuration

[docs]
# Source directory for documentation
dir = "docs"

# Output directory for built site
output = "dist"

# Site title
title = "My Documentation"

# Base URL path the site is served under
base_url = "/"

# Public origin, used for absolute URLs in sitemap.xml
site_url = ""

[github]
# Repository used for "last updated" dates and edit links
# owner = "my-org"
# repo = "my-repo"
ref = "main"

# Location of the docs directory inside the repository
path_prefix = "docs"

# Environment variable holding an API token (optional)
token_env = "GITHUB_TOKEN"
timeout_secs = 10

[openapi]
# OpenAPI documents available to <APIPage document="..." />
documents = []

[build]
# Enable minification
minify = true

# Pages resolved concurrently
concurrency = 8
"#;

const DEFAULT_INDEX: &str = r#"---
title: Welcome
description: Documentation powered by folio.
---

This is your documentation site, powered by **folio**.

<Cards>
<Card title="Getting Started" href="/getting-started/" description="Install and write your first page" />
</Cards>
"#;

const DEFAULT_GETTING_STARTED: &str = r#"---
title: Getting Started
description: Set up folio for your project.
---

## Installation

```bash title="Terminal"
cargo install folio
```

## Writing Documentation

Create `.mdx` files in the `docs/` directory. Each file needs frontmatter:

```mdx
---
title: Page Title
description: Shown under the title and in search results
---

## Your Content Here
```

<Callout type="info" title="Nested pages">
`docs/guides/index.mdx` is served at `/guides/`, and
`docs/guides/uploads.mdx` at `/guides/uploads/`.
</Callout>

## Components

- `<Callout type="info|warn|error|success">` highlights a note.
- `<Cards>` and `<Card title="..." href="...">` link to other pages.
- `<APIPage document="./openapi.json" />` embeds an API reference from a
  document listed under `[openapi]` in `folio.toml`.

## Development

Serve pages, rendering each one on request:

```bash
folio serve
```

## Building

Build for production:

```bash
folio build
```
"#;
