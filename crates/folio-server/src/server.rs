//! On-demand documentation server.
//!
//! Every request resolves its page through the [`PageResolver`] and renders it
//! with the site templates, so provenance and content are as fresh as the
//! loaded source.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

use folio_docs::{enumerate_routes, PageResolver, ResolveError, Slug};
use folio_static::{build_navigation, AssetPipeline, NavItem, PageRenderer};

/// Configuration for the documentation server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    Serve(String),
}

/// Shared server state.
struct ServerState {
    resolver: PageResolver,
    renderer: PageRenderer,
    nav: Vec<NavItem>,
    css: String,
}

/// Documentation server.
pub struct DocsServer {
    config: ServerConfig,
    state: Arc<ServerState>,
}

impl DocsServer {
    /// Create a new server. Navigation is built once from the source's routes.
    pub fn new(config: ServerConfig, resolver: PageResolver, renderer: PageRenderer) -> Self {
        let routes = enumerate_routes(resolver.source());
        let nav = build_navigation(&resolver, &routes, &renderer.site().base_url);

        Self {
            config,
            state: Arc::new(ServerState {
                resolver,
                renderer,
                nav,
                css: AssetPipeline::generate_css(),
            }),
        }
    }

    /// Build the router. Pages live under the site's base URL.
    pub fn router(&self) -> Router {
        let base = self.state.renderer.site().base_url.clone();

        let mut router = Router::new()
            .route(&format!("{}assets/main.css", base), get(css_handler))
            .route(&format!("{}assets/main.js", base), get(js_handler))
            .route(&base, get(index_handler))
            .route(&format!("{}{{*path}}", base), get(page_handler));

        if base != "/" {
            let target = base.clone();
            router = router.route(
                "/",
                get(move || async move { Redirect::temporary(&target) }),
            );
            let target = base.clone();
            router = router.route(
                base.trim_end_matches('/'),
                get(move || async move { Redirect::permanent(&target) }),
            );
        }

        router
            .fallback(not_found_handler)
            .with_state(Arc::clone(&self.state))
    }

    /// Start the server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        let url = format!(
            "http://{}{}",
            addr,
            self.state.renderer.site().base_url
        );
        tracing::info!("Serving docs at {}", url);

        if self.config.open {
            let _ = open::that(&url);
        }

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        axum::serve(listener, self.router())
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))
    }
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    render(&state, Slug::root()).await
}

async fn page_handler(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Response {
    match Slug::from_path(&path) {
        Ok(slug) => render(&state, slug).await,
        Err(e) => {
            tracing::debug!("Rejected path /{}: {}", path, e);
            not_found(&state)
        }
    }
}

async fn not_found_handler(State(state): State<Arc<ServerState>>) -> Response {
    not_found(&state)
}

async fn render(state: &ServerState, slug: Slug) -> Response {
    let ctx = match state.resolver.resolve(&slug).await {
        Ok(ctx) => ctx,
        Err(ResolveError::NotFound(_)) => return not_found(state),
    };

    match state.renderer.render_page(&ctx, &state.nav) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render /{}: {}", slug, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render /{}: {}", slug, e),
            )
                .into_response()
        }
    }
}

fn not_found(state: &ServerState) -> Response {
    match state.renderer.render_not_found(&state.nav) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render not-found page: {}", e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn css_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], state.css.clone())
}

async fn js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        AssetPipeline::generate_js(),
    )
}
