//! Tandem Server — edge proxy for the tandem multi-agent demo.
//!
//! A standalone Rust HTTP server providing:
//! - `POST /api/ai` — single-shot completion, proxied upstream
//! - `POST /api/agents/workflow` — named agent-chain runs, proxied upstream
//! - `GET /api/health` — liveness probe
//!
//! The server injects the upstream credential, retries transport failures,
//! and stamps the fixed permissive cross-origin header set on every
//! response (success, error, 404, and preflight alike).

pub mod api;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use tandem_core::Config;

use self::state::{AppState, AppStateInner};

/// Configuration for the tandem backend server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Start the tandem backend server with configuration from the environment.
///
/// Returns the actual address the server is listening on.
pub async fn start_server(config: ServerConfig) -> Result<SocketAddr, String> {
    // Initialize tracing; a host (e.g. the CLI) may already have installed
    // a global subscriber, in which case its configuration wins.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tandem_server=info,tower_http=info".into()),
        )
        .try_init()
        .ok();

    tracing::info!(
        "Starting tandem backend server on {}:{}",
        config.host,
        config.port
    );

    let state: AppState = Arc::new(AppStateInner::new(Config::from_env()));

    start_server_with_state(config, state).await
}

/// Start the HTTP server with a pre-built `AppState`.
///
/// This variant skips tracing initialization, which makes it suitable for
/// tests and for embedding in a host that configures its own subscriber.
pub async fn start_server_with_state(
    config: ServerConfig,
    state: AppState,
) -> Result<SocketAddr, String> {
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local address: {}", e))?;

    tracing::info!("Tandem backend server listening on {}", local_addr);

    // Spawn the server in a background task
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}

/// Build the full application router.
///
/// The fixed cross-origin header set is stamped on *every* response, not
/// only on preflights, matching the public contract.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(api::api_router())
        .route(
            "/api/health",
            axum::routing::get(health_check).options(api::preflight),
        )
        .fallback(api::not_found)
        .method_not_allowed_fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "server": "tandem-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
