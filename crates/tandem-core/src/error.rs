//! Core error type for the tandem proxy.
//!
//! `ProxyError` is used throughout the core domain (proxy, client, runner,
//! store). When the `axum` feature is enabled, it also implements
//! `IntoResponse` so it can be used directly as an axum handler error type.
//!
//! Upstream responses with a non-success status are deliberately **not**
//! errors: they pass through verbatim as `UpstreamReply`. Only transport
//! and configuration faults live here.

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Required upstream credential missing. Never retried.
    #[error("GROQ_API_KEY not configured: {0}")]
    Configuration(String),

    /// Network-level failure reaching upstream, after retry exhaustion.
    #[error("Upstream unreachable after {attempts} attempts: {detail}")]
    Transport { attempts: u32, detail: String },

    /// Public-surface call failed (client-side normalization of an HTTP
    /// error body into a human-readable message).
    #[error("{0}")]
    Api(String),

    /// A workflow or demo run is already in progress.
    #[error("A workflow run is already in progress")]
    Busy,
}

// ---------------------------------------------------------------------------
// axum integration (opt-in via feature flag)
// ---------------------------------------------------------------------------

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, body) = match &self {
            ProxyError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": self.to_string() }),
            ),
            ProxyError::Transport { detail, .. } => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({ "error": "Upstream error", "details": detail }),
            ),
            ProxyError::Api(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": msg }),
            ),
            ProxyError::Busy => (
                StatusCode::CONFLICT,
                serde_json::json!({ "error": self.to_string() }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
