//! Public API surface of the edge proxy.
//!
//! Preflight negotiation and 404s are answered before any business logic;
//! everything else forwards through the retrying proxy.

pub mod ai;
pub mod workflow;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::options;
use axum::Router;

use tandem_core::upstream::UpstreamReply;

use crate::state::AppState;

/// Build the complete API router with all sub-routes.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(ai::router())
        .merge(workflow::router())
        // Preflight for any other path under the API namespace
        .route("/api/{*path}", options(preflight))
}

/// `OPTIONS` under `/api/*`: empty success before any business logic.
/// The cross-origin headers are stamped by the response layers.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Anything outside the recognized API namespace.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({ "error": "Not found" })),
    )
        .into_response()
}

/// Re-wrap an upstream reply verbatim: same status, same body.
pub(crate) fn upstream_response(reply: UpstreamReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}
