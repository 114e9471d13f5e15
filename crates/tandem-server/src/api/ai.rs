//! `POST /api/ai` — single-shot completion.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::Router;

use tandem_core::models::PromptRequest;
use tandem_core::ProxyError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/ai", post(completion).options(super::preflight))
}

/// Forward one completion request upstream and return the reply verbatim.
///
/// The body is decoded tolerantly: malformed or non-JSON input is treated
/// as the empty prompt rather than rejected.
async fn completion(State(state): State<AppState>, body: Bytes) -> Result<Response, ProxyError> {
    let request = PromptRequest::from_body(&body);
    let reply = state.proxy.forward(request.input_text(), None).await?;
    Ok(super::upstream_response(reply))
}
