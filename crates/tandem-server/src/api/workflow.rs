//! `POST /api/agents/workflow` — run a named agent chain.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::Router;

use tandem_core::models::PromptRequest;
use tandem_core::ProxyError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/agents/workflow",
        post(run_workflow).options(super::preflight),
    )
}

/// Forward a workflow request upstream and return the reply verbatim.
///
/// The workflow tag is passed through unvalidated; the backend owns the
/// recognized set and decides what an unknown kind means.
async fn run_workflow(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let request = PromptRequest::from_body(&body);
    let reply = state
        .proxy
        .forward(request.input_text(), request.workflow.as_deref())
        .await?;
    Ok(super::upstream_response(reply))
}
