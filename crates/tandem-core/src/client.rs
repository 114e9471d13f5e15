//! Public-surface API client — the consumer-side binding of the proxy.
//!
//! This is what a display layer (or the CLI) uses to talk to a running
//! proxy: two typed calls with consistent error normalization, so every
//! failure surfaces as a human-readable message.

use std::time::Duration;

use serde_json::json;

use crate::config::Config;
use crate::error::ProxyError;
use crate::models::{AiReply, WorkflowKind, WorkflowReply};

const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.api_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(CLIENT_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Single-shot completion: `POST /api/ai`.
    pub async fn call_ai(&self, prompt: &str) -> Result<AiReply, ProxyError> {
        let body = self
            .post_json("/api/ai", json!({ "prompt": prompt }))
            .await?;
        serde_json::from_str(&body)
            .map_err(|e| ProxyError::Api(format!("Unexpected response shape: {}", e)))
    }

    /// Run a named workflow: `POST /api/agents/workflow`.
    pub async fn run_workflow(
        &self,
        prompt: &str,
        workflow: &WorkflowKind,
    ) -> Result<WorkflowReply, ProxyError> {
        let body = self
            .post_json(
                "/api/agents/workflow",
                json!({ "prompt": prompt, "workflow": workflow.as_str() }),
            )
            .await?;
        serde_json::from_str(&body)
            .map_err(|e| ProxyError::Api(format!("Unexpected response shape: {}", e)))
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<String, ProxyError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProxyError::Api(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProxyError::Api(e.to_string()))?;

        if status.is_success() {
            return Ok(text);
        }

        Err(ProxyError::Api(normalize_error_body(status.as_u16(), &text)))
    }
}

/// Extract a human-readable message from an HTTP error body: the `detail`
/// or `error` field when the body is JSON, otherwise the raw body.
fn normalize_error_body(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str().map(|s| s.to_string()))
        })
        .unwrap_or_else(|| body.to_string());

    format!("API returned {}: {}", status, message)
}
