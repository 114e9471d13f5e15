//! Upstream client — one normalized request to the generation API.
//!
//! The client owns the fixed timeout and bearer-credential injection. It
//! performs exactly one outbound call per invocation; retry lives in
//! [`crate::proxy::RetryingProxy`].

use serde::Serialize;

use crate::config::Config;

/// Fixed generation parameters; not user-controlled.
const MAX_OUTPUT_TOKENS: u32 = 128;
const TEMPERATURE: f64 = 0.2;

/// A response actually received from upstream, success or error status.
/// Passed through verbatim to the public surface's caller.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

/// Failure modes of a single upstream call.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamCallError {
    /// Credential missing; detected before any network call.
    #[error("{0}")]
    Configuration(String),

    /// Network-level failure (connect, timeout, read).
    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Serialize)]
struct UpstreamPayload<'a> {
    model: &'a str,
    input: &'a str,
    max_output_tokens: u32,
    temperature: f64,
    /// Pass-through: the backend decides whether the kind is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    workflow: Option<&'a str>,
}

pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.upstream_timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            url: config.upstream_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Send one generation request.
    ///
    /// Any HTTP response — success or error status — is returned as an
    /// [`UpstreamReply`]; only transport-level failures are errors.
    pub async fn send(
        &self,
        input: &str,
        workflow: Option<&str>,
    ) -> Result<UpstreamReply, UpstreamCallError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            UpstreamCallError::Configuration("no credential in the environment".to_string())
        })?;

        let payload = UpstreamPayload {
            model: &self.model,
            input,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
            workflow,
        };

        tracing::debug!("Upstream request: {} (model: {})", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| UpstreamCallError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamCallError::Transport(e.to_string()))?;

        Ok(UpstreamReply { status, body })
    }
}
