//! Process-wide configuration, read from the environment once at startup.

use std::time::Duration;

/// Immutable configuration for the proxy and its clients.
///
/// The upstream credential is the only value without a default; its absence
/// is tolerated at load time and rejected per request, so the server can
/// still start (and report a clear 500) in an unconfigured environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream generation endpoint.
    pub upstream_url: String,
    /// Upstream bearer credential. Required, no default.
    pub api_key: Option<String>,
    /// Upstream model identifier.
    pub model: String,
    /// Fixed timeout for one upstream request.
    pub upstream_timeout: Duration,
    /// Base URL where the proxy's public surface is reachable
    /// (used by `ApiClient` / the CLI, not by the server itself).
    pub api_base_url: String,
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("GROQ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Self {
            upstream_url: std::env::var("GROQ_API_URL")
                .unwrap_or_else(|_| "https://api.groq.ai/v1/generate".to_string()),
            api_key: std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("GROQ_MODEL").unwrap_or_else(|_| "groq-1".to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            api_base_url: std::env::var("TANDEM_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: "https://api.groq.ai/v1/generate".to_string(),
            api_key: None,
            model: "groq-1".to_string(),
            upstream_timeout: Duration::from_secs(30),
            api_base_url: "http://localhost:8000".to_string(),
        }
    }
}
