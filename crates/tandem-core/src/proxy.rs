//! Retrying proxy — wraps the upstream client with bounded retry.
//!
//! Retry guards against transport flakiness only. A response actually
//! received from upstream, whatever its status, is the proxy's output and
//! is never retried: application-level errors are the caller's concern.

use std::time::Duration;

use crate::config::Config;
use crate::error::ProxyError;
use crate::upstream::{UpstreamCallError, UpstreamClient, UpstreamReply};

/// Total attempts per forwarded request.
const MAX_ATTEMPTS: u32 = 3;
/// Attempt `k` that fails transport-level is followed by `BACKOFF_STEP * k`.
const BACKOFF_STEP: Duration = Duration::from_millis(300);

pub struct RetryingProxy {
    upstream: UpstreamClient,
}

impl RetryingProxy {
    pub fn new(config: &Config) -> Self {
        Self {
            upstream: UpstreamClient::new(config),
        }
    }

    /// Forward one request upstream, retrying transport failures up to
    /// [`MAX_ATTEMPTS`] times with linear backoff between attempts.
    pub async fn forward(
        &self,
        input: &str,
        workflow: Option<&str>,
    ) -> Result<UpstreamReply, ProxyError> {
        let mut last_err = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            match self.upstream.send(input, workflow).await {
                Ok(reply) => {
                    if attempt > 1 {
                        tracing::info!("Upstream reachable again on attempt {}", attempt);
                    }
                    return Ok(reply);
                }
                Err(UpstreamCallError::Configuration(msg)) => {
                    return Err(ProxyError::Configuration(msg));
                }
                Err(UpstreamCallError::Transport(detail)) => {
                    tracing::warn!(
                        "Upstream attempt {}/{} failed: {}",
                        attempt,
                        MAX_ATTEMPTS,
                        detail
                    );
                    last_err = detail;
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(BACKOFF_STEP * attempt).await;
                    }
                }
            }
        }

        Err(ProxyError::Transport {
            attempts: MAX_ATTEMPTS,
            detail: last_err,
        })
    }
}
