//! Shared application state for the axum server.

use std::sync::Arc;

use tandem_core::{Config, RetryingProxy};

/// Shared state accessible by all API handlers.
pub struct AppStateInner {
    pub config: Config,
    pub proxy: RetryingProxy,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    pub fn new(config: Config) -> Self {
        Self {
            proxy: RetryingProxy::new(&config),
            config,
        }
    }
}
