//! Tandem Core — transport-agnostic domain logic for the tandem proxy.
//!
//! This crate contains the upstream client, the retrying proxy, the
//! public-surface API client, and the timeline state machine. It has
//! **no HTTP framework dependency** by default, making it suitable for:
//!
//! - HTTP servers (via `tandem-server`)
//! - CLI tools
//! - Embedding in other display layers
//!
//! # Feature Flags
//!
//! - `axum` — Enables `IntoResponse` impl on `ProxyError` for use in axum handlers.

pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod models;
pub mod proxy;
pub mod runner;
pub mod store;
pub mod upstream;

// Convenience re-exports
pub use client::ApiClient;
pub use config::Config;
pub use error::ProxyError;
pub use models::{TimelineEntry, WorkflowKind};
pub use proxy::RetryingProxy;
pub use runner::WorkflowRunner;
pub use store::TimelineStore;
