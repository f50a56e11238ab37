//! Wert session server — signs widget sessions for NFT purchases paid in USDT.
//!
//! # Modules
//!
//! - [`config`] — Start-up configuration read from the environment ([`ServerConfig`](config::ServerConfig))
//! - [`routes`] — HTTP endpoints (session, webhook, health, metrics)
//! - [`state`] — Shared [`AppState`](state::AppState)
//! - [`error`] — Mapping of session failures to JSON error responses
//! - [`metrics`] — Prometheus counters for sessions and webhooks

pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::SessionError;
pub use state::AppState;
