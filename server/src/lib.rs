//! # complyr-server
//!
//! The `policy-evaluate` HTTP service and the pieces the `complyr` binary
//! is assembled from: TOML configuration, the axum router, one-shot file
//! evaluation and the built-in reference scenarios.

pub mod cli;
pub mod config;
pub mod routes;
pub mod scenarios;

pub use config::ServerConfig;
pub use routes::{router, serve, AppState};
