//! # parley-server
//!
//! Axum HTTP + `WebSocket` server for the Q&A relay.
//!
//! - HTTP endpoint: `GET /` liveness status
//! - `WebSocket` gateway: connection registry, per-session frame dispatch
//! - Per-session relay: validate, acknowledge with a status frame, answer
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod server;
pub mod shutdown;
pub mod status;
pub mod websocket;

pub use config::ServerConfig;
pub use server::RelayServer;
pub use shutdown::Shutdown;
