//! # parleyd
//!
//! Q&A relay server binary — wires the completion client to the
//! HTTP/WebSocket server and runs until interrupted.

#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_llm::{CompletionClient, CompletionConfig, CompletionRelay, DEFAULT_MODEL};
use parley_server::config::ServerConfig;
use parley_server::server::RelayServer;

/// Q&A relay server.
#[derive(Parser, Debug)]
#[command(name = "parleyd", about = "Q&A relay server")]
struct Cli {
    /// Host to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Completion model.
    #[arg(long, env = "MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Completion API base URL override.
    #[arg(long, env = "API_BASE_URL")]
    base_url: Option<String>,

    /// Maximum concurrent WebSocket connections.
    #[arg(long, default_value_t = 50)]
    max_connections: usize,
}

/// Read the provider API key from the environment.
///
/// `GROQ_API_KEY` wins; `API_KEY` is accepted as a fallback.
fn api_key_from_env() -> Result<String> {
    std::env::var("GROQ_API_KEY")
        .or_else(|_| std::env::var("API_KEY"))
        .context("GROQ_API_KEY (or API_KEY) must be set")
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    let api_key = api_key_from_env()?;

    let client = CompletionClient::new(CompletionConfig {
        api_key,
        model: args.model,
        base_url: args.base_url,
    });
    let relay = Arc::new(CompletionRelay::new(Arc::new(client)));

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        max_connections: args.max_connections,
        ..ServerConfig::default()
    };
    let server = RelayServer::new(config, relay);

    let (addr, handle) = server.listen().await.context("Failed to bind server")?;
    tracing::info!("listening on http://{addr}");

    shutdown_signal().await;

    tracing::info!("shutting down...");
    server.shutdown().trigger();
    let _ = handle.await;

    tracing::info!("shutdown complete");
    Ok(())
}
