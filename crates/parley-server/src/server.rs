//! `RelayServer` — Axum HTTP + WebSocket server.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use parley_llm::AnswerSource;

use crate::config::ServerConfig;
use crate::shutdown::Shutdown;
use crate::status::{self, StatusResponse};
use crate::websocket::session::run_ws_session;
use crate::websocket::Gateway;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Connection registry.
    pub gateway: Arc<Gateway>,
    /// Answer source shared by all sessions.
    pub relay: Arc<dyn AnswerSource>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Shutdown token cloned into every session.
    pub shutdown_token: CancellationToken,
}

/// The relay server: one liveness route plus the WebSocket gateway.
pub struct RelayServer {
    config: Arc<ServerConfig>,
    gateway: Arc<Gateway>,
    relay: Arc<dyn AnswerSource>,
    shutdown: Arc<Shutdown>,
}

impl RelayServer {
    /// Create a new server around an answer source.
    pub fn new(config: ServerConfig, relay: Arc<dyn AnswerSource>) -> Self {
        Self {
            config: Arc::new(config),
            gateway: Arc::new(Gateway::new()),
            relay,
            shutdown: Arc::new(Shutdown::new()),
        }
    }

    /// Build the Axum router with all routes.
    ///
    /// CORS is fully permissive: browser clients connect from arbitrary
    /// origins.
    pub fn router(&self) -> Router {
        let state = AppState {
            gateway: self.gateway.clone(),
            relay: self.relay.clone(),
            config: self.config.clone(),
            shutdown_token: self.shutdown.token(),
        };

        Router::new()
            .route("/", get(status_handler))
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind the configured address and serve until shutdown is triggered.
    ///
    /// Returns the bound address (useful with port `0`) and the serve task
    /// handle. The task drains once [`Shutdown::trigger`] fires.
    pub async fn listen(&self) -> io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;

        let app = self.router();
        let token = self.shutdown.token();
        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(token.cancelled_owned())
                .await;
            if let Err(e) = served {
                error!(error = %e, "server error");
            }
        });

        info!(%addr, "listening");
        Ok((addr, handle))
    }

    /// Get the connection registry.
    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// Get the shutdown signal.
    pub fn shutdown(&self) -> &Arc<Shutdown> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET /
async fn status_handler() -> Json<StatusResponse> {
    Json(status::server_status())
}

/// GET /ws — WebSocket upgrade.
///
/// Refused with 503 when the connection limit is reached; the limit is
/// checked before the upgrade so the client sees a plain HTTP error.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    if state.gateway.count() >= state.config.max_connections {
        warn!(
            max_connections = state.config.max_connections,
            "connection limit reached, refusing upgrade"
        );
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let client_id = format!("conn_{}", Uuid::now_v7());
    ws.max_message_size(state.config.max_message_size)
        .on_upgrade(move |socket| run_ws_session(socket, client_id, state))
}
