//! WebSocket session lifecycle — handles a single connected client from
//! upgrade through disconnect.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use parley_core::{replies, ServerFrame};

use crate::server::AppState;

use super::connection::ClientConnection;
use super::handler::{dispatch, Dispatch};

/// Run a WebSocket session for a connected client.
///
/// 1. Registers the connection with the gateway
/// 2. Forwards queued frames to the socket via the outbound task
/// 3. Dispatches incoming text frames: validate, acknowledge, relay, answer
/// 4. Cleans up on disconnect or shutdown
///
/// Questions are handled one at a time in arrival order; a second question
/// from the same client waits until the first answer frame is queued.
#[instrument(skip_all, fields(client_id = %client_id))]
pub async fn run_ws_session(ws: WebSocket, client_id: String, state: AppState) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    let (send_tx, mut send_rx) = mpsc::channel::<ServerFrame>(state.config.send_queue_capacity);
    let connection = Arc::new(ClientConnection::new(client_id.clone(), send_tx));
    state.gateway.add(connection.clone());

    info!(connections = state.gateway.count(), "client connected");

    let shutdown = state.shutdown_token.clone();

    // Outbound forwarder: serializes frames and writes them to the socket.
    // On shutdown it sends a Close frame so clients see a clean goodbye.
    let writer_shutdown = shutdown.clone();
    let outbound = tokio::spawn(async move {
        loop {
            tokio::select! {
                frame = send_rx.recv() => {
                    let Some(frame) = frame else { break };
                    let json = match serde_json::to_string(&frame) {
                        Ok(json) => json,
                        Err(e) => {
                            error!(error = %e, "failed to serialize outbound frame");
                            continue;
                        }
                    };
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                () = writer_shutdown.cancelled() => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    loop {
        let msg = tokio::select! {
            msg = ws_rx.next() => msg,
            () = shutdown.cancelled() => {
                debug!("session ending for shutdown");
                break;
            }
        };

        let Some(Ok(msg)) = msg else { break };

        let text = match msg {
            Message::Text(ref t) => t.to_string(),
            Message::Binary(ref data) => match std::str::from_utf8(data) {
                Ok(s) => s.to_string(),
                Err(_) => {
                    debug!(len = data.len(), "ignoring non-UTF8 binary frame");
                    continue;
                }
            },
            Message::Close(_) => {
                info!("client sent close frame");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        match dispatch(&client_id, &text) {
            Dispatch::Reply(frame) => {
                if !connection.send(frame) {
                    warn!("failed to enqueue reply (channel full or closed)");
                }
            }
            Dispatch::Relay { question } => {
                let _ = connection.send(ServerFrame::Status(replies::THINKING.into()));

                // Panic boundary: a panicking relay task must not take the
                // session down with it.
                let relay = state.relay.clone();
                let answer = match tokio::spawn(async move { relay.answer(&question).await }).await
                {
                    Ok(answer) => answer,
                    Err(e) => {
                        error!(error = %e, "relay task failed");
                        replies::UNEXPECTED_ERROR.to_string()
                    }
                };

                if !connection.send(ServerFrame::Answer(answer)) {
                    warn!("failed to enqueue answer (channel full or closed)");
                }
            }
            Dispatch::Ignore => {}
        }
    }

    let _ = state.gateway.remove(&client_id);
    outbound.abort();
    info!(
        dropped = connection.drop_count(),
        duration_secs = connection.age().as_secs(),
        "client disconnected"
    );
}

#[cfg(test)]
mod tests {
    // Session behavior requires actual WebSocket connections and is
    // covered by integration tests in tests/integration.rs. Frame
    // classification is unit-tested in handler.rs.
}
