//! Axum WebSocket upgrade handler.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// Upgrades any HTTP request to a WebSocket connection.
///
/// Requests without a valid upgrade handshake are rejected by the
/// extractor before this runs.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let message_log = Arc::clone(&state.message_log);

    ws.on_failed_upgrade(move |err| {
        tracing::debug!(%peer, error = %err, "ws upgrade failed");
    })
    .on_upgrade(move |socket| run_connection(socket, message_log, peer))
}
