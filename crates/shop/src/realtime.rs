//! Real-time notification channel.
//!
//! A WebSocket endpoint on the same listener as the HTTP routes. Clients
//! connect, the server logs the connection and drains incoming frames until
//! the peer goes away. No message protocol is defined yet.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;

/// Upgrade an HTTP request to a WebSocket connection.
pub async fn upgrade(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(handle)
}

async fn handle(mut socket: WebSocket) {
    tracing::info!("realtime client connected");

    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Close(_) => break,
            other => tracing::debug!(?other, "ignoring realtime frame"),
        }
    }

    tracing::debug!("realtime client disconnected");
}
