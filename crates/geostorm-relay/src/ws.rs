//! `WebSocket` handler for the sensor/viewer relay.
//!
//! Clients connect to `GET /ws`. The `User-Agent` header decides the
//! role: browsers (anything announcing the viewer marker) are viewers,
//! everything else is the sensor. Text and binary frames are forwarded
//! untouched to the current holder of the opposite role, or dropped when
//! there is none.
//!
//! Each connection gets a writer task fed by an unbounded queue, so a
//! forward never waits on the receiving socket. Frames from a connection
//! that has been replaced are dropped. The writer closes the socket once
//! its queue is gone, which completes the close handshake.

use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use geostorm_types::{ClientRole, ConnectionId};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::state::RelayState;

/// Close code sent to a connection whose role slot was taken over.
pub const REPLACED_CLOSE_CODE: u16 = 4000;

/// Close reason sent alongside [`REPLACED_CLOSE_CODE`].
pub const REPLACED_CLOSE_REASON: &str = "replaced";

/// Upgrade an HTTP request to a relay connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_relay(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<Arc<RelayState>>,
) -> impl IntoResponse {
    let user_agent = headers.get(USER_AGENT).and_then(|value| value.to_str().ok());
    let role = state.classify(user_agent);
    ws.on_upgrade(move |socket| handle_ws(socket, role, state))
}

/// Handle one relay connection from slot install to release.
async fn handle_ws(socket: WebSocket, role: ClientRole, state: Arc<RelayState>) {
    let id = ConnectionId::new();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    if let Some(previous) = state.install(role, id, tx.clone()).await {
        info!(%role, connection = %id, replaced = %previous.id, "Replacing connection");
        let close = Message::Close(Some(CloseFrame {
            code: REPLACED_CLOSE_CODE,
            reason: REPLACED_CLOSE_REASON.into(),
        }));
        if previous.tx.send(close).is_err() {
            debug!(connection = %previous.id, "Replaced connection already gone");
        }
    } else {
        info!(%role, connection = %id, "Client connected");
    }

    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let closing = matches!(message, Message::Close(_));
            if sink.send(message).await.is_err() || closing {
                break;
            }
        }
        // Flushes any close reply queued by the reader.
        if let Err(e) = sink.close().await {
            debug!("WebSocket close failed: {e}");
        }
    });

    while let Some(result) = stream.next().await {
        let message = match result {
            Ok(message) => message,
            Err(e) => {
                debug!(%role, connection = %id, "WebSocket error: {e}");
                break;
            }
        };
        match message {
            Message::Text(_) | Message::Binary(_) => {
                if state.forward(role, id, message).await {
                    debug!(from = %role, "Message forwarded");
                }
            }
            // Pings are answered by the socket itself.
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => break,
        }
    }

    if state.release(role, id).await {
        info!(%role, connection = %id, "Client disconnected");
    } else {
        debug!(%role, connection = %id, "Replaced connection closed");
    }
    // The writer drains once the last queue handle is gone.
    drop(tx);
    if let Err(e) = writer.await {
        debug!(%role, connection = %id, "Writer task failed: {e}");
    }
}
