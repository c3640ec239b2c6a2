//! `WebSocket` frame stream for the renderer.
//!
//! Clients connect to `GET /ws/frames`. On connect they receive the latest
//! published [`Frame`] (if any), then one JSON frame per tick from the
//! broadcast channel. A client that falls behind skips to the newest frame.
//!
//! The socket is also an input channel: a text message carrying a pointer
//! payload (the same JSON accepted by `POST /api/input/pointer`) moves the
//! pointer without a separate HTTP round trip.
//!
//! [`Frame`]: pursuit_types::Frame

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::input::{PointerRequest, resolve_pointer};
use crate::state::AppState;

/// Upgrade to a `WebSocket` and start streaming frames.
///
/// # Route
///
/// `GET /ws/frames`
pub async fn ws_frames(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("Frame stream client connected");

    // Subscribe before reading the snapshot so no tick falls in between.
    let mut rx = state.subscribe();

    let latest = state.snapshot.read().await.frame.clone();
    if let Some(frame) = latest {
        if send_json(&mut socket, &frame).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            result = rx.recv() => match result {
                Ok(frame) => {
                    if send_json(&mut socket, &frame).await.is_err() {
                        debug!("Frame stream client disconnected (send failed)");
                        return;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Frame stream client lagged, skipping ahead");
                }
                Err(RecvError::Closed) => {
                    debug!("Frame channel closed, closing socket");
                    return;
                }
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => apply_pointer_message(&state, text.as_str()).await,
                Some(Ok(Message::Ping(data))) => {
                    if socket.send(Message::Pong(data)).await.is_err() {
                        return;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Frame stream client disconnected");
                    return;
                }
                Some(Err(e)) => {
                    debug!(error = %e, "Frame stream socket error");
                    return;
                }
                Some(Ok(_)) => {}
            },
        }
    }
}

async fn send_json<T: serde::Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), ()> {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "Failed to serialize frame");
            return Ok(());
        }
    };
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| debug!(error = %e, "Socket send failed"))
}

async fn apply_pointer_message(state: &AppState, text: &str) {
    let Some(operator) = state.operator_state.as_ref() else {
        return;
    };
    let request: PointerRequest = match serde_json::from_str(text) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Ignoring unrecognized socket message");
            return;
        }
    };
    let board = state.snapshot.read().await.board;
    match resolve_pointer(&request, &board) {
        Ok(position) => operator.set_pointer(position),
        Err(e) => debug!(error = %e, "Ignoring invalid pointer message"),
    }
}
