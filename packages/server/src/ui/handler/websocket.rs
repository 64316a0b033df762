//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{mpsc, oneshot};

use crate::{
    config::FrameLimits,
    domain::{ConnectionId, RoomCommand},
    infrastructure::dto::websocket::InboundFrame,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Parse one inbound text frame into a room command.
///
/// Returns `None` for frames that are dropped without a reply: invalid JSON,
/// a missing or non-string `type`, or a known type with a required field
/// missing. Chat text and usernames are truncated before validation.
pub fn decode_frame(text: &str, limits: &FrameLimits) -> Option<RoomCommand> {
    let frame = match serde_json::from_str::<InboundFrame>(text) {
        Ok(frame) => frame.sanitize(limits),
        Err(e) => {
            tracing::debug!("Dropping malformed frame: {}", e);
            return None;
        }
    };

    let kind = frame.r#type;
    match RoomCommand::try_from(frame) {
        Ok(command) => Some(command),
        Err(e) => {
            tracing::debug!("Dropping incomplete {:?} frame: {}", kind, e);
            None
        }
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events fanned out by the
/// coordinator (via rx channel) are written to this client's WebSocket connection.
///
/// # Arguments
///
/// * `rx` - Channel receiver for serialized room events
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that reads frames from this client and dispatches them in arrival order.
///
/// `stop` is only checked while waiting for the next frame, so a frame that
/// is already being dispatched always runs to completion.
fn receiver_loop(
    mut receiver: futures_util::stream::SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    mut stop: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                _ = &mut stop => {
                    tracing::debug!("Writer for '{}' closed, stopping reader", connection_id);
                    break;
                }
                msg = receiver.next() => msg,
            };
            let Some(msg) = msg else {
                break;
            };

            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::trace!("Received text from '{}': {}", connection_id, text);
                    if let Some(command) = decode_frame(text.as_str(), &state.frame_limits) {
                        state.coordinator.dispatch(connection_id, command).await;
                    }
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();

    // Create a channel for this connection to receive room events
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.coordinator.open_connection(tx).await;

    let (stop_tx, stop_rx) = oneshot::channel();
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receiver_loop(receiver, state.clone(), connection_id, stop_rx);

    let writer_closed = tokio::select! {
        _ = &mut recv_task => false,
        _ = &mut send_task => true,
    };

    if writer_closed {
        // The reader is never aborted; it stops before its next frame
        stop_tx.send(()).ok();
        if let Err(e) = recv_task.await {
            tracing::warn!("Reader for '{}' ended abnormally: {}", connection_id, e);
        }
    } else {
        send_task.abort();
    }

    state.coordinator.close_connection(&connection_id).await;
}
