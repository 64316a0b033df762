//! WebSocket client session management.

use futures_util::{Sink, SinkExt, StreamExt};
use listening_room_server::infrastructure::dto::websocket::{InboundFrame, OutboundMessage};
use listening_room_shared::time::get_timestamp;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    domain::{ClientAction, ClientIdentity, parse_input_line},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Run one WebSocket client session
///
/// Joins the room right after connecting, so a reconnect re-joins.
///
/// # Returns
///
/// * `Ok(())` - The user quit (`/quit`, Ctrl+C or Ctrl+D)
/// * `Err(ClientError)` - The connection could not be opened or was lost
pub async fn run_client_session(
    url: &str,
    identity: &ClientIdentity,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Url(e) => ClientError::InvalidUrl(format!("{}: {}", url, e)),
        e => ClientError::ConnectionError(e.to_string()),
    })?;

    tracing::info!("Connected to listening room server!");
    println!(
        "\nYou are '{}' in room '{}'. Type to chat, /play /pause /seek /add /leave /quit to control.\n",
        identity.username, identity.room_id
    );

    let (mut write, mut read) = ws_stream.split();
    send_frame(&mut write, &identity.join_frame()).await?;

    // Spawn a task to handle incoming messages
    let current_user_id = identity.user_id.clone();
    let prompt = identity.prompt();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<OutboundMessage>(text.as_str()) {
                        Ok(message) => MessageFormatter::format_event(&message, &current_user_id),
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&prompt);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let prompt = identity.prompt();
    let result = loop {
        tokio::select! {
            _ = &mut read_task => {
                break Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // The input thread ended (Ctrl+C / Ctrl+D)
                    break quit(&mut write, identity).await;
                };

                match parse_input_line(&line, identity, get_timestamp()) {
                    Ok(ClientAction::Send(frame)) => {
                        if let Err(e) = send_frame(&mut write, &frame).await {
                            break Err(e);
                        }
                    }
                    Ok(ClientAction::Quit) => break quit(&mut write, identity).await,
                    Err(e) => {
                        println!("{}", e);
                        redisplay_prompt(&prompt);
                    }
                }
            }
        }
    };

    read_task.abort();
    result
}

async fn send_frame<S>(write: &mut S, frame: &InboundFrame) -> Result<(), ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(frame)
        .map_err(|e| ClientError::ConnectionError(format!("Failed to serialize frame: {}", e)))?;
    write.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::warn!("Failed to send frame: {}", e);
        ClientError::ConnectionError(e.to_string())
    })
}

/// Leave the room and close the socket; failures here no longer matter
async fn quit<S>(write: &mut S, identity: &ClientIdentity) -> Result<(), ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    if send_frame(write, &identity.leave_frame()).await.is_ok() {
        write.send(Message::Close(None)).await.ok();
    }
    Ok(())
}
