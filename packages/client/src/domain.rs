//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use listening_room_server::infrastructure::dto::websocket::{InboundFrame, MessageType};
use serde_json::json;

use crate::error::ClientError;

/// Who this client is and which room it sits in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub room_id: String,
    pub user_id: String,
    pub username: String,
}

impl ClientIdentity {
    /// Prompt shown in front of the input line
    pub fn prompt(&self) -> String {
        format!("{}@{}> ", self.username, self.room_id)
    }

    /// Frame that (re-)joins the room
    pub fn join_frame(&self) -> InboundFrame {
        InboundFrame {
            room_id: Some(self.room_id.clone()),
            user_id: Some(self.user_id.clone()),
            username: Some(self.username.clone()),
            ..InboundFrame::of_type(MessageType::Join)
        }
    }

    /// Frame that leaves the room
    pub fn leave_frame(&self) -> InboundFrame {
        InboundFrame {
            room_id: Some(self.room_id.clone()),
            user_id: Some(self.user_id.clone()),
            ..InboundFrame::of_type(MessageType::Leave)
        }
    }

    fn room_frame(&self, r#type: MessageType) -> InboundFrame {
        InboundFrame {
            room_id: Some(self.room_id.clone()),
            ..InboundFrame::of_type(r#type)
        }
    }
}

/// What to do with one line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum ClientAction {
    /// Send the frame and keep the session open
    Send(InboundFrame),
    /// Send `leave` and end the session without reconnecting
    Quit,
}

/// Map one input line to an action.
///
/// Plain text is a chat message. Slash commands:
/// `/play [ms]`, `/pause [ms]`, `/seek <ms>`, `/add <title> [- artist]`,
/// `/leave` and `/quit`.
///
/// # Arguments
///
/// * `line` - The trimmed, non-empty input line
/// * `identity` - The current user and room
/// * `now_millis` - Current time, used to derive ids for added tracks
pub fn parse_input_line(
    line: &str,
    identity: &ClientIdentity,
    now_millis: i64,
) -> Result<ClientAction, ClientError> {
    let Some(command_line) = line.strip_prefix('/') else {
        return Ok(ClientAction::Send(InboundFrame {
            user_id: Some(identity.user_id.clone()),
            username: Some(identity.username.clone()),
            message: Some(line.to_string()),
            ..identity.room_frame(MessageType::Chat)
        }));
    };

    let (command, rest) = match command_line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (command_line, ""),
    };

    let action = match command {
        "play" => ClientAction::Send(InboundFrame {
            current_time: parse_optional_millis(rest)?,
            ..identity.room_frame(MessageType::Play)
        }),
        "pause" => ClientAction::Send(InboundFrame {
            current_time: parse_optional_millis(rest)?,
            ..identity.room_frame(MessageType::Pause)
        }),
        "seek" => {
            let millis = parse_optional_millis(rest)?
                .ok_or_else(|| ClientError::InvalidInput("usage: /seek <ms>".to_string()))?;
            ClientAction::Send(InboundFrame {
                current_time: Some(millis),
                ..identity.room_frame(MessageType::Seek)
            })
        }
        "add" => {
            let track = parse_track(rest, identity, now_millis)?;
            ClientAction::Send(InboundFrame {
                track: Some(track),
                ..identity.room_frame(MessageType::AddTrack)
            })
        }
        "leave" => ClientAction::Send(identity.leave_frame()),
        "quit" => ClientAction::Quit,
        other => {
            return Err(ClientError::InvalidInput(format!(
                "unknown command '/{}'",
                other
            )));
        }
    };
    Ok(action)
}

fn parse_optional_millis(value: &str) -> Result<Option<f64>, ClientError> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(millis) if millis.is_finite() && millis >= 0.0 => Ok(Some(millis)),
        _ => Err(ClientError::InvalidInput(format!(
            "'{}' is not a position in milliseconds",
            value
        ))),
    }
}

/// `<title> [- artist]` → track object
fn parse_track(
    value: &str,
    identity: &ClientIdentity,
    now_millis: i64,
) -> Result<serde_json::Value, ClientError> {
    let (title, artist) = match value.split_once(" - ") {
        Some((title, artist)) => (title.trim(), Some(artist.trim())),
        None => (value.trim(), None),
    };
    if title.is_empty() {
        return Err(ClientError::InvalidInput(
            "usage: /add <title> [- artist]".to_string(),
        ));
    }

    let mut track = json!({
        "id": format!("{}-{}", identity.user_id, now_millis),
        "name": title,
    });
    if let Some(artist) = artist.filter(|artist| !artist.is_empty()) {
        track["artist"] = json!(artist);
    }
    Ok(track)
}

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if retrying cannot help (e.g., the URL itself is invalid),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
///
/// # Returns
///
/// `true` if reconnection should be attempted, `false` otherwise
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}
