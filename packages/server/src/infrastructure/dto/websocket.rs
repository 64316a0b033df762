//! WebSocket message DTOs.
//!
//! Inbound frames are a flat object with optional fields; outbound frames are
//! internally tagged by `type`. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::config::FrameLimits;

/// Frame type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Join,
    Leave,
    Chat,
    Play,
    Pause,
    Seek,
    AddTrack,
    SyncState,
    /// Any other string tag
    #[serde(other)]
    Unknown,
}

/// Frame sent by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundFrame {
    pub r#type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<serde_json::Value>,
    /// Playhead position in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<f64>,
}

impl InboundFrame {
    /// Frame with only the type tag set.
    pub fn of_type(r#type: MessageType) -> Self {
        Self {
            r#type,
            room_id: None,
            user_id: None,
            username: None,
            message: None,
            track: None,
            current_time: None,
        }
    }

    /// Clamp the untrusted free-text fields to their configured length.
    ///
    /// Lengths are counted in chars, so truncation never splits a code point.
    pub fn sanitize(mut self, limits: &FrameLimits) -> Self {
        self.message = self
            .message
            .map(|message| truncate_chars(message, limits.max_chat_chars));
        self.username = self
            .username
            .map(|username| truncate_chars(username, limits.max_username_chars));
        self
    }
}

fn truncate_chars(value: String, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut value = value;
            value.truncate(byte_index);
            value
        }
        None => value,
    }
}

/// Participant entry of a room snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub id: String,
    pub username: String,
}

/// Full room state sent to a joiner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_track: Option<serde_json::Value>,
    pub queue: Vec<serde_json::Value>,
    pub is_playing: bool,
    pub current_time: f64,
    pub participants: Vec<ParticipantInfo>,
}

/// Frame sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum OutboundMessage {
    SyncState {
        room: RoomSnapshot,
    },
    Join {
        user_id: String,
        username: String,
    },
    Leave {
        user_id: String,
        username: String,
    },
    Chat {
        user_id: String,
        username: String,
        message: String,
        /// Unix timestamp when the server relayed the message (milliseconds)
        timestamp: i64,
    },
    Play {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_track: Option<serde_json::Value>,
        current_time: f64,
    },
    Pause {
        current_time: f64,
    },
    Seek {
        current_time: f64,
    },
    AddTrack {
        track: serde_json::Value,
    },
}
