//! Room commands.
//!
//! A closed set of validated inbound operations. Every required field is
//! already present and typed; frames that could not be turned into a command
//! never reach the coordinator.

use super::{ChatText, MediaItem, PlaybackPosition, RoomId, UserId, Username};

#[derive(Debug, Clone, PartialEq)]
pub enum RoomCommand {
    Join {
        room_id: RoomId,
        user_id: UserId,
        username: Username,
    },
    Leave {
        room_id: RoomId,
        user_id: UserId,
    },
    Chat {
        room_id: RoomId,
        user_id: UserId,
        username: Username,
        message: ChatText,
    },
    Play {
        room_id: RoomId,
        track: Option<MediaItem>,
        current_time: Option<PlaybackPosition>,
    },
    Pause {
        room_id: RoomId,
        current_time: Option<PlaybackPosition>,
    },
    Seek {
        room_id: RoomId,
        current_time: PlaybackPosition,
    },
    AddTrack {
        room_id: RoomId,
        track: MediaItem,
    },
    /// A well-formed frame whose type tag is not an inbound operation.
    Unknown,
}

impl RoomCommand {
    /// Wire name of the command, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::Chat { .. } => "chat",
            Self::Play { .. } => "play",
            Self::Pause { .. } => "pause",
            Self::Seek { .. } => "seek",
            Self::AddTrack { .. } => "add_track",
            Self::Unknown => "unknown",
        }
    }
}
