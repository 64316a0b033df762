//! Conversion logic between DTOs and the domain model.

use listening_room_shared::time::timestamp_to_rfc3339;
use thiserror::Error;

use crate::domain::{
    DomainError, MediaItem, Participant, PlaybackPosition, Room, RoomCommand, RoomEvent,
};
use crate::infrastructure::dto::{
    http::{ParticipantDetailDto, RoomDetailDto, RoomSummaryDto},
    websocket::{InboundFrame, MessageType, OutboundMessage, ParticipantInfo, RoomSnapshot},
};

/// Why an inbound frame could not become a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Required string field; empty strings count as missing.
fn required<T>(value: Option<String>, field: &'static str) -> Result<T, FrameError>
where
    T: TryFrom<String, Error = DomainError>,
{
    let value = value
        .filter(|value| !value.is_empty())
        .ok_or(FrameError::MissingField(field))?;
    Ok(T::try_from(value)?)
}

fn optional_position(value: Option<f64>) -> Result<Option<PlaybackPosition>, FrameError> {
    Ok(value.map(PlaybackPosition::new).transpose()?)
}

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<InboundFrame> for RoomCommand {
    type Error = FrameError;

    fn try_from(frame: InboundFrame) -> Result<Self, Self::Error> {
        let command = match frame.r#type {
            MessageType::Join => RoomCommand::Join {
                room_id: required(frame.room_id, "roomId")?,
                user_id: required(frame.user_id, "userId")?,
                username: required(frame.username, "username")?,
            },
            MessageType::Leave => RoomCommand::Leave {
                room_id: required(frame.room_id, "roomId")?,
                user_id: required(frame.user_id, "userId")?,
            },
            MessageType::Chat => RoomCommand::Chat {
                room_id: required(frame.room_id, "roomId")?,
                user_id: required(frame.user_id, "userId")?,
                username: required(frame.username, "username")?,
                message: required(frame.message, "message")?,
            },
            MessageType::Play => RoomCommand::Play {
                room_id: required(frame.room_id, "roomId")?,
                track: frame.track.map(MediaItem::new),
                current_time: optional_position(frame.current_time)?,
            },
            MessageType::Pause => RoomCommand::Pause {
                room_id: required(frame.room_id, "roomId")?,
                current_time: optional_position(frame.current_time)?,
            },
            MessageType::Seek => RoomCommand::Seek {
                room_id: required(frame.room_id, "roomId")?,
                current_time: optional_position(frame.current_time)?
                    .ok_or(FrameError::MissingField("currentTime"))?,
            },
            MessageType::AddTrack => RoomCommand::AddTrack {
                room_id: required(frame.room_id, "roomId")?,
                track: frame
                    .track
                    .map(MediaItem::new)
                    .ok_or(FrameError::MissingField("track"))?,
            },
            // sync_state is server-to-client only
            MessageType::SyncState | MessageType::Unknown => RoomCommand::Unknown,
        };
        Ok(command)
    }
}

// ========================================
// Domain → DTO (WebSocket)
// ========================================

impl From<&Participant> for ParticipantInfo {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.user_id.as_str().to_string(),
            username: participant.username.as_str().to_string(),
        }
    }
}

impl From<&Room> for RoomSnapshot {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            name: room.name.clone(),
            current_track: room.current_track.as_ref().map(|t| t.as_value().clone()),
            queue: room.queue.iter().map(|t| t.as_value().clone()).collect(),
            is_playing: room.is_playing,
            current_time: room.current_time.millis(),
            participants: room.participants.iter().map(ParticipantInfo::from).collect(),
        }
    }
}

impl From<&RoomEvent> for OutboundMessage {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::SyncState(room) => OutboundMessage::SyncState { room: room.into() },
            RoomEvent::Joined { user_id, username } => OutboundMessage::Join {
                user_id: user_id.as_str().to_string(),
                username: username.as_str().to_string(),
            },
            RoomEvent::Left { user_id, username } => OutboundMessage::Leave {
                user_id: user_id.as_str().to_string(),
                username: username.as_str().to_string(),
            },
            RoomEvent::Chat {
                user_id,
                username,
                message,
                sent_at,
            } => OutboundMessage::Chat {
                user_id: user_id.as_str().to_string(),
                username: username.as_str().to_string(),
                message: message.as_str().to_string(),
                timestamp: sent_at.value(),
            },
            RoomEvent::Played {
                current_track,
                current_time,
            } => OutboundMessage::Play {
                current_track: current_track.as_ref().map(|t| t.as_value().clone()),
                current_time: current_time.millis(),
            },
            RoomEvent::Paused { current_time } => OutboundMessage::Pause {
                current_time: current_time.millis(),
            },
            RoomEvent::Seeked { current_time } => OutboundMessage::Seek {
                current_time: current_time.millis(),
            },
            RoomEvent::TrackAdded { track } => OutboundMessage::AddTrack {
                track: track.as_value().clone(),
            },
        }
    }
}

// ========================================
// Domain → DTO (HTTP)
// ========================================

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            name: room.name.clone(),
            participants: room
                .participants
                .iter()
                .map(|p| p.user_id.as_str().to_string())
                .collect(),
            queue_length: room.queue.len(),
            is_playing: room.is_playing,
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            name: room.name.clone(),
            creator_id: room.creator_id.as_str().to_string(),
            current_track: room.current_track.as_ref().map(|t| t.as_value().clone()),
            queue: room.queue.iter().map(|t| t.as_value().clone()).collect(),
            is_playing: room.is_playing,
            current_time: room.current_time.millis(),
            participants: room
                .participants
                .iter()
                .map(|p| ParticipantDetailDto {
                    user_id: p.user_id.as_str().to_string(),
                    username: p.username.as_str().to_string(),
                    joined_at: timestamp_to_rfc3339(p.joined_at.value()),
                })
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}
