//! Room events pushed to participants.

use super::{ChatText, MediaItem, PlaybackPosition, Room, Timestamp, UserId, Username};

/// An event derived from a room state transition.
///
/// Events are built by the use cases and serialized by the `MessagePusher`
/// implementation, once per fan-out.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Full room snapshot, sent only to a participant that just joined.
    SyncState(Room),
    Joined {
        user_id: UserId,
        username: Username,
    },
    Left {
        user_id: UserId,
        username: Username,
    },
    Chat {
        user_id: UserId,
        username: Username,
        message: ChatText,
        sent_at: Timestamp,
    },
    Played {
        current_track: Option<MediaItem>,
        current_time: PlaybackPosition,
    },
    Paused {
        current_time: PlaybackPosition,
    },
    Seeked {
        current_time: PlaybackPosition,
    },
    TrackAdded {
        track: MediaItem,
    },
}
