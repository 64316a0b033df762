//! UseCase layer
//!
//! One use case per room command, plus the coordinator that serializes them.

pub mod add_track;
pub mod connect_participant;
pub mod control_playback;
pub mod coordinator;
pub mod disconnect_participant;
pub mod error;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod send_chat;

#[cfg(test)]
mod test_support;

pub use add_track::AddTrackUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use control_playback::ControlPlaybackUseCase;
pub use coordinator::RoomCoordinator;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::RoomCommandError;
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_room::JoinRoomUseCase;
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use send_chat::SendChatUseCase;
