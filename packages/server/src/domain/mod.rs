//! Domain layer: listening room model, commands, events and the ports the
//! use cases depend on.

pub mod command;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use command::RoomCommand;
pub use entity::{Participant, Room, RoomLimits};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use event::RoomEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use value_object::{
    ChatText, ConnectionId, MediaItem, PlaybackPosition, RoomId, Timestamp, UserId, Username,
};
