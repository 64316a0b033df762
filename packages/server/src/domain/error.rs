//! Domain layer errors.

use thiserror::Error;

/// Errors raised by value objects and entity invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    EmptyValue(&'static str),

    #[error("playback position must be a finite number of milliseconds")]
    InvalidPlaybackPosition,

    #[error("room is full ({0} participants)")]
    ParticipantCapacityExceeded(usize),

    #[error("room queue is full ({0} tracks)")]
    QueueCapacityExceeded(usize),
}

/// Errors raised by room registry implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}

/// Errors raised while pushing events to connections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("connection '{0}' is closed")]
    ConnectionClosed(String),

    #[error("failed to serialize event: {0}")]
    Serialization(String),
}
