//! Shared fixtures for use case tests.

use std::sync::Arc;

use listening_room_shared::time::{Clock, FixedClock};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    domain::{
        ChatText, ConnectionId, MessagePusher, RoomId, RoomLimits, RoomRepository, UserId,
        Username,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
    },
};

pub const NOW: i64 = 1_700_000_000_000;

/// Registry, fan-out and clock wired the way `main` wires them
pub struct Harness {
    pub repository: Arc<InMemoryRoomRepository>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<dyn Clock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_limits(RoomLimits::unbounded())
    }

    pub fn with_limits(limits: RoomLimits) -> Self {
        Self {
            repository: Arc::new(InMemoryRoomRepository::with_limits(limits)),
            message_pusher: Arc::new(WebSocketMessagePusher::new()),
            clock: Arc::new(FixedClock::new(NOW)),
        }
    }

    pub fn repository(&self) -> Arc<dyn RoomRepository> {
        self.repository.clone()
    }

    pub fn message_pusher(&self) -> Arc<dyn MessagePusher> {
        self.message_pusher.clone()
    }

    /// Register a fresh connection and return its receiving end
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_connection(connection_id, tx)
            .await;
        (connection_id, rx)
    }
}

/// Pop every frame already queued for a connection, parsed as JSON
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(text) = rx.try_recv() {
        frames.push(serde_json::from_str(&text).expect("pushed frames are JSON"));
    }
    frames
}

pub fn room_id(value: &str) -> RoomId {
    RoomId::new(value.to_string()).unwrap()
}

pub fn user_id(value: &str) -> UserId {
    UserId::new(value.to_string()).unwrap()
}

pub fn username(value: &str) -> Username {
    Username::new(value.to_string()).unwrap()
}

pub fn chat_text(value: &str) -> ChatText {
    ChatText::new(value.to_string()).unwrap()
}
