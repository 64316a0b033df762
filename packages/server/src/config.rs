//! Server configuration.

use crate::domain::RoomLimits;

/// Default cap for chat text, in chars
pub const DEFAULT_MAX_CHAT_CHARS: usize = 500;
/// Default cap for usernames, in chars
pub const DEFAULT_MAX_USERNAME_CHARS: usize = 50;

/// Length caps applied to untrusted inbound text before it reaches a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    pub max_chat_chars: usize,
    pub max_username_chars: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_chat_chars: DEFAULT_MAX_CHAT_CHARS,
            max_username_chars: DEFAULT_MAX_USERNAME_CHARS,
        }
    }
}

/// Everything the server needs to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port number to bind to (e.g., 8080)
    pub port: u16,
    pub frame_limits: FrameLimits,
    pub room_limits: RoomLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            frame_limits: FrameLimits::default(),
            room_limits: RoomLimits::unbounded(),
        }
    }
}
