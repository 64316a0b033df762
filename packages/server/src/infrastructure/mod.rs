//! Infrastructure layer: wire DTOs, the in-memory room registry and the
//! WebSocket fan-out.

pub mod dto;
pub mod message_pusher;
pub mod repository;
