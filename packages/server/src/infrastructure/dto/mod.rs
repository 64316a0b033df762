//! Data Transfer Objects (DTOs) for the listening room server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame DTOs
//! - `http`: HTTP API response DTOs
//!
//! `conversion` holds the mapping between DTOs and the domain model.

pub mod conversion;
pub mod http;
pub mod websocket;
