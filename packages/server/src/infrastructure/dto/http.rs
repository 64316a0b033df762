//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub name: String,
    /// User IDs in join order
    pub participants: Vec<String>,
    pub queue_length: usize,
    pub is_playing: bool,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

/// Participant detail for `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub user_id: String,
    pub username: String,
    /// RFC 3339 (UTC)
    pub joined_at: String,
}

/// Room detail for `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub name: String,
    pub creator_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_track: Option<serde_json::Value>,
    pub queue: Vec<serde_json::Value>,
    pub is_playing: bool,
    pub current_time: f64,
    pub participants: Vec<ParticipantDetailDto>,
    /// RFC 3339 (UTC)
    pub created_at: String,
}
