//! Message formatting utilities for client display.

use chrono::{DateTime, Local, Utc};
use listening_room_server::infrastructure::dto::websocket::{OutboundMessage, RoomSnapshot};
use serde_json::Value;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one server event
    ///
    /// # Arguments
    ///
    /// * `message` - The decoded server frame
    /// * `current_user_id` - The current user's ID (to mark as "me")
    pub fn format_event(message: &OutboundMessage, current_user_id: &str) -> String {
        match message {
            OutboundMessage::SyncState { room } => Self::format_sync_state(room, current_user_id),
            OutboundMessage::Join { user_id, username } => {
                format!("\n+ {} ({}) joined\n", username, user_id)
            }
            OutboundMessage::Leave { user_id, username } => {
                format!("\n- {} ({}) left\n", username, user_id)
            }
            OutboundMessage::Chat {
                username,
                message,
                timestamp,
                ..
            } => Self::format_chat_message(username, message, *timestamp),
            OutboundMessage::Play {
                current_track,
                current_time,
            } => match current_track {
                Some(track) => format!(
                    "\n▶ {} from {}\n",
                    Self::format_track(track),
                    Self::format_position(*current_time)
                ),
                None => format!("\n▶ playing from {}\n", Self::format_position(*current_time)),
            },
            OutboundMessage::Pause { current_time } => {
                format!("\n⏸ paused at {}\n", Self::format_position(*current_time))
            }
            OutboundMessage::Seek { current_time } => {
                format!("\n⏩ seeked to {}\n", Self::format_position(*current_time))
            }
            OutboundMessage::AddTrack { track } => {
                format!("\n+ queued {}\n", Self::format_track(track))
            }
        }
    }

    /// Format the room snapshot received right after joining
    fn format_sync_state(room: &RoomSnapshot, current_user_id: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!("Room: {} ({})\n", room.name, room.id));

        let state = if room.is_playing { "playing" } else { "paused" };
        match &room.current_track {
            Some(track) => output.push_str(&format!(
                "Now {}: {} at {}\n",
                state,
                Self::format_track(track),
                Self::format_position(room.current_time)
            )),
            None => output.push_str("Nothing playing\n"),
        }

        output.push_str(&format!("Queue: {} tracks\n", room.queue.len()));
        for (index, track) in room.queue.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", index + 1, Self::format_track(track)));
        }

        output.push_str("Participants:\n");
        for participant in &room.participants {
            let me_suffix = if participant.id == current_user_id {
                " (me)"
            } else {
                ""
            };
            output.push_str(&format!("  {}{}\n", participant.username, me_suffix));
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `from` - The username of the sender
    /// * `content` - The message content
    /// * `sent_at` - Unix timestamp when the server relayed the message (milliseconds)
    pub fn format_chat_message(from: &str, content: &str, sent_at: i64) -> String {
        format!(
            "\n[{}] @{}: {}\n",
            Self::format_clock(sent_at),
            from,
            content
        )
    }

    /// `name - artist` when the track carries them, the raw JSON otherwise
    pub fn format_track(track: &Value) -> String {
        match (
            track.get("name").and_then(Value::as_str),
            track.get("artist").and_then(Value::as_str),
        ) {
            (Some(name), Some(artist)) => format!("{} - {}", name, artist),
            (Some(name), None) => name.to_string(),
            _ => track.to_string(),
        }
    }

    /// Playback position as `m:ss`
    pub fn format_position(millis: f64) -> String {
        let total_seconds = (millis.max(0.0) / 1000.0).floor() as u64;
        format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Wall clock time in the local timezone
    fn format_clock(timestamp_millis: i64) -> String {
        DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
            .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string())
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
