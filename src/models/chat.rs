//! Chat Models

use serde::{Deserialize, Serialize};

/// A single chat message
///
/// History rows come back as `{sender_id, content, sent_at, read}` without an
/// id, while sent and streamed messages carry `timestamp`/`is_read`. Both
/// spellings are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    #[serde(default)]
    pub id: Option<String>,
    pub sender_id: String,
    #[serde(default)]
    pub receiver_id: Option<String>,
    pub content: String,
    #[serde(default, alias = "sent_at")]
    pub timestamp: Option<String>,
    #[serde(default, alias = "read")]
    pub is_read: bool,
}

impl Message {
    /// Whether the message was written by `user_id`
    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender_id == user_id
    }

    /// `HH:MM` when the timestamp parses, empty otherwise
    pub fn time_label(&self) -> String {
        self.timestamp
            .as_deref()
            .and_then(super::format::parse_datetime)
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Frame written to the chat stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingFrame {
    pub receiver_id: String,
    pub content: String,
}

/// Body of `POST /chat/{id}`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub content: &'a str,
}

/// Response of `PUT /chat/{id}/mark-read`
#[derive(Debug, Clone, Deserialize)]
pub struct MarkReadResponse {
    #[serde(default)]
    pub messages_marked_read: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_row_aliases() {
        let msg: Message = serde_json::from_str(
            r#"{"sender_id": "u2", "content": "hey", "sent_at": "2024-03-01T18:05:00Z", "read": true}"#,
        )
        .unwrap();
        assert!(msg.id.is_none());
        assert!(msg.is_read);
        assert!(msg.is_from("u2"));
        assert_eq!(msg.time_label(), "18:05");
    }
}
