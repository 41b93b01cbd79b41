//! Chat message event types.
//!
//! `RecordCreated` is the raw shape of the document-store "record created"
//! notification; `ChatMessageEvent` is the validated form the pipeline
//! consumes. The adaptation from one to the other is the only place the
//! outside world's loosely-typed record is touched.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Separator joining the two participant ids inside a chat key.
pub const CHAT_KEY_SEPARATOR: char = '_';

/// Kind of chat message, driving notification body selection.
///
/// Unknown kinds from the wire collapse into `Other`, which renders the
/// generic body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
    Document,
    Other,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Text => write!(f, "text"),
            MessageKind::Image => write!(f, "image"),
            MessageKind::Audio => write!(f, "audio"),
            MessageKind::Document => write!(f, "document"),
            MessageKind::Other => write!(f, "other"),
        }
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(MessageKind::Text),
            "image" => Ok(MessageKind::Image),
            "audio" => Ok(MessageKind::Audio),
            "document" => Ok(MessageKind::Document),
            "other" => Ok(MessageKind::Other),
            unknown => Err(format!("unknown message kind: '{unknown}'")),
        }
    }
}

/// A validated chat message creation event.
///
/// Invariant: `chat_id` is exactly two non-empty ids joined by
/// [`CHAT_KEY_SEPARATOR`], and `sender_id` is one of the two. The invariant
/// is enforced by participant resolution, not at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageEvent {
    pub chat_id: String,
    pub message_id: String,
    pub sender_id: String,
    pub content: Option<String>,
    pub kind: MessageKind,
}

/// Record fields of a newly created chat message, as stored.
///
/// Every field is optional on the wire; validation happens in
/// [`RecordCreated::into_event`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub sender_id: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Raw "record created" notification from the document store.
///
/// Carries the contextual path parameters (chat key, message id) and the
/// record body, which may be missing entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCreated {
    pub chat_id: String,
    pub message_id: String,
    pub record: Option<MessageRecord>,
}

impl RecordCreated {
    /// Adapt the raw notification into a typed event.
    ///
    /// Returns `None` when the record body or the sender id is missing;
    /// the caller logs and drops the event (fire-and-forget contract).
    /// A missing or unrecognized message type falls back to
    /// [`MessageKind::Other`].
    pub fn into_event(self) -> Option<ChatMessageEvent> {
        let record = self.record?;
        let sender_id = record.sender_id.filter(|s| !s.is_empty())?;
        let kind = record
            .kind
            .as_deref()
            .and_then(|k| k.parse().ok())
            .unwrap_or(MessageKind::Other);

        Some(ChatMessageEvent {
            chat_id: self.chat_id,
            message_id: self.message_id,
            sender_id,
            content: record.content,
            kind,
        })
    }
}
