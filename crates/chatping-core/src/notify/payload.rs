//! Notification payload construction.

use chatping_types::message::{ChatMessageEvent, MessageKind};
use chatping_types::notification::{
    CHAT_MESSAGE_TYPE, Notification, NotificationData, NotificationPayload,
};

/// Maximum body length before truncation, in characters.
pub const MAX_BODY_CHARS: usize = 150;

const ELLIPSIS: &str = "...";

/// Build the payload for one message event and a resolved sender name.
pub fn build_payload(event: &ChatMessageEvent, sender_name: &str) -> NotificationPayload {
    NotificationPayload {
        notification: Notification {
            title: format!("New message from {sender_name}"),
            body: truncate_body(body_for(event, sender_name)),
        },
        data: NotificationData {
            kind: CHAT_MESSAGE_TYPE.to_string(),
            chat_id: event.chat_id.clone(),
            sender_id: event.sender_id.clone(),
            sender_name: sender_name.to_string(),
        },
    }
}

/// Select the body text by message kind. Text messages carry their content
/// verbatim; media kinds render a sender-attributed stub; everything else
/// (including text with no content) falls back to the generic body.
fn body_for(event: &ChatMessageEvent, sender_name: &str) -> String {
    match (event.kind, event.content.as_deref()) {
        (MessageKind::Text, Some(content)) if !content.is_empty() => content.to_string(),
        (MessageKind::Image, _) => format!("{sender_name} sent an image."),
        (MessageKind::Audio, _) => format!("{sender_name} sent a voice message."),
        (MessageKind::Document, _) => format!("{sender_name} sent a document."),
        _ => "New message".to_string(),
    }
}

/// Truncate bodies longer than [`MAX_BODY_CHARS`] characters to the first
/// 150 characters plus a three-character ellipsis marker (final length 153).
fn truncate_body(body: String) -> String {
    if body.chars().count() <= MAX_BODY_CHARS {
        return body;
    }
    let mut truncated: String = body.chars().take(MAX_BODY_CHARS).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
