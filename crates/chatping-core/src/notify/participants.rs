//! Participant resolution: derive the recipient from the chat key.

use chatping_types::message::CHAT_KEY_SEPARATOR;

/// Resolve the recipient id from a chat key and the sender id.
///
/// The chat key must split into exactly two non-empty segments, exactly one
/// of which equals the sender; the recipient is the other segment. Any other
/// shape (wrong segment count, empty segment, sender matching neither or
/// both segments) yields `None` and the event is dropped.
///
/// Pure function: no I/O, no side effects.
pub fn resolve_recipient(chat_id: &str, sender_id: &str) -> Option<String> {
    let mut segments = chat_id.split(CHAT_KEY_SEPARATOR);
    let first = segments.next()?;
    let second = segments.next()?;
    if segments.next().is_some() || first.is_empty() || second.is_empty() {
        return None;
    }

    match (first == sender_id, second == sender_id) {
        (true, false) => Some(second.to_string()),
        (false, true) => Some(first.to_string()),
        _ => None,
    }
}
