//! Notification payload, delivery options, and per-token outcomes.
//!
//! The serialized forms here are the push gateway's wire contract:
//!
//! ```json
//! {
//!   "notification": {"title": "...", "body": "..."},
//!   "data": {"type": "chat_message", "chatId": "...", "senderId": "...", "senderName": "..."}
//! }
//! ```

use serde::{Deserialize, Serialize};

use std::fmt;

/// Fixed type tag carried in the data map so the receiving client can route
/// the notification without a further lookup.
pub const CHAT_MESSAGE_TYPE: &str = "chat_message";

/// User-visible portion of a push notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Structured data map delivered alongside the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    #[serde(rename = "type")]
    pub kind: String,
    pub chat_id: String,
    pub sender_id: String,
    pub sender_name: String,
}

/// Complete payload handed to the push gateway. Constructed fresh per event,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub notification: Notification,
    pub data: NotificationData,
}

/// Delivery priority requested from the push gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Delivery options for a batch send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOptions {
    /// Allow the client to process the payload without a user-visible alert.
    pub background_wake: bool,
    pub priority: Priority,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            background_wake: true,
            priority: Priority::High,
        }
    }
}

/// Error classification for a failed per-token delivery.
///
/// Only [`DeliveryErrorCode::InvalidToken`] and
/// [`DeliveryErrorCode::NotRegistered`] mark a token as permanently invalid;
/// every other code leaves the token untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryErrorCode {
    /// The token is malformed and will never succeed.
    InvalidToken,
    /// The token was valid once but the device deregistered it.
    NotRegistered,
    /// The gateway is temporarily unavailable.
    Unavailable,
    /// Gateway-side internal error.
    Internal,
    /// The device is receiving messages too quickly.
    RateLimited,
    /// The payload exceeded the gateway's size limit.
    PayloadTooBig,
    /// Any other gateway error code, carried verbatim.
    Other(String),
}

impl DeliveryErrorCode {
    /// True when the token will never succeed again and should be removed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            DeliveryErrorCode::InvalidToken | DeliveryErrorCode::NotRegistered
        )
    }
}

impl fmt::Display for DeliveryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryErrorCode::InvalidToken => write!(f, "invalid token"),
            DeliveryErrorCode::NotRegistered => write!(f, "token not registered"),
            DeliveryErrorCode::Unavailable => write!(f, "gateway unavailable"),
            DeliveryErrorCode::Internal => write!(f, "gateway internal error"),
            DeliveryErrorCode::RateLimited => write!(f, "device rate limited"),
            DeliveryErrorCode::PayloadTooBig => write!(f, "payload too big"),
            DeliveryErrorCode::Other(code) => write!(f, "{code}"),
        }
    }
}

/// Per-token result of a batch send. Outcomes preserve index correspondence
/// with the token list passed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(DeliveryErrorCode),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    /// The error code, when the delivery failed.
    pub fn error_code(&self) -> Option<&DeliveryErrorCode> {
        match self {
            DeliveryOutcome::Delivered => None,
            DeliveryOutcome::Failed(code) => Some(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_schema() {
        let payload = NotificationPayload {
            notification: Notification {
                title: "New message from Alice A".to_string(),
                body: "hello".to_string(),
            },
            data: NotificationData {
                kind: CHAT_MESSAGE_TYPE.to_string(),
                chat_id: "alice_bob".to_string(),
                sender_id: "alice".to_string(),
                sender_name: "Alice A".to_string(),
            },
        };

        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["notification"]["title"], "New message from Alice A");
        assert_eq!(json["notification"]["body"], "hello");
        assert_eq!(json["data"]["type"], "chat_message");
        assert_eq!(json["data"]["chatId"], "alice_bob");
        assert_eq!(json["data"]["senderId"], "alice");
        assert_eq!(json["data"]["senderName"], "Alice A");
    }

    #[test]
    fn test_send_options_defaults() {
        let options = SendOptions::default();
        assert!(options.background_wake);
        assert_eq!(options.priority, Priority::High);

        let json: serde_json::Value = serde_json::to_value(options).unwrap();
        assert_eq!(json["backgroundWake"], true);
        assert_eq!(json["priority"], "high");
    }

    #[test]
    fn test_permanent_classification() {
        assert!(DeliveryErrorCode::InvalidToken.is_permanent());
        assert!(DeliveryErrorCode::NotRegistered.is_permanent());
        assert!(!DeliveryErrorCode::Unavailable.is_permanent());
        assert!(!DeliveryErrorCode::Internal.is_permanent());
        assert!(!DeliveryErrorCode::RateLimited.is_permanent());
        assert!(!DeliveryErrorCode::Other("Quota".to_string()).is_permanent());
    }

    #[test]
    fn test_outcome_accessors() {
        assert!(DeliveryOutcome::Delivered.is_delivered());
        assert!(DeliveryOutcome::Delivered.error_code().is_none());

        let failed = DeliveryOutcome::Failed(DeliveryErrorCode::NotRegistered);
        assert!(!failed.is_delivered());
        assert_eq!(
            failed.error_code(),
            Some(&DeliveryErrorCode::NotRegistered)
        );
    }
}
