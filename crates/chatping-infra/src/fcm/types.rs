//! Request/response types for the FCM legacy batch send endpoint.

use chatping_types::notification::{
    DeliveryErrorCode, DeliveryOutcome, Notification, NotificationData,
};
use serde::{Deserialize, Serialize};

/// Batch send request body (`POST /fcm/send`).
#[derive(Debug, Serialize)]
pub struct FcmBatchRequest {
    pub registration_ids: Vec<String>,
    pub notification: Notification,
    pub data: NotificationData,
    /// Maps the background-wake delivery option.
    pub content_available: bool,
    pub priority: String,
}

/// Batch send response body. `results` is index-aligned with
/// `registration_ids` from the request.
#[derive(Debug, Deserialize)]
pub struct FcmBatchResponse {
    #[serde(default)]
    pub success: u32,
    #[serde(default)]
    pub failure: u32,
    pub results: Vec<FcmResult>,
}

/// Per-token result: exactly one of `message_id` or `error` is set.
#[derive(Debug, Deserialize)]
pub struct FcmResult {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FcmResult {
    /// Map the gateway's result into a domain delivery outcome.
    pub fn into_outcome(self) -> DeliveryOutcome {
        match self.error {
            None => DeliveryOutcome::Delivered,
            Some(code) => DeliveryOutcome::Failed(classify_error(&code)),
        }
    }
}

/// Classify an FCM error string into a [`DeliveryErrorCode`].
///
/// `InvalidRegistration` / `MissingRegistration` and `NotRegistered` are the
/// permanent-invalidity signals; everything else is left as-is for the
/// caller to ignore (no retry in this pipeline).
pub fn classify_error(code: &str) -> DeliveryErrorCode {
    match code {
        "InvalidRegistration" | "MissingRegistration" => DeliveryErrorCode::InvalidToken,
        "NotRegistered" => DeliveryErrorCode::NotRegistered,
        "Unavailable" => DeliveryErrorCode::Unavailable,
        "InternalServerError" => DeliveryErrorCode::Internal,
        "DeviceMessageRateExceeded" => DeliveryErrorCode::RateLimited,
        "MessageTooBig" => DeliveryErrorCode::PayloadTooBig,
        other => DeliveryErrorCode::Other(other.to_string()),
    }
}
