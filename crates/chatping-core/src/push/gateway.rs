//! PushGateway trait definition.
//!
//! Batch delivery port. Implementations live in chatping-infra
//! (e.g., `FcmGateway`).

use chatping_types::error::PushError;
use chatping_types::notification::{DeliveryOutcome, NotificationPayload, SendOptions};

/// Port over the push delivery gateway.
pub trait PushGateway: Send + Sync {
    /// Send one payload to every token in a single batch request.
    ///
    /// On success the returned vector has exactly one outcome per input
    /// token, in the same order. An `Err` means the batch call itself
    /// failed and nothing is known about individual tokens.
    fn send_batch(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
        options: &SendOptions,
    ) -> impl std::future::Future<Output = Result<Vec<DeliveryOutcome>, PushError>> + Send;
}
