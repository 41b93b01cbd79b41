//! The notification-dispatch pipeline.
//!
//! One [`NotificationPipeline::process`] call per message-created event.
//! The pipeline never returns an error to its caller: the contract is
//! "best-effort notify", so every failure mode collapses into a logged
//! [`PipelineOutcome`] and the trigger source is never failed.

use chatping_types::config::NamingConfig;
use chatping_types::message::ChatMessageEvent;
use chatping_types::notification::SendOptions;
use tracing::{error, info, warn};

use crate::notify::identity::resolve_sender_name;
use crate::notify::participants::resolve_recipient;
use crate::notify::payload::build_payload;
use crate::notify::tokens::{TokenFetch, fetch_recipient_tokens};
use crate::profile::ProfileStore;
use crate::push::PushGateway;

/// Why a pipeline run ended without a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Chat key malformed, or sender not exactly one of its two segments.
    UnresolvedParticipants,
    /// The recipient profile lookup failed at the store.
    RecipientLookupFailed,
    /// Recipient missing or owning no valid delivery tokens.
    NoDeliveryTokens,
    /// The batch send itself failed; nothing is known per token.
    DispatchFailed,
}

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The batch was dispatched; counts describe per-token results.
    Dispatched {
        recipient_id: String,
        delivered: usize,
        failed: usize,
        pruned: usize,
    },
    /// The run ended before (or at) dispatch.
    Skipped(SkipReason),
}

/// The dispatch pipeline, generic over its two ports.
///
/// Holds no per-event state; a single instance serves any number of
/// concurrent `process` calls.
pub struct NotificationPipeline<P: ProfileStore, G: PushGateway> {
    profiles: P,
    gateway: G,
    naming: NamingConfig,
    options: SendOptions,
}

impl<P: ProfileStore, G: PushGateway> NotificationPipeline<P, G> {
    /// Create a pipeline over the given store and gateway.
    pub fn new(profiles: P, gateway: G, naming: NamingConfig) -> Self {
        Self {
            profiles,
            gateway,
            naming,
            options: SendOptions::default(),
        }
    }

    /// Override the delivery options (defaults: background wake, high
    /// priority).
    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    /// Access the profile store.
    pub fn profiles(&self) -> &P {
        &self.profiles
    }

    /// Run the full pipeline for one message-created event.
    pub async fn process(&self, event: &ChatMessageEvent) -> PipelineOutcome {
        // Stage 2: participant resolution (pure).
        let Some(recipient_id) = resolve_recipient(&event.chat_id, &event.sender_id) else {
            warn!(
                chat_id = %event.chat_id,
                sender_id = %event.sender_id,
                message_id = %event.message_id,
                "cannot resolve participants from chat key"
            );
            return PipelineOutcome::Skipped(SkipReason::UnresolvedParticipants);
        };

        // Stages 3 and 4 have no data dependency on each other: resolve the
        // sender's display name and the recipient's tokens concurrently.
        let (sender_name, token_fetch) = tokio::join!(
            resolve_sender_name(&self.profiles, &event.sender_id, &self.naming),
            fetch_recipient_tokens(&self.profiles, &recipient_id),
        );

        let tokens = match token_fetch {
            TokenFetch::Found(tokens) => tokens,
            TokenFetch::NoneAvailable => {
                return PipelineOutcome::Skipped(SkipReason::NoDeliveryTokens);
            }
            TokenFetch::LookupFailed(_) => {
                return PipelineOutcome::Skipped(SkipReason::RecipientLookupFailed);
            }
        };

        // Stage 5: payload construction.
        let payload = build_payload(event, &sender_name);

        // Stage 6: batch dispatch.
        let outcomes = match self
            .gateway
            .send_batch(&tokens, &payload, &self.options)
            .await
        {
            Ok(outcomes) => outcomes,
            Err(err) => {
                error!(
                    chat_id = %event.chat_id,
                    recipient_id = %recipient_id,
                    error = %err,
                    "batch send failed"
                );
                return PipelineOutcome::Skipped(SkipReason::DispatchFailed);
            }
        };

        let delivered = outcomes.iter().filter(|o| o.is_delivered()).count();
        let failed = outcomes.len() - delivered;
        info!(
            chat_id = %event.chat_id,
            recipient_id = %recipient_id,
            delivered,
            failed,
            "batch send completed"
        );

        // Stage 7: prune permanently-invalid tokens, index-aligned with the
        // dispatched token list.
        let invalid: Vec<String> = tokens
            .iter()
            .zip(outcomes.iter())
            .filter_map(|(token, outcome)| {
                let code = outcome.error_code()?;
                if code.is_permanent() {
                    warn!(
                        recipient_id = %recipient_id,
                        code = %code,
                        "delivery token permanently invalid, scheduling removal"
                    );
                    Some(token.clone())
                } else {
                    None
                }
            })
            .collect();

        let pruned = self.prune_tokens(&recipient_id, invalid).await;

        PipelineOutcome::Dispatched {
            recipient_id,
            delivered,
            failed,
            pruned,
        }
    }

    /// Best-effort removal of invalid tokens. A prune failure only logs; it
    /// never rolls back or retries.
    async fn prune_tokens(&self, recipient_id: &str, invalid: Vec<String>) -> usize {
        if invalid.is_empty() {
            return 0;
        }
        match self
            .profiles
            .remove_device_tokens(recipient_id, &invalid)
            .await
        {
            Ok(removed) => {
                info!(recipient_id, removed, "pruned invalid delivery tokens");
                invalid.len()
            }
            Err(err) => {
                warn!(recipient_id, error = %err, "token pruning failed");
                0
            }
        }
    }
}
