//! The notification-dispatch pipeline.
//!
//! Stages, in dependency order: participant resolution, sender-identity
//! resolution, recipient-token retrieval, payload construction, batch
//! dispatch, token pruning. [`pipeline::NotificationPipeline`] wires them
//! together; the other modules hold the individual stages.

pub mod identity;
pub mod participants;
pub mod payload;
pub mod pipeline;
pub mod tokens;

pub use pipeline::{NotificationPipeline, PipelineOutcome, SkipReason};
