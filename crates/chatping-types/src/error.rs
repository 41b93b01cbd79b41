use thiserror::Error;

/// Errors from profile store operations (used by trait definitions in
/// chatping-core).
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("store connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors from the push gateway as a whole (per-token failures are carried
/// in delivery outcomes, not here).
#[derive(Debug, Error)]
pub enum PushError {
    #[error("push gateway request failed: {0}")]
    Request(String),

    #[error("push gateway authentication failed")]
    AuthenticationFailed,

    #[error("push gateway returned HTTP {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("failed to parse push gateway response: {0}")]
    InvalidResponse(String),
}
