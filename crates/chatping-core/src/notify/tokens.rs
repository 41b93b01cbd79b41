//! Recipient token retrieval.
//!
//! Asymmetric with sender-identity resolution: the recipient lookup is the
//! delivery target, so a store failure here is fatal to the pipeline, while
//! a missing profile or an empty token set is a distinct no-op outcome.

use chatping_types::error::ProfileStoreError;
use tracing::{error, info};

use crate::profile::ProfileStore;

/// Result of looking up a recipient's delivery tokens.
#[derive(Debug)]
pub enum TokenFetch {
    /// At least one well-formed token to deliver to.
    Found(Vec<String>),
    /// Profile missing, or no token survived filtering. No send is attempted.
    NoneAvailable,
    /// The store itself failed. No send is attempted.
    LookupFailed(ProfileStoreError),
}

/// Fetch and filter the recipient's delivery tokens.
pub async fn fetch_recipient_tokens<P: ProfileStore>(
    store: &P,
    recipient_id: &str,
) -> TokenFetch {
    let profile = match store.get_profile(recipient_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            info!(recipient_id, "recipient profile not found, skipping notification");
            return TokenFetch::NoneAvailable;
        }
        Err(err) => {
            error!(recipient_id, error = %err, "recipient profile lookup failed");
            return TokenFetch::LookupFailed(err);
        }
    };

    let tokens = profile.valid_tokens();
    if tokens.is_empty() {
        info!(recipient_id, "recipient has no valid delivery tokens");
        return TokenFetch::NoneAvailable;
    }
    TokenFetch::Found(tokens)
}
