//! Sender identity resolution.
//!
//! Resolution order: privileged accounts always render under the single
//! shared persona from [`NamingConfig`], regardless of any stored full name.
//! Otherwise the stored full name is used when present, and the fallback
//! display name covers every failure mode (store error, missing profile,
//! missing name). A sender lookup failure is never fatal to the pipeline.

use chatping_types::config::NamingConfig;
use tracing::{debug, warn};

use crate::profile::ProfileStore;

/// Resolve the display name to show for `sender_id`.
pub async fn resolve_sender_name<P: ProfileStore>(
    store: &P,
    sender_id: &str,
    naming: &NamingConfig,
) -> String {
    match store.get_profile(sender_id).await {
        Ok(Some(profile)) => {
            if profile.privileged {
                debug!(sender_id, "privileged sender, masking display name");
                return naming.privileged_display_name.clone();
            }
            profile
                .full_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| naming.fallback_display_name.clone())
        }
        Ok(None) => naming.fallback_display_name.clone(),
        Err(err) => {
            warn!(sender_id, error = %err, "sender profile lookup failed, using fallback name");
            naming.fallback_display_name.clone()
        }
    }
}
