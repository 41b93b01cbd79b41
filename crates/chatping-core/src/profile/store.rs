//! ProfileStore trait definition.
//!
//! The pipeline's read/prune interface to user profiles. Implementations
//! live in chatping-infra (e.g., `SqliteProfileStore`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use chatping_types::error::ProfileStoreError;
use chatping_types::profile::UserProfile;

/// Port over the profile store.
///
/// Token removal MUST be an atomic set-difference against the stored token
/// collection, never a read-modify-write of the whole set: concurrent prunes
/// from overlapping events must not lose unrelated token registrations.
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile by user id. `Ok(None)` means the user does not exist;
    /// errors are reserved for transport/query failures.
    fn get_profile(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>, ProfileStoreError>> + Send;

    /// Remove the given tokens from a user's token set in one atomic update.
    /// Tokens not present are ignored. Returns the number actually removed.
    fn remove_device_tokens(
        &self,
        user_id: &str,
        tokens: &[String],
    ) -> impl std::future::Future<Output = Result<u64, ProfileStoreError>> + Send;
}
