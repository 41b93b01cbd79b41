//! In-memory port implementations shared by the pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chatping_types::error::{ProfileStoreError, PushError};
use chatping_types::notification::{DeliveryOutcome, NotificationPayload, SendOptions};
use chatping_types::profile::UserProfile;

use crate::profile::ProfileStore;
use crate::push::PushGateway;

/// HashMap-backed `ProfileStore` with switchable failure modes and a record
/// of every prune call.
pub(crate) struct MemoryProfileStore {
    pub profiles: Mutex<HashMap<String, UserProfile>>,
    /// When set, `get_profile` fails with a query error.
    pub fail_get: bool,
    /// When set, `remove_device_tokens` fails with a query error.
    pub fail_remove: bool,
    /// Every `(user_id, tokens)` prune request observed.
    pub removals: Mutex<Vec<(String, Vec<String>)>>,
}

impl MemoryProfileStore {
    pub fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let map = profiles.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            profiles: Mutex::new(map),
            fail_get: false,
            fail_remove: false,
            removals: Mutex::new(Vec::new()),
        }
    }

    pub fn tokens_of(&self, user_id: &str) -> Vec<String> {
        self.profiles
            .lock()
            .unwrap()
            .get(user_id)
            .map(|p| p.device_tokens.clone())
            .unwrap_or_default()
    }
}

impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ProfileStoreError> {
        if self.fail_get {
            return Err(ProfileStoreError::Query("simulated failure".to_string()));
        }
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn remove_device_tokens(
        &self,
        user_id: &str,
        tokens: &[String],
    ) -> Result<u64, ProfileStoreError> {
        self.removals
            .lock()
            .unwrap()
            .push((user_id.to_string(), tokens.to_vec()));
        if self.fail_remove {
            return Err(ProfileStoreError::Query("simulated failure".to_string()));
        }
        let mut profiles = self.profiles.lock().unwrap();
        let Some(profile) = profiles.get_mut(user_id) else {
            return Ok(0);
        };
        let before = profile.device_tokens.len();
        profile.device_tokens.retain(|t| !tokens.contains(t));
        Ok((before - profile.device_tokens.len()) as u64)
    }
}

/// `PushGateway` returning a scripted outcome list and recording every batch.
pub(crate) struct ScriptedGateway {
    /// Outcomes returned for the next batch, index-aligned with its tokens.
    pub outcomes: Vec<DeliveryOutcome>,
    /// When set, the whole batch call fails.
    pub fail: bool,
    /// Every `(tokens, payload, options)` batch observed.
    pub batches: Mutex<Vec<(Vec<String>, NotificationPayload, SendOptions)>>,
}

impl ScriptedGateway {
    pub fn delivering_all() -> Self {
        Self {
            outcomes: Vec::new(),
            fail: false,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_outcomes(outcomes: Vec<DeliveryOutcome>) -> Self {
        Self {
            outcomes,
            fail: false,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            outcomes: Vec::new(),
            fail: true,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

impl PushGateway for ScriptedGateway {
    async fn send_batch(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
        options: &SendOptions,
    ) -> Result<Vec<DeliveryOutcome>, PushError> {
        self.batches
            .lock()
            .unwrap()
            .push((tokens.to_vec(), payload.clone(), *options));
        if self.fail {
            return Err(PushError::Request("simulated outage".to_string()));
        }
        if self.outcomes.is_empty() {
            return Ok(vec![DeliveryOutcome::Delivered; tokens.len()]);
        }
        assert_eq!(
            self.outcomes.len(),
            tokens.len(),
            "scripted outcomes must match token count"
        );
        Ok(self.outcomes.clone())
    }
}
