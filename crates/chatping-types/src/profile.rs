//! User profile as read from the profile store.

use serde::{Deserialize, Serialize};

/// A user profile, owned by the profile store.
///
/// The pipeline reads profiles for sender-name resolution and recipient
/// token retrieval, and mutates them only by removing invalid delivery
/// tokens. Token registration happens externally (or via the management
/// API), so `device_tokens` reflects whatever clients have registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub full_name: Option<String>,
    /// Privileged accounts render under a single shared display name.
    pub privileged: bool,
    /// Registered delivery tokens, unique per user. May contain entries the
    /// pipeline considers malformed; filtering happens at token retrieval.
    pub device_tokens: Vec<String>,
}

impl UserProfile {
    /// Delivery tokens that are well-formed enough to attempt a send:
    /// non-empty after trimming.
    pub fn valid_tokens(&self) -> Vec<String> {
        self.device_tokens
            .iter()
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tokens_filters_empty() {
        let profile = UserProfile {
            id: "bob".to_string(),
            full_name: None,
            privileged: false,
            device_tokens: vec![
                "t1".to_string(),
                String::new(),
                "   ".to_string(),
                "t2".to_string(),
            ],
        };
        assert_eq!(profile.valid_tokens(), vec!["t1", "t2"]);
    }

    #[test]
    fn test_valid_tokens_empty_profile() {
        let profile = UserProfile {
            id: "bob".to_string(),
            full_name: None,
            privileged: false,
            device_tokens: Vec::new(),
        };
        assert!(profile.valid_tokens().is_empty());
    }
}
