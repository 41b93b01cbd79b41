//! Service configuration, deserialized from `config.toml`.
//!
//! Every section and field is optional in the file; missing values fall back
//! to the defaults below.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub naming: NamingConfig,
    pub push: PushConfig,
    pub ingress: IngressConfig,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

/// Display-name resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Single shared display name for every privileged account.
    /// All privileged senders render under this one persona.
    pub privileged_display_name: String,
    /// Display name used when the sender's profile or full name is
    /// unavailable.
    pub fallback_display_name: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            privileged_display_name: "Dr. Ali Kamal".to_string(),
            fallback_display_name: "Someone".to_string(),
        }
    }
}

/// Push gateway client settings. The server key is NOT configured here; it
/// comes from the `CHATPING_FCM_KEY` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Base URL of the push gateway.
    pub endpoint: String,
    /// Whole-request timeout for a batch send, in seconds.
    pub timeout_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://fcm.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Authentication for the inbound record-created webhook.
///
/// When `hmac_secret` is set, requests must carry a valid
/// `X-Hub-Signature-256` header; otherwise, when `bearer_token` is set,
/// requests must carry it in `Authorization`. With neither set the webhook
/// is open (suitable only behind a trusted proxy).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngressConfig {
    pub bearer_token: Option<String>,
    pub hmac_secret: Option<String>,
}
