//! FcmGateway -- concrete [`PushGateway`] implementation for FCM.
//!
//! Sends batch requests to the FCM legacy send endpoint (`/fcm/send`) with
//! server-key authentication. The server key is wrapped in
//! [`secrecy::SecretString`] and never appears in Debug output or logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatping_core::push::PushGateway;
use chatping_types::config::PushConfig;
use chatping_types::error::PushError;
use chatping_types::notification::{DeliveryOutcome, NotificationPayload, SendOptions};

use super::types::{FcmBatchRequest, FcmBatchResponse};

/// FCM push gateway client.
///
/// Implements [`PushGateway`] over the legacy batch HTTP API, which returns
/// one result per registration id in request order -- exactly the
/// index-correspondence contract the pipeline's pruner relies on.
pub struct FcmGateway {
    client: reqwest::Client,
    server_key: SecretString,
    base_url: String,
}

impl FcmGateway {
    /// Create a new gateway client.
    ///
    /// # Arguments
    ///
    /// * `server_key` - FCM server key wrapped in SecretString
    /// * `config` - endpoint and timeout settings
    pub fn new(server_key: SecretString, config: &PushConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            server_key,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/fcm/send", self.base_url)
    }
}

// FcmGateway intentionally does NOT derive Debug: the SecretString field
// keeps the server key out of accidental output, and omitting Debug entirely
// removes the remaining surface.

impl PushGateway for FcmGateway {
    async fn send_batch(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
        options: &SendOptions,
    ) -> Result<Vec<DeliveryOutcome>, PushError> {
        let body = FcmBatchRequest {
            registration_ids: tokens.to_vec(),
            notification: payload.notification.clone(),
            data: payload.data.clone(),
            content_available: options.background_wake,
            priority: options.priority.to_string(),
        };

        let response = self
            .client
            .post(self.url())
            .header(
                "Authorization",
                format!("key={}", self.server_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| PushError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => PushError::AuthenticationFailed,
                code => PushError::Gateway {
                    status: code,
                    message: error_body,
                },
            });
        }

        let batch: FcmBatchResponse = response
            .json()
            .await
            .map_err(|e| PushError::InvalidResponse(e.to_string()))?;

        if batch.results.len() != tokens.len() {
            return Err(PushError::InvalidResponse(format!(
                "expected {} results, got {}",
                tokens.len(),
                batch.results.len()
            )));
        }

        tracing::debug!(
            success = batch.success,
            failure = batch.failure,
            "push gateway batch response received"
        );

        Ok(batch
            .results
            .into_iter()
            .map(|result| result.into_outcome())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_gateway() -> FcmGateway {
        FcmGateway::new(
            SecretString::from("test-key-not-real"),
            &PushConfig::default(),
        )
    }

    #[test]
    fn test_default_url() {
        let gateway = make_gateway();
        assert_eq!(gateway.url(), "https://fcm.googleapis.com/fcm/send");
    }

    #[test]
    fn test_base_url_override_strips_trailing_slash() {
        let gateway = make_gateway().with_base_url("http://localhost:8080/".to_string());
        assert_eq!(gateway.url(), "http://localhost:8080/fcm/send");
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = PushConfig {
            endpoint: "http://fcm.internal:9999".to_string(),
            timeout_secs: 5,
        };
        let gateway = FcmGateway::new(SecretString::from("k"), &config);
        assert_eq!(gateway.url(), "http://fcm.internal:9999/fcm/send");
    }
}
