//! Record-created webhook authentication.
//!
//! The inbound webhook carries either an HMAC-SHA256 signature of the body
//! (`X-Hub-Signature-256`, GitHub style) or a bearer token
//! (`Authorization`). Both comparisons are constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use chatping_types::config::IngressConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur while authenticating an inbound webhook request.
#[derive(Debug, thiserror::Error)]
pub enum IngressAuthError {
    /// HMAC signature verification failed.
    #[error("HMAC signature verification failed")]
    SignatureVerificationFailed,

    /// Bearer token verification failed.
    #[error("bearer token verification failed")]
    BearerVerificationFailed,

    /// Invalid HMAC key.
    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),

    /// Missing authentication header.
    #[error("missing authentication: {0}")]
    MissingAuth(String),
}

/// Authentication method required for the record-created webhook.
#[derive(Debug, Clone)]
pub enum IngressAuth {
    /// HMAC-SHA256 over the raw body with the given secret bytes.
    HmacSha256 { secret: Vec<u8> },
    /// Bearer token.
    BearerToken { token: String },
    /// No authentication required.
    None,
}

impl IngressAuth {
    /// Build the auth method from configuration. An HMAC secret takes
    /// precedence over a bearer token; with neither set the webhook is open.
    pub fn from_config(config: &IngressConfig) -> Self {
        if let Some(secret) = &config.hmac_secret {
            return IngressAuth::HmacSha256 {
                secret: secret.as_bytes().to_vec(),
            };
        }
        if let Some(token) = &config.bearer_token {
            return IngressAuth::BearerToken {
                token: token.clone(),
            };
        }
        IngressAuth::None
    }

    /// Verify an incoming request against this auth method.
    ///
    /// `signature_header` is the value of `X-Hub-Signature-256` (if any),
    /// `auth_header` the value of `Authorization` (if any).
    pub fn verify(
        &self,
        body: &[u8],
        signature_header: Option<&str>,
        auth_header: Option<&str>,
    ) -> Result<(), IngressAuthError> {
        match self {
            IngressAuth::HmacSha256 { secret } => {
                let sig = signature_header.ok_or_else(|| {
                    IngressAuthError::MissingAuth("X-Hub-Signature-256 header required".to_string())
                })?;
                verify_hmac_sha256_with_prefix(secret, body, sig)
            }
            IngressAuth::BearerToken { token } => {
                let auth = auth_header.ok_or_else(|| {
                    IngressAuthError::MissingAuth("Authorization header required".to_string())
                })?;
                verify_bearer_token(token, auth)
            }
            IngressAuth::None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// HMAC-SHA256 verification
// ---------------------------------------------------------------------------

/// Verify an HMAC-SHA256 signature against a request body.
///
/// Uses constant-time comparison to prevent timing attacks.
pub fn verify_hmac_sha256(
    secret: &[u8],
    body: &[u8],
    signature_hex: &str,
) -> Result<(), IngressAuthError> {
    let expected_bytes = hex_decode(signature_hex)
        .map_err(|_| IngressAuthError::SignatureVerificationFailed)?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| IngressAuthError::InvalidKey(e.to_string()))?;
    mac.update(body);

    // Constant-time verification (via hmac crate's `verify_slice`)
    mac.verify_slice(&expected_bytes)
        .map_err(|_| IngressAuthError::SignatureVerificationFailed)
}

/// Verify an HMAC-SHA256 signature with an optional `sha256=` prefix.
///
/// GitHub-style webhooks send signatures as `sha256=<hex>`; both prefixed
/// and plain hex signatures are accepted.
pub fn verify_hmac_sha256_with_prefix(
    secret: &[u8],
    body: &[u8],
    signature: &str,
) -> Result<(), IngressAuthError> {
    let hex_sig = signature.strip_prefix("sha256=").unwrap_or(signature);
    verify_hmac_sha256(secret, body, hex_sig)
}

/// Compute HMAC-SHA256 and return the hex-encoded signature.
///
/// Useful for generating signatures on the sending side and in tests.
pub fn compute_hmac_sha256_hex(secret: &[u8], body: &[u8]) -> Result<String, IngressAuthError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| IngressAuthError::InvalidKey(e.to_string()))?;
    mac.update(body);
    let result = mac.finalize();
    Ok(hex_encode(&result.into_bytes()))
}

// ---------------------------------------------------------------------------
// Bearer token verification
// ---------------------------------------------------------------------------

/// Verify a bearer token using constant-time comparison. The provided value
/// may carry a "Bearer " prefix.
pub fn verify_bearer_token(expected: &str, provided: &str) -> Result<(), IngressAuthError> {
    let token = provided.strip_prefix("Bearer ").unwrap_or(provided);

    if constant_time_eq(expected.as_bytes(), token.as_bytes()) {
        Ok(())
    } else {
        Err(IngressAuthError::BearerVerificationFailed)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    if hex.len() % 2 != 0 {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Constant-time byte comparison (XOR-based). Time taken is independent of
/// how many bytes match.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_hmac_sha256_valid() {
        let secret = b"hook-secret";
        let body = b"{\"chatId\":\"alice_bob\"}";
        let sig = compute_hmac_sha256_hex(secret, body).unwrap();
        assert!(verify_hmac_sha256(secret, body, &sig).is_ok());
    }

    #[test]
    fn test_verify_hmac_sha256_rejects_wrong_body() {
        let secret = b"hook-secret";
        let sig = compute_hmac_sha256_hex(secret, b"original").unwrap();
        assert!(verify_hmac_sha256(secret, b"tampered", &sig).is_err());
    }

    #[test]
    fn test_verify_hmac_sha256_rejects_wrong_secret() {
        let body = b"payload";
        let sig = compute_hmac_sha256_hex(b"secret-a", body).unwrap();
        assert!(verify_hmac_sha256(b"secret-b", body, &sig).is_err());
    }

    #[test]
    fn test_verify_hmac_sha256_rejects_invalid_hex() {
        assert!(verify_hmac_sha256(b"secret", b"body", "not-hex").is_err());
        assert!(verify_hmac_sha256(b"secret", b"body", "abc").is_err());
    }

    #[test]
    fn test_verify_hmac_sha256_with_prefix() {
        let secret = b"hook-secret";
        let body = b"payload";
        let sig = compute_hmac_sha256_hex(secret, body).unwrap();

        let prefixed = format!("sha256={sig}");
        assert!(verify_hmac_sha256_with_prefix(secret, body, &prefixed).is_ok());
        assert!(verify_hmac_sha256_with_prefix(secret, body, &sig).is_ok());
    }

    // RFC 4231 test vector 2 (known HMAC-SHA256 result)
    #[test]
    fn test_hmac_sha256_rfc4231_vector() {
        let key = b"Jefe";
        let data = b"what do ya want for nothing?";
        let expected_hex = "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843";

        let computed = compute_hmac_sha256_hex(key, data).unwrap();
        assert_eq!(computed, expected_hex);
        assert!(verify_hmac_sha256(key, data, expected_hex).is_ok());
    }

    #[test]
    fn test_verify_bearer_token() {
        assert!(verify_bearer_token("tok-123", "tok-123").is_ok());
        assert!(verify_bearer_token("tok-123", "Bearer tok-123").is_ok());
        assert!(verify_bearer_token("tok-123", "wrong").is_err());
        assert!(verify_bearer_token("tok-123", "Basic tok-123").is_err());
        assert!(verify_bearer_token("tok-123", "").is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"same", b"same"));
        assert!(!constant_time_eq(b"same", b"diff"));
        assert!(!constant_time_eq(b"short", b"longer"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_from_config_precedence() {
        let open = IngressConfig::default();
        assert!(matches!(IngressAuth::from_config(&open), IngressAuth::None));

        let bearer = IngressConfig {
            bearer_token: Some("tok".to_string()),
            hmac_secret: None,
        };
        assert!(matches!(
            IngressAuth::from_config(&bearer),
            IngressAuth::BearerToken { .. }
        ));

        // HMAC wins when both are configured
        let both = IngressConfig {
            bearer_token: Some("tok".to_string()),
            hmac_secret: Some("sec".to_string()),
        };
        assert!(matches!(
            IngressAuth::from_config(&both),
            IngressAuth::HmacSha256 { .. }
        ));
    }

    #[test]
    fn test_verify_dispatch_per_method() {
        let secret = b"sec";
        let body = b"request body";
        let sig = format!("sha256={}", compute_hmac_sha256_hex(secret, body).unwrap());

        let hmac_auth = IngressAuth::HmacSha256 {
            secret: secret.to_vec(),
        };
        assert!(hmac_auth.verify(body, Some(&sig), None).is_ok());
        assert!(hmac_auth.verify(body, Some("sha256=00"), None).is_err());
        assert!(matches!(
            hmac_auth.verify(body, None, None),
            Err(IngressAuthError::MissingAuth(_))
        ));

        let bearer_auth = IngressAuth::BearerToken {
            token: "tok".to_string(),
        };
        assert!(bearer_auth.verify(body, None, Some("Bearer tok")).is_ok());
        assert!(matches!(
            bearer_auth.verify(body, None, None),
            Err(IngressAuthError::MissingAuth(_))
        ));

        assert!(IngressAuth::None.verify(body, None, None).is_ok());
    }
}
