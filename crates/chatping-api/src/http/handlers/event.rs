//! Record-created webhook handler -- the pipeline's event ingress.
//!
//! Verifies request authentication, adapts the raw record-created
//! notification into a typed event, and spawns a background pipeline run.
//! The contract toward the trigger source is fire-and-forget: a malformed
//! event is logged and still acknowledged; only transport-level
//! authentication failures are surfaced.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use uuid::Uuid;

use chatping_infra::ingress::IngressAuthError;
use chatping_types::message::RecordCreated;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/events/messages - Receive a record-created notification.
///
/// Authentication is determined by the ingress configuration:
/// - **HMAC-SHA256**: reads `X-Hub-Signature-256`
/// - **Bearer token**: reads `Authorization`
/// - **None**: open (trusted-proxy deployments only)
pub async fn receive_message_created(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let signature_header = headers
        .get("x-hub-signature-256")
        .and_then(|v| v.to_str().ok());
    let auth_header = headers.get("authorization").and_then(|v| v.to_str().ok());

    state
        .ingress_auth
        .verify(&body, signature_header, auth_header)
        .map_err(|e| match e {
            IngressAuthError::MissingAuth(msg) => AppError::Unauthorized(msg),
            _ => AppError::Unauthorized("Webhook authentication failed".to_string()),
        })?;

    // From here on, nothing fails toward the trigger source.
    let accepted = match serde_json::from_slice::<RecordCreated>(&body) {
        Ok(raw) => {
            let chat_id = raw.chat_id.clone();
            let message_id = raw.message_id.clone();
            match raw.into_event() {
                Some(event) => {
                    tracing::info!(
                        chat_id = %event.chat_id,
                        message_id = %event.message_id,
                        "message-created event accepted"
                    );
                    let pipeline = Arc::clone(&state.pipeline);
                    tokio::spawn(async move {
                        let outcome = pipeline.process(&event).await;
                        tracing::debug!(
                            chat_id = %event.chat_id,
                            message_id = %event.message_id,
                            outcome = ?outcome,
                            "pipeline run finished"
                        );
                    });
                    true
                }
                None => {
                    tracing::warn!(
                        chat_id = %chat_id,
                        message_id = %message_id,
                        "record data or sender id missing, event dropped"
                    );
                    false
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "unparseable record-created notification dropped");
            false
        }
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "status": if accepted { "accepted" } else { "dropped" } }),
        request_id,
        elapsed,
    )))
}
