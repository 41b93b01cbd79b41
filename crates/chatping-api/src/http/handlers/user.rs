//! Profile and device-token management handlers.
//!
//! Clients (or an admin backend) maintain the profile fields and token set
//! the pipeline reads. Registration is idempotent; deregistration of an
//! unknown token is a 404.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use chatping_core::profile::ProfileStore;
use serde::Deserialize;
use uuid::Uuid;

use chatping_types::profile::UserProfile;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub full_name: Option<String>,
    #[serde(default)]
    pub privileged: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterTokenRequest {
    pub token: String,
}

/// PUT /api/v1/users/{id} - Create or update a profile.
pub async fn upsert_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpsertUserRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user id must not be empty".to_string()));
    }

    state
        .profile_store
        .upsert_profile(&user_id, request.full_name.as_deref(), request.privileged)
        .await?;

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "id": user_id }),
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// GET /api/v1/users/{id} - Fetch a profile with its registered tokens.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let profile = state
        .profile_store
        .get_profile(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))?;

    Ok(Json(ApiResponse::success(
        profile,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// POST /api/v1/users/{id}/tokens - Register a delivery token.
pub async fn register_token(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<RegisterTokenRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    if request.token.trim().is_empty() {
        return Err(AppError::Validation("token must not be empty".to_string()));
    }

    let registered = state
        .profile_store
        .register_token(&user_id, &request.token)
        .await?;
    if !registered {
        return Err(AppError::NotFound(format!("user '{user_id}' not found")));
    }

    tracing::info!(user_id = %user_id, "delivery token registered");

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "registered": true }),
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// DELETE /api/v1/users/{id}/tokens/{token} - Deregister a delivery token.
pub async fn unregister_token(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(String, String)>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let removed = state
        .profile_store
        .unregister_token(&user_id, &token)
        .await?;
    if !removed {
        return Err(AppError::NotFound(format!(
            "token not registered for user '{user_id}'"
        )));
    }

    tracing::info!(user_id = %user_id, "delivery token deregistered");

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "removed": true }),
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}
