//! API key management HTTP handlers.
//!
//! This module implements the key-related API endpoints:
//! - POST /api/v1/keys - Issue a new key (returns the plaintext token once)
//! - GET /api/v1/keys - List the caller's keys
//! - GET /api/v1/keys/{id} - Get one key
//! - POST /api/v1/keys/{id}/revoke - Permanently revoke a key

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::api_key::{ApiKey, ApiKeyResponse, CreateApiKeyRequest, IssuedApiKeyResponse},
    services::api_key_service,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

/// Issue a new API key.
///
/// # Endpoint
///
/// `POST /api/v1/keys`
///
/// # Request Body
///
/// ```json
/// { "name": "ci-bot" }
/// ```
///
/// # Response
///
/// The ONLY response that ever contains the plaintext token. Store it
/// immediately; it cannot be retrieved again.
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "ci-bot",
///   "prefix": "Ab3xYz09Qr_k",
///   "status": "active",
///   "created_at": "2026-01-10T10:00:00Z",
///   "last_used_at": null,
///   "token": "Ab3xYz09Qr_k.<43 secret characters>"
/// }
/// ```
///
/// # Errors
///
/// - **409**: the caller already has a key with this name (retryable with
///   a different name; a random prefix collision surfaces the same way and
///   is retryable as-is)
pub async fn create_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<Json<IssuedApiKeyResponse>, AppError> {
    let (key, token) = api_key_service::issue(&state.pool, auth.user_id, &request.name).await?;

    Ok(Json(IssuedApiKeyResponse {
        key: key.into(),
        token,
    }))
}

/// List the caller's API keys, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/keys`
///
/// Revoked keys are included so the caller can audit their history;
/// responses never contain hashes or plaintext.
pub async fn list_keys(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ApiKeyResponse>>, AppError> {
    let keys = sqlx::query_as::<_, ApiKey>(
        r#"
        SELECT id, user_id, name, prefix, hashed_key, status, created_at, last_used_at
        FROM api_keys
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(keys.into_iter().map(Into::into).collect()))
}

/// Get one of the caller's API keys by id.
///
/// Returns 404 if the key doesn't exist OR belongs to another user
/// (prevents leaking the existence of other users' keys).
pub async fn get_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<Uuid>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let key = sqlx::query_as::<_, ApiKey>(
        r#"
        SELECT id, user_id, name, prefix, hashed_key, status, created_at, last_used_at
        FROM api_keys
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(key_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("API key"))?;

    Ok(Json(key.into()))
}

/// Revoke one of the caller's API keys.
///
/// # Endpoint
///
/// `POST /api/v1/keys/{id}/revoke`
///
/// Sets the key's status to `revoked` and changes nothing else. The
/// operation is irreversible; subsequent verification with the key's token
/// fails like any other invalid credential.
pub async fn revoke_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<Uuid>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let key = api_key_service::revoke(&state.pool, auth.user_id, key_id).await?;

    Ok(Json(key.into()))
}
