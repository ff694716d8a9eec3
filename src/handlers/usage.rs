//! Usage metering HTTP handlers.
//!
//! - GET /api/v1/usage/events - List the caller's usage events, with
//!   optional `product` and `api_key_prefix` filters
//! - POST /api/v1/usage/events - Record a usage event

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::usage::{RecordUsageRequest, UsageEvent, UsageEventFilter, UsageEventResponse},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

/// List the caller's usage events, newest first.
///
/// # Query Parameters
///
/// - `product` (optional): only events for this product id
/// - `api_key_prefix` (optional): only events recorded under this key
pub async fn list_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(filter): Query<UsageEventFilter>,
) -> Result<Json<Vec<UsageEventResponse>>, AppError> {
    let events = sqlx::query_as::<_, UsageEvent>(
        r#"
        SELECT id, user_id, product_id, api_key_prefix, endpoint, request_id,
               tokens_in, tokens_out, latency_ms, created_at
        FROM usage_events
        WHERE user_id = $1
          AND ($2::uuid IS NULL OR product_id = $2)
          AND ($3::text IS NULL OR api_key_prefix = $3)
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth.user_id)
    .bind(filter.product)
    .bind(filter.api_key_prefix)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// Record a usage event for the caller.
///
/// When the request authenticated via API key, the key's prefix is stamped
/// on the event for attribution; session-authenticated events carry an
/// empty prefix.
///
/// # Errors
///
/// - **400**: empty endpoint or negative counters
/// - **404**: product does not exist
pub async fn record_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<RecordUsageRequest>,
) -> Result<Json<UsageEventResponse>, AppError> {
    if request.endpoint.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "endpoint must not be empty".to_string(),
        ));
    }
    if request.tokens_in < 0 || request.tokens_out < 0 || request.latency_ms < 0 {
        return Err(AppError::InvalidRequest(
            "tokens_in, tokens_out and latency_ms must not be negative".to_string(),
        ));
    }

    let product_exists: Option<uuid::Uuid> =
        sqlx::query_scalar("SELECT id FROM products WHERE id = $1")
            .bind(request.product_id)
            .fetch_optional(&state.pool)
            .await?;
    if product_exists.is_none() {
        return Err(AppError::NotFound("Product"));
    }

    let event = sqlx::query_as::<_, UsageEvent>(
        r#"
        INSERT INTO usage_events
            (user_id, product_id, api_key_prefix, endpoint, request_id,
             tokens_in, tokens_out, latency_ms)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, product_id, api_key_prefix, endpoint, request_id,
                  tokens_in, tokens_out, latency_ms, created_at
        "#,
    )
    .bind(auth.user_id)
    .bind(request.product_id)
    .bind(auth.api_key_prefix.as_deref().unwrap_or(""))
    .bind(&request.endpoint)
    .bind(&request.request_id)
    .bind(request.tokens_in)
    .bind(request.tokens_out)
    .bind(request.latency_ms)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(event.into()))
}
