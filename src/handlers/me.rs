//! Account HTTP handlers: profile, subscriptions, dashboard.
//!
//! - GET /api/v1/me/profile - Current user's profile
//! - PATCH /api/v1/me/profile - Partial profile update
//! - GET /api/v1/me/subscriptions - Active subscriptions
//! - POST /api/v1/me/subscribe - Subscribe to a pricing plan
//! - GET /api/v1/me/dashboard - Account activity counters

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        subscription::{
            DashboardResponse, SubscribeRequest, Subscription, SubscriptionResponse,
        },
        user::{UpdateProfileRequest, User, UserResponse},
    },
    state::AppState,
};
use axum::{Extension, Json, extract::State};
use uuid::Uuid;

/// Return the authenticated user's profile.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, is_staff, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(auth.user_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(user.into()))
}

/// Partially update the authenticated user's profile.
///
/// Only `first_name`, `last_name` and `email` are settable; absent fields
/// are left unchanged.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            email = COALESCE($4, email)
        WHERE id = $1
        RETURNING id, username, email, first_name, last_name, password_hash, is_staff, created_at
        "#,
    )
    .bind(auth.user_id)
    .bind(request.first_name)
    .bind(request.last_name)
    .bind(request.email)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(user.into()))
}

/// List the caller's active subscriptions.
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<SubscriptionResponse>>, AppError> {
    let subscriptions = sqlx::query_as::<_, Subscription>(
        r#"
        SELECT id, user_id, plan_id, is_active, started_at, ended_at
        FROM subscriptions
        WHERE user_id = $1 AND is_active = true
        ORDER BY started_at DESC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(subscriptions.into_iter().map(Into::into).collect()))
}

/// Subscribe the caller to a pricing plan.
///
/// # Endpoint
///
/// `POST /api/v1/me/subscribe`
///
/// # Request Body
///
/// ```json
/// { "plan": "660e8400-e29b-41d4-a716-446655440001" }
/// ```
///
/// # Behavior
///
/// Get-or-create on `(user, plan)`. If the caller previously subscribed to
/// this plan and the subscription has ended, the existing row is
/// reactivated (`is_active = true`, `ended_at = null`); charging for the
/// new period is handled by the billing pipeline, not here.
///
/// # Errors
///
/// - **404**: plan does not exist or is inactive
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    // Plan must exist and be open for subscription
    let plan_id: Uuid =
        sqlx::query_scalar("SELECT id FROM pricing_plans WHERE id = $1 AND is_active = true")
            .bind(request.plan)
            .fetch_optional(&state.pool)
            .await?
            .ok_or(AppError::NotFound("Pricing plan"))?;

    let subscription = sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (user_id, plan_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, plan_id)
        DO UPDATE SET is_active = true, ended_at = NULL
        RETURNING id, user_id, plan_id, is_active, started_at, ended_at
        "#,
    )
    .bind(auth.user_id)
    .bind(plan_id)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(user_id = %auth.user_id, plan_id = %plan_id, "subscription created or reactivated");

    Ok(Json(subscription.into()))
}

/// Return activity counters for the caller's dashboard.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<DashboardResponse>, AppError> {
    let usage_events: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM usage_events WHERE user_id = $1")
            .bind(auth.user_id)
            .fetch_one(&state.pool)
            .await?;

    let invoices_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE user_id = $1")
        .bind(auth.user_id)
        .fetch_one(&state.pool)
        .await?;

    let invoices_unpaid: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE user_id = $1 AND paid = false")
            .bind(auth.user_id)
            .fetch_one(&state.pool)
            .await?;

    let active_subscriptions: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM subscriptions WHERE user_id = $1 AND is_active = true",
    )
    .bind(auth.user_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(DashboardResponse {
        usage_events,
        invoices_total,
        invoices_unpaid,
        active_subscriptions,
    }))
}
