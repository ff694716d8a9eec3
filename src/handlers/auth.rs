//! Registration and login HTTP handlers.
//!
//! - POST /api/v1/auth/register - Create a new user account
//! - POST /api/v1/auth/login - Exchange credentials for a session JWT

use crate::{
    error::AppError,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, User, UserResponse},
    services::password,
    state::AppState,
};
use axum::{Json, extract::State};

/// Create a new user account.
///
/// # Endpoint
///
/// `POST /api/v1/auth/register`
///
/// # Request Body
///
/// ```json
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "...",
///   "first_name": "Alice",
///   "last_name": "Smith"
/// }
/// ```
///
/// # Response
///
/// - **Success (200)**: the new user's profile (no token; log in next)
/// - **Error (400)**: empty username/email/password
/// - **Error (409)**: username already taken
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if request.username.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(AppError::InvalidRequest(
            "username, email and password are required".to_string(),
        ));
    }

    let password_hash = password::hash_password(&request.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, first_name, last_name, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, email, first_name, last_name, password_hash, is_staff, created_at
        "#,
    )
    .bind(&request.username)
    .bind(&request.email)
    .bind(&request.first_name)
    .bind(&request.last_name)
    .bind(&password_hash)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Username already taken"))?;

    tracing::info!(username = %user.username, "user registered");

    Ok(Json(user.into()))
}

/// Log in and receive a session token.
///
/// # Endpoint
///
/// `POST /api/v1/auth/login`
///
/// # Response
///
/// - **Success (200)**: `{ "access": "<jwt>", "user": { ... } }`
/// - **Error (401)**: unknown username or wrong password, with one
///   undifferentiated message
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, is_staff, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(&request.username)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&request.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let access = state.jwt.generate(&user)?;

    Ok(Json(LoginResponse {
        access,
        user: user.into(),
    }))
}
