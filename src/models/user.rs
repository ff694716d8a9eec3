//! User account model and auth request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. The `password_hash` column holds an argon2id
/// PHC string; the plaintext password is never stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Login name, unique across the platform
    pub username: String,

    /// Contact email address
    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// Argon2id hash of the user's password
    pub password_hash: String,

    /// Staff users may create/update products, plans and guide pages
    pub is_staff: bool,

    /// Timestamp when this account was created
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a new account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,
}

/// Request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for a successful login.
///
/// `access` is an HS256 JWT the client sends back as
/// `Authorization: Bearer <access>`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub user: UserResponse,
}

/// Request body for partial profile updates.
///
/// Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Response body for user/profile endpoints.
///
/// Excludes `password_hash` and `is_staff`.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}
