//! API key credential model.
//!
//! API keys authenticate programmatic requests. Only the SHA-256 hash of the
//! full token is persisted; the plaintext is returned exactly once, in the
//! creation response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of an API key.
///
/// Revocation is terminal: there is deliberately no operation that maps
/// `Revoked` back to `Active`, and the enum (rather than a bare boolean)
/// keeps it that way at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "api_key_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyStatus {
    Active,
    Revoked,
}

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table:
/// - `prefix`: public 12-character lookup key, globally unique, indexed
/// - `hashed_key`: hex SHA-256 of the full `<prefix>.<secret>` token
/// - `status`: active or revoked
/// - `(user_id, name)` carries a compound uniqueness constraint
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    /// Unique identifier for this API key
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// User-chosen display name, unique per owner
    pub name: String,

    /// Public, non-secret identifier portion of the token.
    ///
    /// Verification looks keys up by prefix alone (one indexed point
    /// query), then compares the stored hash.
    pub prefix: String,

    /// Hex-encoded SHA-256 hash of the full plaintext token (64 chars)
    pub hashed_key: String,

    /// Lifecycle state; `Revoked` is permanent
    pub status: ApiKeyStatus,

    /// Timestamp when this API key was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent successful verification, if any
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Request body for creating a new API key.
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    /// Display name for the new key (unique per owner)
    pub name: String,
}

/// Response body for API key endpoints.
///
/// Excludes `hashed_key`; the plaintext token is never derivable from this.
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: Uuid,
    pub name: String,
    pub prefix: String,
    pub status: ApiKeyStatus,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            prefix: key.prefix,
            status: key.status,
            created_at: key.created_at,
            last_used_at: key.last_used_at,
        }
    }
}

/// Response body for key creation only.
///
/// Carries the plaintext token alongside the persisted fields. This is the
/// one and only time the token leaves the server; it cannot be retrieved
/// again.
#[derive(Debug, Serialize)]
pub struct IssuedApiKeyResponse {
    #[serde(flatten)]
    pub key: ApiKeyResponse,

    /// Full plaintext token, `<prefix>.<secret>`
    pub token: String,
}
