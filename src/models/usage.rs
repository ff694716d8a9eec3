//! Usage metering event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a usage event record from the database.
///
/// One row per metered product request. `api_key_prefix` records which
/// credential made the call (empty when the request was session
/// authenticated); indexed by `(user_id, product_id, created_at)` for the
/// list/filter queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsageEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub api_key_prefix: String,
    pub endpoint: String,
    pub request_id: String,
    pub tokens_in: i64,
    pub tokens_out: i64,
    pub latency_ms: i64,
    pub created_at: DateTime<Utc>,
}

/// Request body for recording a usage event.
#[derive(Debug, Deserialize)]
pub struct RecordUsageRequest {
    pub product_id: Uuid,
    pub endpoint: String,

    #[serde(default)]
    pub request_id: String,

    #[serde(default)]
    pub tokens_in: i64,

    #[serde(default)]
    pub tokens_out: i64,

    #[serde(default)]
    pub latency_ms: i64,
}

/// Query parameters for listing usage events.
#[derive(Debug, Deserialize)]
pub struct UsageEventFilter {
    /// Restrict to events for one product
    pub product: Option<Uuid>,

    /// Restrict to events recorded under one API key prefix
    pub api_key_prefix: Option<String>,
}

/// Response body for usage event endpoints.
#[derive(Debug, Serialize)]
pub struct UsageEventResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub api_key_prefix: String,
    pub endpoint: String,
    pub request_id: String,
    pub tokens_in: i64,
    pub tokens_out: i64,
    pub latency_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UsageEvent> for UsageEventResponse {
    fn from(event: UsageEvent) -> Self {
        Self {
            id: event.id,
            product_id: event.product_id,
            api_key_prefix: event.api_key_prefix,
            endpoint: event.endpoint,
            request_id: event.request_id,
            tokens_in: event.tokens_in,
            tokens_out: event.tokens_out,
            latency_ms: event.latency_ms,
            created_at: event.created_at,
        }
    }
}
