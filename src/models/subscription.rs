//! Plan subscription model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a subscription record from the database.
///
/// Maps to the `subscriptions` table; one row per `(user, plan)` pair.
/// An ended subscription keeps its row with `is_active = false` and a
/// non-null `ended_at`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub is_active: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Request body for subscribing to a plan.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    /// ID of the pricing plan to subscribe to
    pub plan: Uuid,
}

/// Response body for subscription endpoints.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub is_active: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            plan_id: sub.plan_id,
            is_active: sub.is_active,
            started_at: sub.started_at,
            ended_at: sub.ended_at,
        }
    }
}

/// Response body for the account dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub usage_events: i64,
    pub invoices_total: i64,
    pub invoices_unpaid: i64,
    pub active_subscriptions: i64,
}
