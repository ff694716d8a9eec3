//! Product and pricing plan models.
//!
//! Products are the AI agent offerings sold on the platform; each product
//! carries zero or more pricing plans (e.g. Free, Pro, Enterprise).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a product record from the database.
///
/// Maps to the `products` table. `name` and `slug` are globally unique;
/// public endpoints address products by slug.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents a pricing plan record from the database.
///
/// Maps to the `pricing_plans` table. Prices are stored in cents to avoid
/// floating-point errors; the database CHECK constraints keep them
/// non-negative. `(product_id, slug)` is unique.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PricingPlan {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub slug: String,
    pub monthly_price_cents: i64,
    pub annual_price_cents: i64,
    pub quota_requests_per_month: i64,
    pub is_active: bool,
}

/// Request body for creating a product (staff only).
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub slug: String,

    #[serde(default)]
    pub short_description: String,

    #[serde(default)]
    pub description: String,
}

/// Request body for partial product updates (staff only).
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for creating a pricing plan (staff only).
#[derive(Debug, Deserialize)]
pub struct CreatePricingPlanRequest {
    pub product_id: Uuid,
    pub name: String,
    pub slug: String,

    #[serde(default)]
    pub monthly_price_cents: i64,

    #[serde(default)]
    pub annual_price_cents: i64,

    #[serde(default)]
    pub quota_requests_per_month: i64,
}

/// Request body for partial pricing plan updates (staff only).
#[derive(Debug, Deserialize)]
pub struct UpdatePricingPlanRequest {
    pub name: Option<String>,
    pub monthly_price_cents: Option<i64>,
    pub annual_price_cents: Option<i64>,
    pub quota_requests_per_month: Option<i64>,
    pub is_active: Option<bool>,
}

/// Response body for pricing plan endpoints.
#[derive(Debug, Serialize)]
pub struct PricingPlanResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub slug: String,
    pub monthly_price_cents: i64,
    pub annual_price_cents: i64,
    pub quota_requests_per_month: i64,
    pub is_active: bool,
}

impl From<PricingPlan> for PricingPlanResponse {
    fn from(plan: PricingPlan) -> Self {
        Self {
            id: plan.id,
            product_id: plan.product_id,
            name: plan.name,
            slug: plan.slug,
            monthly_price_cents: plan.monthly_price_cents,
            annual_price_cents: plan.annual_price_cents,
            quota_requests_per_month: plan.quota_requests_per_month,
            is_active: plan.is_active,
        }
    }
}

/// Response body for product endpoints, with plans nested.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub plans: Vec<PricingPlanResponse>,
}

impl ProductResponse {
    /// Combine a product row with its plan rows into one response.
    pub fn from_parts(product: Product, plans: Vec<PricingPlan>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            slug: product.slug,
            short_description: product.short_description,
            description: product.description,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
            plans: plans.into_iter().map(Into::into).collect(),
        }
    }
}
