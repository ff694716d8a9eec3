//! Product and pricing plan HTTP handlers.
//!
//! Reads are public; writes require a staff user.
//!
//! - GET /api/v1/products - List active products with nested plans
//! - GET /api/v1/products/{slug} - Get one product by slug
//! - POST /api/v1/products, PATCH /api/v1/products/{id} - Staff writes
//! - GET /api/v1/plans - List active plans (optional ?product= filter)
//! - GET /api/v1/plans/{id} - Get one plan
//! - POST /api/v1/plans, PATCH /api/v1/plans/{id} - Staff writes

use crate::{
    error::AppError,
    handlers::validate_slug,
    middleware::auth::AuthContext,
    models::product::{
        CreatePricingPlanRequest, CreateProductRequest, PricingPlan, PricingPlanResponse,
        Product, ProductResponse, UpdatePricingPlanRequest, UpdateProductRequest,
    },
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

/// List all active products, alphabetically, with their active plans
/// nested.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, slug, short_description, description, is_active, created_at, updated_at
        FROM products
        WHERE is_active = true
        ORDER BY name
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    // One query for all plans, grouped in memory; product counts are small
    let plans = sqlx::query_as::<_, PricingPlan>(
        r#"
        SELECT id, product_id, name, slug, monthly_price_cents, annual_price_cents,
               quota_requests_per_month, is_active
        FROM pricing_plans
        WHERE is_active = true
        ORDER BY monthly_price_cents
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let responses = products
        .into_iter()
        .map(|product| {
            let product_plans = plans
                .iter()
                .filter(|plan| plan.product_id == product.id)
                .cloned()
                .collect();
            ProductResponse::from_parts(product, product_plans)
        })
        .collect();

    Ok(Json(responses))
}

/// Get one active product by slug, with its active plans.
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, slug, short_description, description, is_active, created_at, updated_at
        FROM products
        WHERE slug = $1 AND is_active = true
        "#,
    )
    .bind(&slug)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Product"))?;

    let plans = sqlx::query_as::<_, PricingPlan>(
        r#"
        SELECT id, product_id, name, slug, monthly_price_cents, annual_price_cents,
               quota_requests_per_month, is_active
        FROM pricing_plans
        WHERE product_id = $1 AND is_active = true
        ORDER BY monthly_price_cents
        "#,
    )
    .bind(product.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ProductResponse::from_parts(product, plans)))
}

/// Create a product (staff only).
///
/// # Errors
///
/// - **400**: empty name or invalid slug
/// - **403**: caller is not staff
/// - **409**: duplicate name or slug
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    auth.ensure_staff()?;
    validate_slug(&request.slug)?;
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("name must not be empty".to_string()));
    }

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, slug, short_description, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, slug, short_description, description, is_active, created_at, updated_at
        "#,
    )
    .bind(&request.name)
    .bind(&request.slug)
    .bind(&request.short_description)
    .bind(&request.description)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "A product with this name or slug already exists"))?;

    Ok(Json(ProductResponse::from_parts(product, Vec::new())))
}

/// Partially update a product (staff only). Addressed by slug, like
/// retrieval; the slug itself is immutable.
pub async fn update_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(slug): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    auth.ensure_staff()?;

    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name = COALESCE($2, name),
            short_description = COALESCE($3, short_description),
            description = COALESCE($4, description),
            is_active = COALESCE($5, is_active),
            updated_at = NOW()
        WHERE slug = $1
        RETURNING id, name, slug, short_description, description, is_active, created_at, updated_at
        "#,
    )
    .bind(&slug)
    .bind(request.name)
    .bind(request.short_description)
    .bind(request.description)
    .bind(request.is_active)
    .fetch_optional(&state.pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "A product with this name already exists"))?
    .ok_or(AppError::NotFound("Product"))?;

    let plans = sqlx::query_as::<_, PricingPlan>(
        r#"
        SELECT id, product_id, name, slug, monthly_price_cents, annual_price_cents,
               quota_requests_per_month, is_active
        FROM pricing_plans
        WHERE product_id = $1 AND is_active = true
        ORDER BY monthly_price_cents
        "#,
    )
    .bind(product.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ProductResponse::from_parts(product, plans)))
}

/// Query parameters for listing plans.
#[derive(Debug, Deserialize)]
pub struct PlanFilter {
    /// Restrict to plans of one product
    pub product: Option<Uuid>,
}

/// List active pricing plans, cheapest first.
pub async fn list_plans(
    State(state): State<AppState>,
    Query(filter): Query<PlanFilter>,
) -> Result<Json<Vec<PricingPlanResponse>>, AppError> {
    let plans = sqlx::query_as::<_, PricingPlan>(
        r#"
        SELECT id, product_id, name, slug, monthly_price_cents, annual_price_cents,
               quota_requests_per_month, is_active
        FROM pricing_plans
        WHERE is_active = true AND ($1::uuid IS NULL OR product_id = $1)
        ORDER BY monthly_price_cents
        "#,
    )
    .bind(filter.product)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

/// Get one active pricing plan by id.
pub async fn get_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PricingPlanResponse>, AppError> {
    let plan = sqlx::query_as::<_, PricingPlan>(
        r#"
        SELECT id, product_id, name, slug, monthly_price_cents, annual_price_cents,
               quota_requests_per_month, is_active
        FROM pricing_plans
        WHERE id = $1 AND is_active = true
        "#,
    )
    .bind(plan_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Pricing plan"))?;

    Ok(Json(plan.into()))
}

/// Create a pricing plan (staff only).
///
/// # Errors
///
/// - **400**: negative price/quota or invalid slug
/// - **403**: caller is not staff
/// - **404**: product does not exist
/// - **409**: duplicate slug within the product
pub async fn create_plan(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreatePricingPlanRequest>,
) -> Result<Json<PricingPlanResponse>, AppError> {
    auth.ensure_staff()?;
    validate_slug(&request.slug)?;
    validate_non_negative(request.monthly_price_cents, "monthly_price_cents")?;
    validate_non_negative(request.annual_price_cents, "annual_price_cents")?;
    validate_non_negative(request.quota_requests_per_month, "quota_requests_per_month")?;

    let product_exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM products WHERE id = $1")
        .bind(request.product_id)
        .fetch_optional(&state.pool)
        .await?;
    if product_exists.is_none() {
        return Err(AppError::NotFound("Product"));
    }

    let plan = sqlx::query_as::<_, PricingPlan>(
        r#"
        INSERT INTO pricing_plans
            (product_id, name, slug, monthly_price_cents, annual_price_cents, quota_requests_per_month)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, product_id, name, slug, monthly_price_cents, annual_price_cents,
                  quota_requests_per_month, is_active
        "#,
    )
    .bind(request.product_id)
    .bind(&request.name)
    .bind(&request.slug)
    .bind(request.monthly_price_cents)
    .bind(request.annual_price_cents)
    .bind(request.quota_requests_per_month)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "A plan with this slug already exists for this product"))?;

    Ok(Json(plan.into()))
}

/// Partially update a pricing plan (staff only).
pub async fn update_plan(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<UpdatePricingPlanRequest>,
) -> Result<Json<PricingPlanResponse>, AppError> {
    auth.ensure_staff()?;
    if let Some(cents) = request.monthly_price_cents {
        validate_non_negative(cents, "monthly_price_cents")?;
    }
    if let Some(cents) = request.annual_price_cents {
        validate_non_negative(cents, "annual_price_cents")?;
    }
    if let Some(quota) = request.quota_requests_per_month {
        validate_non_negative(quota, "quota_requests_per_month")?;
    }

    let plan = sqlx::query_as::<_, PricingPlan>(
        r#"
        UPDATE pricing_plans
        SET name = COALESCE($2, name),
            monthly_price_cents = COALESCE($3, monthly_price_cents),
            annual_price_cents = COALESCE($4, annual_price_cents),
            quota_requests_per_month = COALESCE($5, quota_requests_per_month),
            is_active = COALESCE($6, is_active)
        WHERE id = $1
        RETURNING id, product_id, name, slug, monthly_price_cents, annual_price_cents,
                  quota_requests_per_month, is_active
        "#,
    )
    .bind(plan_id)
    .bind(request.name)
    .bind(request.monthly_price_cents)
    .bind(request.annual_price_cents)
    .bind(request.quota_requests_per_month)
    .bind(request.is_active)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Pricing plan"))?;

    Ok(Json(plan.into()))
}

/// Reject negative money/quota values before they hit the CHECK constraint.
fn validate_non_negative(value: i64, field: &str) -> Result<(), AppError> {
    if value < 0 {
        Err(AppError::InvalidRequest(format!(
            "{field} must not be negative"
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validate_non_negative;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0, "x").is_ok());
        assert!(validate_non_negative(999, "x").is_ok());
        assert!(validate_non_negative(-1, "x").is_err());
    }
}
