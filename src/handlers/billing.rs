//! Billing HTTP handlers: invoices and payment methods.
//!
//! - GET /api/v1/billing/invoices - List the caller's invoices
//! - GET /api/v1/billing/invoices/{id} - Get one invoice
//! - GET /api/v1/billing/payment-methods - List payment methods
//! - POST /api/v1/billing/payment-methods - Attach a payment method
//! - GET /api/v1/billing/payment-methods/{id} - Get one payment method
//! - DELETE /api/v1/billing/payment-methods/{id} - Detach a payment method
//!
//! Invoices are read-only here; the billing pipeline writes them.

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::billing::{
        CreatePaymentMethodRequest, Invoice, InvoiceResponse, PaymentMethod,
        PaymentMethodResponse,
    },
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// List the caller's invoices, newest first.
pub async fn list_invoices(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let invoices = sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, user_id, number, amount_cents, currency, issued_at, paid
        FROM invoices
        WHERE user_id = $1
        ORDER BY issued_at DESC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(invoices.into_iter().map(Into::into).collect()))
}

/// Get one of the caller's invoices by id.
pub async fn get_invoice(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, user_id, number, amount_cents, currency, issued_at, paid
        FROM invoices
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(invoice_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Invoice"))?;

    Ok(Json(invoice.into()))
}

/// List the caller's stored payment methods.
pub async fn list_payment_methods(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<PaymentMethodResponse>>, AppError> {
    let methods = sqlx::query_as::<_, PaymentMethod>(
        r#"
        SELECT id, user_id, stripe_pm_id, brand, last4, exp_month, exp_year
        FROM payment_methods
        WHERE user_id = $1
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(methods.into_iter().map(Into::into).collect()))
}

/// Attach a payment method to the caller's account.
///
/// Only the processor token and display metadata are stored.
///
/// # Errors
///
/// - **400**: empty processor token, out-of-range expiry month, or a
///   `last4` that is not up to four digits
pub async fn create_payment_method(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreatePaymentMethodRequest>,
) -> Result<Json<PaymentMethodResponse>, AppError> {
    if request.stripe_pm_id.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "stripe_pm_id must not be empty".to_string(),
        ));
    }
    if !(1..=12).contains(&request.exp_month) {
        return Err(AppError::InvalidRequest(
            "exp_month must be between 1 and 12".to_string(),
        ));
    }
    if request.last4.len() > 4 || !request.last4.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidRequest(
            "last4 must be at most four digits".to_string(),
        ));
    }

    let method = sqlx::query_as::<_, PaymentMethod>(
        r#"
        INSERT INTO payment_methods (user_id, stripe_pm_id, brand, last4, exp_month, exp_year)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, stripe_pm_id, brand, last4, exp_month, exp_year
        "#,
    )
    .bind(auth.user_id)
    .bind(&request.stripe_pm_id)
    .bind(&request.brand)
    .bind(&request.last4)
    .bind(request.exp_month)
    .bind(request.exp_year)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(method.into()))
}

/// Get one of the caller's payment methods by id.
pub async fn get_payment_method(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(method_id): Path<Uuid>,
) -> Result<Json<PaymentMethodResponse>, AppError> {
    let method = sqlx::query_as::<_, PaymentMethod>(
        r#"
        SELECT id, user_id, stripe_pm_id, brand, last4, exp_month, exp_year
        FROM payment_methods
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(method_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Payment method"))?;

    Ok(Json(method.into()))
}

/// Detach one of the caller's payment methods.
///
/// Returns 204 on success, 404 if the method doesn't exist or belongs to
/// another user.
pub async fn delete_payment_method(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(method_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = sqlx::query("DELETE FROM payment_methods WHERE id = $1 AND user_id = $2")
        .bind(method_id)
        .bind(auth.user_id)
        .execute(&state.pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound("Payment method"));
    }

    Ok(StatusCode::NO_CONTENT)
}
