//! Invoice and payment method models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an invoice record from the database.
///
/// Invoices are read-only through the API; they are produced by the billing
/// pipeline out of band. Amounts are stored in cents.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub number: String,
    pub amount_cents: i64,
    pub currency: String,
    pub issued_at: DateTime<Utc>,
    pub paid: bool,
}

/// Response body for invoice endpoints.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub number: String,
    pub amount_cents: i64,
    pub currency: String,
    pub issued_at: DateTime<Utc>,
    pub paid: bool,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            number: invoice.number,
            amount_cents: invoice.amount_cents,
            currency: invoice.currency,
            issued_at: invoice.issued_at,
            paid: invoice.paid,
        }
    }
}

/// Represents a stored payment method from the database.
///
/// Only the processor's token and display metadata are kept; no card
/// numbers touch this service.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stripe_pm_id: String,
    pub brand: String,
    pub last4: String,
    pub exp_month: i16,
    pub exp_year: i16,
}

/// Request body for attaching a payment method.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentMethodRequest {
    pub stripe_pm_id: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub last4: String,

    pub exp_month: i16,
    pub exp_year: i16,
}

/// Response body for payment method endpoints.
#[derive(Debug, Serialize)]
pub struct PaymentMethodResponse {
    pub id: Uuid,
    pub stripe_pm_id: String,
    pub brand: String,
    pub last4: String,
    pub exp_month: i16,
    pub exp_year: i16,
}

impl From<PaymentMethod> for PaymentMethodResponse {
    fn from(pm: PaymentMethod) -> Self {
        Self {
            id: pm.id,
            stripe_pm_id: pm.stripe_pm_id,
            brand: pm.brand,
            last4: pm.last4,
            exp_month: pm.exp_month,
            exp_year: pm.exp_year,
        }
    }
}
