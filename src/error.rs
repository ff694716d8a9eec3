//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Missing, malformed, or invalid credentials
/// - **Authorization Errors**: Authenticated but not permitted (staff-only writes)
/// - **Resource Errors**: Requested resources not found
/// - **Conflict Errors**: Uniqueness violations (duplicate key name, username, slug)
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No credentials were presented on a protected route.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Authentication required")]
    Unauthenticated,

    /// An API key token was presented but does not have the
    /// `<prefix>.<secret>` shape (exactly one dot separator).
    ///
    /// Returns HTTP 401 Unauthorized. This is the only authentication
    /// failure that reveals anything beyond "invalid" — and it only
    /// reveals that the token was structurally malformed.
    #[error("Invalid API key format")]
    MalformedApiKey,

    /// API key verification failed.
    ///
    /// Deliberately covers unknown prefix, hash mismatch, and revoked key
    /// with one undifferentiated message so callers cannot tell which part
    /// of the token was wrong. Returns HTTP 401 Unauthorized.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Login failed (unknown username or wrong password, undifferentiated).
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Authenticated user may not perform this operation (staff-only).
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Permission denied")]
    Forbidden,

    /// Requested resource does not exist or belongs to another user.
    ///
    /// Returns HTTP 404 Not Found. The two cases are indistinguishable
    /// on purpose, to avoid leaking the existence of other users' rows.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated (duplicate API key name,
    /// username, slug, ...).
    ///
    /// Returns HTTP 409 Conflict. The caller is expected to retry with
    /// different input (or, for a prefix collision, simply retry).
    #[error("{0}")]
    Conflict(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// Hashing or token signing failed.
    ///
    /// Returns HTTP 500 Internal Server Error; details are logged, not sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a sqlx error to `Conflict` when it is a unique-constraint
    /// violation, otherwise pass it through as a database error.
    ///
    /// Used by create handlers where a duplicate row is an expected,
    /// client-retryable outcome rather than an infrastructure failure.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(message.to_string())
            }
            other => AppError::Database(other),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", self.to_string())
            }
            AppError::MalformedApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key_format",
                self.to_string(),
            ),
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(ref err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_authentication_failures_are_unauthorized() {
        assert_eq!(status_of(AppError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::MalformedApiKey), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::InvalidApiKey), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AppError::NotFound("Product")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::Conflict("duplicate".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::InvalidRequest("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("oops".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Database(sqlx::Error::PoolClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_on_unique_passthrough() {
        // Non-unique-violation errors stay database errors (500)
        let err = AppError::conflict_on_unique(sqlx::Error::PoolClosed, "duplicate");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
