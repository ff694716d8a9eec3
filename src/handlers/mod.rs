//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs the scoped database operation
//! 3. Returns HTTP response (JSON, status code)

use crate::error::AppError;

/// API key management endpoints
pub mod api_keys;
/// Registration and login endpoints
pub mod auth;
/// Invoice and payment method endpoints
pub mod billing;
/// Health check endpoint
pub mod health;
/// Profile, subscription and dashboard endpoints
pub mod me;
/// Static and guide page endpoints
pub mod pages;
/// Product and pricing plan endpoints
pub mod products;
/// Support ticket endpoints
pub mod tickets;
/// Usage metering endpoints
pub mod usage;

/// Validate a URL slug: non-empty, lowercase ASCII letters, digits and
/// hyphens only.
pub(crate) fn validate_slug(slug: &str) -> Result<(), AppError> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!(
            "invalid slug: {slug:?} (lowercase letters, digits and hyphens only)"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_slug;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("agent-pro-2").is_ok());
        assert!(validate_slug("x").is_ok());

        assert!(validate_slug("").is_err());
        assert!(validate_slug("Agent").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug("under_score").is_err());
        assert!(validate_slug("dot.dot").is_err());
    }
}
