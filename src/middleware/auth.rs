//! Request authentication middleware.
//!
//! This middleware intercepts every protected request and resolves it to a
//! user identity before handler dispatch. Two credential forms are
//! accepted:
//!
//! 1. An API key token, via the `Api-Key: <prefix>.<secret>` header or the
//!    `api_key` query parameter
//! 2. A session JWT, via `Authorization: Bearer <jwt>`
//!
//! On success an [`AuthContext`] is injected into the request's extension
//! map; handlers extract it with `Extension<AuthContext>`. There is no
//! ambient "current user" anywhere else. On failure the request is
//! rejected with HTTP 401.

use crate::{
    error::AppError,
    models::user::User,
    services::api_key_service,
    state::AppState,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Request header carrying an API key token.
const API_KEY_HEADER: &str = "Api-Key";

/// Query parameter carrying an API key token (fallback for clients that
/// cannot set headers).
const API_KEY_QUERY_PARAM: &str = "api_key";

/// Authentication context attached to authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated user
    ///
    /// Every scoped query filters by this id.
    pub user_id: Uuid,

    /// Username of the authenticated user
    pub username: String,

    /// Whether the user may write to catalog/content resources
    pub is_staff: bool,

    /// Prefix of the API key that authenticated this request, if the
    /// request came in over the API-key path rather than a session token.
    /// Recorded on usage events for attribution.
    pub api_key_prefix: Option<String>,
}

impl AuthContext {
    fn from_user(user: User, api_key_prefix: Option<String>) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            is_staff: user.is_staff,
            api_key_prefix,
        }
    }

    /// Reject non-staff users with 403.
    ///
    /// Used by the create/update handlers of publicly readable resources
    /// (products, plans, guide pages).
    pub fn ensure_staff(&self) -> Result<(), AppError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Pull an API key token out of the request, if one was presented.
///
/// Header takes precedence over the query parameter.
fn extract_api_key_token(request: &Request) -> Option<String> {
    if let Some(token) = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        return Some(token.to_string());
    }

    let query = request.uri().query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == API_KEY_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Authentication middleware function.
///
/// # Flow
///
/// 1. If an API key token is present (header or query param), verify it:
///    hash the full token, point-query by prefix, require active status.
///    A present-but-invalid key fails the request; it never falls through
///    to session auth.
/// 2. Otherwise require `Authorization: Bearer <jwt>` and validate the
///    session token signature and expiry, then load the user.
/// 3. Inject [`AuthContext`] and call the next handler.
///
/// # Errors
///
/// - `MalformedApiKey` / `InvalidApiKey` for API-key failures (401)
/// - `Unauthenticated` for missing or invalid session credentials (401)
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // API-key path
    if let Some(token) = extract_api_key_token(&request) {
        let (key, user) = api_key_service::verify(&state.pool, &token).await?;
        let context = AuthContext::from_user(user, Some(key.prefix));

        request.extensions_mut().insert(context);
        return Ok(next.run(request).await);
    }

    // Session path
    let bearer = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;

    let claims = state.jwt.validate(bearer)?;
    let user_id = claims.user_id().ok_or(AppError::Unauthenticated)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, is_staff, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::Unauthenticated)?;

    let context = AuthContext::from_user(user, None);
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_staff() {
        let staff = AuthContext {
            user_id: Uuid::new_v4(),
            username: "admin".to_string(),
            is_staff: true,
            api_key_prefix: None,
        };
        let regular = AuthContext {
            is_staff: false,
            ..staff.clone()
        };

        assert!(staff.ensure_staff().is_ok());
        assert!(regular.ensure_staff().is_err());
    }

    #[test]
    fn test_extract_api_key_from_header() {
        let request = Request::builder()
            .uri("/api/v1/usage/events")
            .header(API_KEY_HEADER, "abc.def")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(extract_api_key_token(&request), Some("abc.def".to_string()));
    }

    #[test]
    fn test_extract_api_key_from_query_param() {
        let request = Request::builder()
            .uri("/api/v1/usage/events?api_key=abc.def&other=1")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(extract_api_key_token(&request), Some("abc.def".to_string()));
    }

    #[test]
    fn test_header_takes_precedence() {
        let request = Request::builder()
            .uri("/x?api_key=from-query")
            .header(API_KEY_HEADER, "from-header")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(
            extract_api_key_token(&request),
            Some("from-header".to_string())
        );
    }

    #[test]
    fn test_no_credentials() {
        let request = Request::builder()
            .uri("/x")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(extract_api_key_token(&request), None);
    }
}
