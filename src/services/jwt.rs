//! Session token generation and validation (HS256 JWTs).
//!
//! Session tokens authenticate the account-management surface (profile,
//! keys, billing, ...). Programmatic access uses API keys instead; see
//! [`crate::services::api_key_service`].

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, models::user::User};

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's UUID
    pub sub: String,

    pub username: String,

    /// Issued at (Unix epoch seconds)
    pub iat: i64,

    /// Expiration (Unix epoch seconds); enforced during validation
    pub exp: i64,
}

impl Claims {
    fn new(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Parse the subject claim back into a user id.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Signs and validates session tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: u64,
}

impl JwtService {
    pub fn new(secret: &str, expiration_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_hours,
        }
    }

    /// Generate a signed session token for a user.
    pub fn generate(&self, user: &User) -> Result<String, AppError> {
        let claims = Claims::new(user, self.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign session token: {e}")))
    }

    /// Validate a session token and return its claims.
    ///
    /// Expired or tampered tokens fail with `Unauthenticated`; no detail
    /// is surfaced to the client.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "unused".to_string(),
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_validate() {
        let service = JwtService::new("test-secret-key-12345", 24);
        let user = test_user();

        let token = service.generate(&user).unwrap();
        assert!(!token.is_empty());

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.user_id(), Some(user.id));
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = JwtService::new("test-secret", 24);
        assert!(service.validate("not-a-jwt").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = JwtService::new("secret-1", 24);
        let verifier = JwtService::new("secret-2", 24);

        let token = signer.generate(&test_user()).unwrap();
        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new("test-secret", 24);
        let user = test_user();

        // Craft claims whose expiration is in the past
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: (past - Duration::hours(1)).timestamp(),
            exp: past.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_malformed_subject() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            username: "x".to_string(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(claims.user_id(), None);
    }
}
