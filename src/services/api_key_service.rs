//! API key issuance, verification and revocation.
//!
//! Tokens have the form `<prefix>.<secret>`:
//! - `prefix`: 12 random URL-safe characters, public, globally unique,
//!   used as the sole lookup key during verification
//! - `secret`: 43 random URL-safe characters (> 256 bits of entropy)
//!
//! Only the hex SHA-256 hash of the FULL token is persisted. The plaintext
//! is returned to the caller exactly once at issuance and is not
//! recoverable afterwards.

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        api_key::ApiKey,
        user::User,
    },
};
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of the public prefix portion of a token.
pub const PREFIX_LENGTH: usize = 12;

/// Length of the secret portion of a token.
///
/// 43 characters over a 64-symbol alphabet is 258 bits of entropy, the
/// same as a urlsafe encoding of 32 random bytes.
pub const SECRET_LENGTH: usize = 43;

/// URL-safe alphabet used for both token components.
///
/// Must never contain `.`, which is reserved as the prefix/secret
/// separator.
const TOKEN_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// A freshly generated credential, before persistence.
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    /// Full plaintext token, `<prefix>.<secret>` (shown to the caller once)
    pub token: String,

    /// Public lookup prefix
    pub prefix: String,

    /// Hex SHA-256 of the full token, the only part that is stored
    pub hashed_key: String,
}

/// Draw `len` random characters from the URL-safe token alphabet.
fn random_urlsafe(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Generate a new credential: random prefix, random secret, and the hash
/// of their composition.
pub fn generate() -> GeneratedKey {
    let prefix = random_urlsafe(PREFIX_LENGTH);
    let secret = random_urlsafe(SECRET_LENGTH);
    let token = format!("{prefix}.{secret}");
    let hashed_key = hash_token(&token);

    GeneratedKey {
        token,
        prefix,
        hashed_key,
    }
}

/// Hex-encoded SHA-256 digest of the full token string.
///
/// The hash covers the entire token (prefix, separator and secret), so
/// verification must rehash the token exactly as received.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Split a token into its `(prefix, secret)` components.
///
/// Returns `None` unless the token contains exactly one `.` separating two
/// non-empty parts. The generation alphabet contains no `.`, so every
/// issued token splits back into the prefix/secret it was composed from.
pub fn split_token(token: &str) -> Option<(&str, &str)> {
    let (prefix, secret) = token.split_once('.')?;
    if prefix.is_empty() || secret.is_empty() || secret.contains('.') {
        return None;
    }
    Some((prefix, secret))
}

/// Issue a new API key for `user_id`.
///
/// Returns the persisted record together with the plaintext token. A
/// duplicate display name for the same owner (or a prefix collision, which
/// is astronomically unlikely but handled the same way) surfaces as a 409
/// conflict for the caller to retry.
pub async fn issue(
    pool: &DbPool,
    user_id: Uuid,
    name: &str,
) -> Result<(ApiKey, String), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidRequest("name must not be empty".to_string()));
    }

    let generated = generate();

    let key = sqlx::query_as::<_, ApiKey>(
        r#"
        INSERT INTO api_keys (user_id, name, prefix, hashed_key)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, name, prefix, hashed_key, status, created_at, last_used_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(&generated.prefix)
    .bind(&generated.hashed_key)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "An API key with this name already exists"))?;

    tracing::info!(user_id = %user_id, prefix = %key.prefix, "API key issued");

    Ok((key, generated.token))
}

/// Verify an inbound token and resolve it to its key record and owner.
///
/// # Failure signalling
///
/// - Structurally malformed token (not exactly one `.`) -> `MalformedApiKey`
/// - Unknown prefix, hash mismatch, or revoked key -> `InvalidApiKey`,
///   with no externally visible distinction between the three
///
/// # Hot path
///
/// This runs on every API-key-authenticated request, so the lookup is a
/// single point query on the unique `prefix` index. The `last_used_at`
/// bump is folded into the same statement.
pub async fn verify(pool: &DbPool, token: &str) -> Result<(ApiKey, User), AppError> {
    let (prefix, _secret) = split_token(token).ok_or(AppError::MalformedApiKey)?;
    let hashed = hash_token(token);

    let key = sqlx::query_as::<_, ApiKey>(
        r#"
        UPDATE api_keys
        SET last_used_at = NOW()
        WHERE prefix = $1 AND hashed_key = $2 AND status = 'active'
        RETURNING id, user_id, name, prefix, hashed_key, status, created_at, last_used_at
        "#,
    )
    .bind(prefix)
    .bind(&hashed)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::InvalidApiKey)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, is_staff, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(key.user_id)
    .fetch_one(pool)
    .await?;

    Ok((key, user))
}

/// Revoke one of `user_id`'s API keys. Irreversible.
///
/// Only the status column changes. Returns 404 if the key does not exist
/// or belongs to another user (indistinguishable on purpose). Revoking an
/// already revoked key is a no-op that returns the record unchanged.
pub async fn revoke(pool: &DbPool, user_id: Uuid, key_id: Uuid) -> Result<ApiKey, AppError> {
    let key = sqlx::query_as::<_, ApiKey>(
        r#"
        UPDATE api_keys
        SET status = 'revoked'
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, prefix, hashed_key, status, created_at, last_used_at
        "#,
    )
    .bind(key_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("API key"))?;

    tracing::info!(user_id = %user_id, prefix = %key.prefix, "API key revoked");

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let generated = generate();

        assert_eq!(generated.prefix.len(), PREFIX_LENGTH);
        assert_eq!(
            generated.token.len(),
            PREFIX_LENGTH + 1 + SECRET_LENGTH
        );
        assert_eq!(generated.token.matches('.').count(), 1);
        assert!(generated.token.starts_with(&generated.prefix));
    }

    #[test]
    fn test_alphabet_has_no_separator() {
        assert!(!TOKEN_ALPHABET.contains(&b'.'));
    }

    #[test]
    fn test_split_round_trips_generated_tokens() {
        for _ in 0..100 {
            let generated = generate();
            let (prefix, secret) = split_token(&generated.token).unwrap();
            assert_eq!(prefix, generated.prefix);
            assert_eq!(format!("{prefix}.{secret}"), generated.token);
        }
    }

    #[test]
    fn test_split_rejects_malformed_tokens() {
        assert!(split_token("nodot").is_none());
        assert!(split_token("").is_none());
        assert!(split_token(".secret").is_none());
        assert!(split_token("prefix.").is_none());
        assert!(split_token("a.b.c").is_none());
        assert!(split_token("..").is_none());
    }

    #[test]
    fn test_hash_covers_full_token() {
        let generated = generate();

        // Stored hash is never the plaintext
        assert_ne!(generated.hashed_key, generated.token);
        // 32 bytes of SHA-256, hex encoded
        assert_eq!(generated.hashed_key.len(), 64);
        assert_eq!(generated.hashed_key, hash_token(&generated.token));

        // Hashing only the secret portion must NOT match: verification
        // rehashes the whole token
        let (_, secret) = split_token(&generated.token).unwrap();
        assert_ne!(hash_token(secret), generated.hashed_key);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let token = "abcdefghijkl.0123456789012345678901234567890123456789012";
        assert_eq!(hash_token(token), hash_token(token));
    }

    #[test]
    fn test_tampered_token_changes_hash() {
        let generated = generate();
        let mut tampered = generated.token.clone();
        tampered.pop();
        tampered.push('A');
        // Either the tamper was a no-op (same char) or the hash differs
        if tampered != generated.token {
            assert_ne!(hash_token(&tampered), generated.hashed_key);
        }
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let a = generate();
        let b = generate();

        assert_ne!(a.token, b.token);
        assert_ne!(a.prefix, b.prefix);
        assert_ne!(a.hashed_key, b.hashed_key);
    }

    #[test]
    fn test_token_uses_urlsafe_alphabet() {
        let generated = generate();
        let (prefix, secret) = split_token(&generated.token).unwrap();

        for part in [prefix, secret] {
            assert!(part.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
        }
    }
}
