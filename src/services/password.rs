//! Password hashing using Argon2id.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::error::AppError;

/// Hash a password into a PHC-format argon2id string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
}

/// Verify a password against a stored PHC hash.
///
/// An unparseable stored hash counts as a verification failure rather than
/// an error: from the caller's perspective the credentials are invalid
/// either way.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("my_secure_password").unwrap();

        assert!(verify_password("my_secure_password", &hash));
        assert!(!verify_password("wrong_password", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hash1 = hash_password("my_secure_password").unwrap();
        let hash2 = hash_password("my_secure_password").unwrap();

        // Different salts produce different hashes
        assert_ne!(hash1, hash2);
        assert!(verify_password("my_secure_password", &hash1));
        assert!(verify_password("my_secure_password", &hash2));
    }

    #[test]
    fn test_verify_invalid_hash() {
        assert!(!verify_password("password", "not_a_phc_string"));
        assert!(!verify_password("password", ""));
    }

    #[test]
    fn test_plaintext_never_stored() {
        let hash = hash_password("hunter2").unwrap();
        assert!(!hash.contains("hunter2"));
    }
}
