//! # Password Hashing
//!
//! Argon2 hashing for stored user credentials.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`), so the salt and parameters
//! travel with the hash and verification needs no extra state. Used by the
//! seed binary and the user creation endpoint; no login flow exists in this
//! service, so verification is only exercised by tests and future callers.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use thiserror::Error;

/// Error returned when password hashing fails.
#[derive(Debug, Error)]
#[error("Password hashing failed: {0}")]
pub struct PasswordHashError(String);

/// Hashes a plaintext password for storage.
///
/// ## Example
/// ```rust
/// use brew_core::auth::{hash_password, verify_password};
///
/// let hash = hash_password("123").unwrap();
/// assert!(verify_password("123", &hash));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordHashError(e.to_string()))
}

/// Verifies a plaintext password against a stored PHC hash string.
///
/// Returns `false` for malformed hashes as well as mismatches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("123", "not-a-phc-string"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("123").unwrap();
        let b = hash_password("123").unwrap();
        assert_ne!(a, b);
    }
}
