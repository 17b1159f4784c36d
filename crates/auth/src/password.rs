//! Password hashing and verification (Argon2id, salted).
//!
//! Used by the login endpoints only; nothing in request authorization
//! touches credentials.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use nimbuscrm_core::{AuthError, AuthResult};

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::internal(format!("password hashing: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Parameters come from the hash itself; comparison is constant-time inside
/// the crate.
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::internal(format!("stored hash unparseable: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("s3cret-Pa55word").unwrap();

        assert!(verify_password("s3cret-Pa55word", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn same_password_salts_differently() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);

        assert!(verify_password("same", &a).unwrap());
        assert!(verify_password("same", &b).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error_not_a_pass() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
