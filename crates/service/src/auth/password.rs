use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use super::errors::AuthError;

pub const ARGON2: &str = "argon2";
/// Unsalted SHA-256 hex digests carried over from older accounts.
pub const LEGACY_SHA256: &str = "sha256";

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

pub fn legacy_sha256(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Check `password` against a stored hash produced by `algorithm`.
pub fn verify_password(password: &str, stored: &str, algorithm: &str) -> Result<bool, AuthError> {
    match algorithm {
        ARGON2 => {
            let parsed = PasswordHash::new(stored).map_err(|e| AuthError::HashError(e.to_string()))?;
            Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        }
        LEGACY_SHA256 => Ok(legacy_sha256(password).eq_ignore_ascii_case(stored.trim())),
        other => Err(AuthError::HashError(format!("unsupported password algorithm: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argon2_hash_verifies_and_is_salted() {
        let a = hash_password("Secreta123").unwrap();
        let b = hash_password("Secreta123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("Secreta123", &a, ARGON2).unwrap());
        assert!(!verify_password("secreta123", &a, ARGON2).unwrap());
    }

    #[test]
    fn legacy_digest_matches_known_vector() {
        let digest = legacy_sha256("abc");
        assert_eq!(digest, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert!(verify_password("abc", &digest.to_uppercase(), LEGACY_SHA256).unwrap());
        assert!(!verify_password("abd", &digest, LEGACY_SHA256).unwrap());
    }

    #[test]
    fn unknown_algorithm_is_an_error() {
        assert!(verify_password("x", "y", "md5").is_err());
    }
}
