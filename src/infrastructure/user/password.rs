//! Password hashing with Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// One-way password hashing
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a plaintext password into a PHC string
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Check a plaintext password against a stored PHC string.
    /// Malformed hashes never verify.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with the crate's default parameters and a random salt per hash
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                self.argon2
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_only_the_original_password() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("Abc123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("Abc123", &hash));
        assert!(!hasher.verify("abc123", &hash));
    }

    #[test]
    fn test_salt_differs_per_hash() {
        let hasher = Argon2Hasher::new();

        let first = hasher.hash("Abc123").unwrap();
        let second = hasher.hash("Abc123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("Abc123", &second));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("Abc123", "not-a-phc-string"));
        assert!(!hasher.verify("Abc123", ""));
    }
}
