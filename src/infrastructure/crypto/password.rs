//! Password hashing

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::DomainError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    hash(password, DEFAULT_COST).map_err(|e| DomainError::Storage(format!("bcrypt: {}", e)))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let h = hash_password("MatKhau@2024").unwrap();
        assert!(verify_password("MatKhau@2024", &h));
        assert!(!verify_password("sai-mat-khau", &h));
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
