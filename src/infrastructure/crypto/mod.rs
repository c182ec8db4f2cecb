//! Cryptography: passwords, access tokens and payment signatures

pub mod jwt;
pub mod password;
pub mod signature;

pub use jwt::{create_token, verify_token, JwtConfig, TokenClaims};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LEN};
