//! Identity: registration, login and admin bootstrap

pub mod service;

pub use service::{AuthResult, IdentityService};
