//! # Audio Tài Lộc
//!
//! Storefront backend for an audio equipment shop: product catalog,
//! installation/repair bookings, technician scheduling, i18n, payments
//! through VNPAY, MoMo and PayOS, file uploads and site content.
//!
//! ## Architecture
//!
//! - **domain**: Entities, status machines and repository traits
//! - **application**: Use-case services, identity and seed data
//! - **infrastructure**: SeaORM persistence, crypto and file storage
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, pagination, validation helpers and shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, LocalFileStorage};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};
