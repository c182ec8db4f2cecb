//! Application layer: use-case services, identity and seed data

pub mod identity;
pub mod seed;
pub mod services;

pub use identity::{AuthResult, IdentityService};
pub use services::{
    BookingService, CatalogService, ContentService, FileService, I18nService, PaymentService,
    TechnicianService,
};
