//! Domain layer
//!
//! One module per aggregate (model + repository interface), plus the
//! `RepositoryProvider` that gives services access to all of them.

pub mod booking;
pub mod catalog;
pub mod content;
pub mod file;
pub mod i18n;
pub mod payment;
pub mod repositories;
pub mod review;
pub mod technician;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingStatus};
pub use catalog::{Category, Product, Service};
pub use repositories::{DomainResult, RepositoryProvider};
pub use technician::{Technician, TechnicianSchedule};
pub use user::{User, UserRole};

pub use crate::shared::errors::DomainError;
