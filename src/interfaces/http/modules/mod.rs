pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod content;
pub mod files;
pub mod health;
pub mod i18n;
pub mod metrics;
pub mod payments;
pub mod request_id;
pub mod reviews;
pub mod technicians;
