//! Booking aggregate
//!
//! A customer's request for an installation or repair service, optionally
//! assigned to a technician and driven through a fixed status lifecycle.

pub mod model;
pub mod repository;

pub use model::{Booking, BookingFilter, BookingStatus};
pub use repository::BookingRepository;
