//! Service review aggregate
//!
//! Customer ratings for bookable services. Reviews start PENDING and only
//! APPROVED ones count toward a service's public rating.

pub mod model;
pub mod repository;

pub use model::{RatingSummary, ReviewFilter, ReviewStatus, ServiceReview};
pub use repository::ReviewRepository;
