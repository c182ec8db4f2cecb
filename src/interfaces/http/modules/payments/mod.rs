//! Orders, payments, refunds and gateway notifications

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
