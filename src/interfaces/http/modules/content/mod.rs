//! FAQ, policies, testimonials, pages, blog and newsletter

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
