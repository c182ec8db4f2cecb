//! Service reviews and their moderation

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
