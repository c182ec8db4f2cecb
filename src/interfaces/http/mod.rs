//! HTTP REST API interfaces
//!
//! - `common`: Response envelope, pagination and error mapping
//! - `middleware`: Authentication middleware (JWT + API key)
//! - `modules`: Handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use router::create_api_router;
pub use state::AppState;
