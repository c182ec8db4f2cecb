//! Catalog aggregate
//!
//! Categories, products and installation/repair services offered by the
//! store. Records are addressed publicly by slug.

pub mod model;
pub mod repository;

pub use model::{Category, Product, ProductFilter, Service};
pub use repository::{CategoryRepository, ProductRepository, ServiceRepository};
