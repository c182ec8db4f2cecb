//! File storage backends

pub mod local;

pub use local::LocalFileStorage;
