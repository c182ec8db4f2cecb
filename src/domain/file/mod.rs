//! Uploaded files
//!
//! File metadata rows plus the `FileStorage` seam for the bytes themselves.

pub mod model;
pub mod repository;

pub use model::{FileKind, FileValidationOptions, StoredFile};
pub use repository::{FileRepository, FileStorage};
