//! Localization aggregate
//!
//! Languages, the translation table, and per-locale formatting settings.

pub mod model;
pub mod repository;

pub use model::{Language, LocaleSettings, Translation};
pub use repository::TranslationRepository;
