//! Application services: one per storefront area, all over `RepositoryProvider`

pub mod booking;
pub mod catalog;
pub mod content;
pub mod file;
pub mod i18n;
pub mod payment;
pub mod review;
pub mod technician;

pub use booking::BookingService;
pub use catalog::CatalogService;
pub use content::ContentService;
pub use file::FileService;
pub use i18n::I18nService;
pub use payment::PaymentService;
pub use review::ReviewService;
pub use technician::TechnicianService;
