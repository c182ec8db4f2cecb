//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::booking::BookingRepository;
use super::catalog::{CategoryRepository, ProductRepository, ServiceRepository};
use super::content::{
    BlogRepository, FaqRepository, NewsletterRepository, PageRepository, PolicyRepository,
    TestimonialRepository,
};
use super::file::FileRepository;
use super::i18n::TranslationRepository;
use super::payment::{OrderRepository, PaymentRepository};
use super::review::ReviewRepository;
use super::technician::TechnicianRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let product = repos.products().find_by_slug("loa-jbl-partybox").await?;
///     let bookings = repos.bookings().find_by_technician(&tech_id, None, None).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn categories(&self) -> &dyn CategoryRepository;
    fn products(&self) -> &dyn ProductRepository;
    fn services(&self) -> &dyn ServiceRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn reviews(&self) -> &dyn ReviewRepository;
    fn technicians(&self) -> &dyn TechnicianRepository;
    fn translations(&self) -> &dyn TranslationRepository;
    fn orders(&self) -> &dyn OrderRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn files(&self) -> &dyn FileRepository;
    fn faqs(&self) -> &dyn FaqRepository;
    fn policies(&self) -> &dyn PolicyRepository;
    fn testimonials(&self) -> &dyn TestimonialRepository;
    fn pages(&self) -> &dyn PageRepository;
    fn blog(&self) -> &dyn BlogRepository;
    fn newsletter(&self) -> &dyn NewsletterRepository;
    fn users(&self) -> &dyn UserRepository;
}
