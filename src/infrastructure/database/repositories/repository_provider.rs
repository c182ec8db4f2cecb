//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::catalog::{CategoryRepository, ProductRepository, ServiceRepository};
use crate::domain::content::{
    BlogRepository, FaqRepository, NewsletterRepository, PageRepository, PolicyRepository,
    TestimonialRepository,
};
use crate::domain::file::FileRepository;
use crate::domain::i18n::TranslationRepository;
use crate::domain::payment::{OrderRepository, PaymentRepository};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::review::ReviewRepository;
use crate::domain::technician::TechnicianRepository;
use crate::domain::user::UserRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::catalog_repository::{
    SeaOrmCategoryRepository, SeaOrmProductRepository, SeaOrmServiceRepository,
};
use super::content_repository::{
    SeaOrmBlogRepository, SeaOrmFaqRepository, SeaOrmNewsletterRepository, SeaOrmPageRepository,
    SeaOrmPolicyRepository, SeaOrmTestimonialRepository,
};
use super::file_repository::SeaOrmFileRepository;
use super::order_repository::SeaOrmOrderRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::review_repository::SeaOrmReviewRepository;
use super::technician_repository::SeaOrmTechnicianRepository;
use super::translation_repository::SeaOrmTranslationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let product = repos.products().find_by_slug("loa-jbl-partybox").await?;
/// let slots = repos.technicians().schedules_on(date).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    categories: SeaOrmCategoryRepository,
    products: SeaOrmProductRepository,
    services: SeaOrmServiceRepository,
    bookings: SeaOrmBookingRepository,
    reviews: SeaOrmReviewRepository,
    technicians: SeaOrmTechnicianRepository,
    translations: SeaOrmTranslationRepository,
    orders: SeaOrmOrderRepository,
    payments: SeaOrmPaymentRepository,
    files: SeaOrmFileRepository,
    faqs: SeaOrmFaqRepository,
    policies: SeaOrmPolicyRepository,
    testimonials: SeaOrmTestimonialRepository,
    pages: SeaOrmPageRepository,
    blog: SeaOrmBlogRepository,
    newsletter: SeaOrmNewsletterRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            categories: SeaOrmCategoryRepository::new(db.clone()),
            products: SeaOrmProductRepository::new(db.clone()),
            services: SeaOrmServiceRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            reviews: SeaOrmReviewRepository::new(db.clone()),
            technicians: SeaOrmTechnicianRepository::new(db.clone()),
            translations: SeaOrmTranslationRepository::new(db.clone()),
            orders: SeaOrmOrderRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            files: SeaOrmFileRepository::new(db.clone()),
            faqs: SeaOrmFaqRepository::new(db.clone()),
            policies: SeaOrmPolicyRepository::new(db.clone()),
            testimonials: SeaOrmTestimonialRepository::new(db.clone()),
            pages: SeaOrmPageRepository::new(db.clone()),
            blog: SeaOrmBlogRepository::new(db.clone()),
            newsletter: SeaOrmNewsletterRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn categories(&self) -> &dyn CategoryRepository {
        &self.categories
    }

    fn products(&self) -> &dyn ProductRepository {
        &self.products
    }

    fn services(&self) -> &dyn ServiceRepository {
        &self.services
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn reviews(&self) -> &dyn ReviewRepository {
        &self.reviews
    }

    fn technicians(&self) -> &dyn TechnicianRepository {
        &self.technicians
    }

    fn translations(&self) -> &dyn TranslationRepository {
        &self.translations
    }

    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn files(&self) -> &dyn FileRepository {
        &self.files
    }

    fn faqs(&self) -> &dyn FaqRepository {
        &self.faqs
    }

    fn policies(&self) -> &dyn PolicyRepository {
        &self.policies
    }

    fn testimonials(&self) -> &dyn TestimonialRepository {
        &self.testimonials
    }

    fn pages(&self) -> &dyn PageRepository {
        &self.pages
    }

    fn blog(&self) -> &dyn BlogRepository {
        &self.blog
    }

    fn newsletter(&self) -> &dyn NewsletterRepository {
        &self.newsletter
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
