use async_trait::async_trait;

use super::model::{BlogArticle, Faq, NewsletterSubscriber, Page, Policy, Testimonial};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait FaqRepository: Send + Sync {
    /// Ordered by `sort_order`
    async fn list(&self, category: Option<&str>, active_only: bool) -> DomainResult<Vec<Faq>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Faq>>;
    async fn find_by_question(&self, question: &str) -> DomainResult<Option<Faq>>;
    async fn create(&self, faq: Faq) -> DomainResult<Faq>;
    async fn update(&self, faq: Faq) -> DomainResult<Faq>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    async fn count(&self) -> DomainResult<u64>;
}

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    async fn list(&self, published_only: bool) -> DomainResult<Vec<Policy>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Policy>>;
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Policy>>;
    async fn create(&self, policy: Policy) -> DomainResult<Policy>;
    async fn update(&self, policy: Policy) -> DomainResult<Policy>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    async fn upsert_by_slug(&self, policy: Policy) -> DomainResult<Policy>;
    async fn count(&self) -> DomainResult<u64>;
}

#[async_trait]
pub trait TestimonialRepository: Send + Sync {
    async fn list(&self, published_only: bool) -> DomainResult<Vec<Testimonial>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Testimonial>>;
    async fn create(&self, testimonial: Testimonial) -> DomainResult<Testimonial>;
    async fn update(&self, testimonial: Testimonial) -> DomainResult<Testimonial>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}

#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn list(&self) -> DomainResult<Vec<Page>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Page>>;
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Page>>;
    async fn create(&self, page: Page) -> DomainResult<Page>;
    async fn update(&self, page: Page) -> DomainResult<Page>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    async fn upsert_by_slug(&self, page: Page) -> DomainResult<Page>;
    async fn count(&self) -> DomainResult<u64>;
}

#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Newest first
    async fn list(
        &self,
        published_only: bool,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<BlogArticle>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<BlogArticle>>;
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<BlogArticle>>;
    async fn create(&self, article: BlogArticle) -> DomainResult<BlogArticle>;
    async fn update(&self, article: BlogArticle) -> DomainResult<BlogArticle>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    async fn increment_views(&self, id: &str) -> DomainResult<()>;
}

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<NewsletterSubscriber>>;
    async fn create(&self, subscriber: NewsletterSubscriber) -> DomainResult<NewsletterSubscriber>;
    async fn update(&self, subscriber: NewsletterSubscriber) -> DomainResult<NewsletterSubscriber>;
    async fn list(
        &self,
        active_only: bool,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<NewsletterSubscriber>>;
}
