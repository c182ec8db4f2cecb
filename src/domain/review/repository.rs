use async_trait::async_trait;

use super::model::{ReviewFilter, ReviewStatus, ServiceReview};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Newest first
    async fn list(&self, filter: ReviewFilter) -> DomainResult<PaginatedResult<ServiceReview>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceReview>>;
    async fn create(&self, review: ServiceReview) -> DomainResult<ServiceReview>;
    async fn update(&self, review: ServiceReview) -> DomainResult<ServiceReview>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    async fn count_by_status(&self, status: Option<ReviewStatus>) -> DomainResult<u64>;
    /// Review count per star, index 0 holding 1-star reviews
    async fn rating_counts(
        &self,
        service_id: Option<&str>,
        status: Option<ReviewStatus>,
    ) -> DomainResult<[u64; 5]>;
    /// Atomically bump the up- or down-vote counter
    async fn add_vote(&self, id: &str, helpful: bool) -> DomainResult<()>;
}
