use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Booking, BookingFilter, BookingStatus};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list(&self, filter: BookingFilter) -> DomainResult<PaginatedResult<Booking>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;
    /// Bookings for a technician scheduled within `[from, to)`
    async fn find_by_technician(
        &self,
        technician_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<Booking>>;
    async fn count_by_status(&self, status: Option<BookingStatus>) -> DomainResult<u64>;
    async fn count_by_service(&self, service_id: &str) -> DomainResult<u64>;
    async fn create(&self, booking: Booking) -> DomainResult<Booking>;
    async fn update(&self, booking: Booking) -> DomainResult<Booking>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
