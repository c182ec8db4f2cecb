use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{Technician, TechnicianFilter, TechnicianSchedule};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait TechnicianRepository: Send + Sync {
    async fn list(&self, filter: TechnicianFilter) -> DomainResult<PaginatedResult<Technician>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Technician>>;
    async fn find_by_phone(&self, phone: &str) -> DomainResult<Option<Technician>>;
    async fn find_active(&self) -> DomainResult<Vec<Technician>>;
    async fn find_all(&self) -> DomainResult<Vec<Technician>>;
    async fn create(&self, technician: Technician) -> DomainResult<Technician>;
    async fn update(&self, technician: Technician) -> DomainResult<Technician>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    /// Drop every schedule row of the technician and insert `rows`, atomically
    async fn replace_schedules(
        &self,
        technician_id: &str,
        rows: Vec<TechnicianSchedule>,
    ) -> DomainResult<Vec<TechnicianSchedule>>;
    async fn schedules_for(&self, technician_id: &str) -> DomainResult<Vec<TechnicianSchedule>>;
    async fn schedules_on(&self, date: NaiveDate) -> DomainResult<Vec<TechnicianSchedule>>;
}
