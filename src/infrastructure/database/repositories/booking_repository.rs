//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, parse_or, write_err};
use crate::domain::booking::{Booking, BookingFilter, BookingRepository, BookingStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;
use crate::shared::PaginatedResult;

fn entity_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        service_id: m.service_id,
        technician_id: m.technician_id,
        user_id: m.user_id,
        customer_name: m.customer_name,
        customer_phone: m.customer_phone,
        customer_email: m.customer_email,
        address: m.address,
        scheduled_at: m.scheduled_at,
        scheduled_time: m.scheduled_time,
        status: parse_or(&m.status, BookingStatus::Pending),
        notes: m.notes,
        estimated_cost_cents: m.estimated_cost_cents,
        actual_cost_cents: m.actual_cost_cents,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(b: Booking) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(b.id),
        service_id: Set(b.service_id),
        technician_id: Set(b.technician_id),
        user_id: Set(b.user_id),
        customer_name: Set(b.customer_name),
        customer_phone: Set(b.customer_phone),
        customer_email: Set(b.customer_email),
        address: Set(b.address),
        scheduled_at: Set(b.scheduled_at),
        scheduled_time: Set(b.scheduled_time),
        status: Set(b.status.as_str().to_string()),
        notes: Set(b.notes),
        estimated_cost_cents: Set(b.estimated_cost_cents),
        actual_cost_cents: Set(b.actual_cost_cents),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    }
}

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn list(&self, filter: BookingFilter) -> DomainResult<PaginatedResult<Booking>> {
        let mut query = booking::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(booking::Column::Status.eq(status.as_str()));
        }
        if let Some(ref technician_id) = filter.technician_id {
            query = query.filter(booking::Column::TechnicianId.eq(technician_id.as_str()));
        }
        if let Some(ref service_id) = filter.service_id {
            query = query.filter(booking::Column::ServiceId.eq(service_id.as_str()));
        }
        if let Some(ref user_id) = filter.user_id {
            query = query.filter(booking::Column::UserId.eq(user_id.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(booking::Column::ScheduledAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(booking::Column::ScheduledAt.lt(to));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let page = filter.pagination;
        let models = query
            .order_by_desc(booking::Column::ScheduledAt)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(entity_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_technician(
        &self,
        technician_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<Booking>> {
        let mut query =
            booking::Entity::find().filter(booking::Column::TechnicianId.eq(technician_id));
        if let Some(from) = from {
            query = query.filter(booking::Column::ScheduledAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(booking::Column::ScheduledAt.lt(to));
        }
        let models = query
            .order_by_asc(booking::Column::ScheduledAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn count_by_status(&self, status: Option<BookingStatus>) -> DomainResult<u64> {
        let mut query = booking::Entity::find();
        if let Some(status) = status {
            query = query.filter(booking::Column::Status.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(db_err)
    }

    async fn count_by_service(&self, service_id: &str) -> DomainResult<u64> {
        booking::Entity::find()
            .filter(booking::Column::ServiceId.eq(service_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn create(&self, b: Booking) -> DomainResult<Booking> {
        let result = domain_to_active(b)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || "Booking already exists".to_string()))?;
        info!(
            "Booking created: {} for service {} at {}",
            result.id, result.service_id, result.scheduled_at
        );
        Ok(entity_to_domain(result))
    }

    async fn update(&self, mut b: Booking) -> DomainResult<Booking> {
        if self.find_by_id(&b.id).await?.is_none() {
            return Err(DomainError::not_found("Booking", "id", b.id));
        }
        b.updated_at = Utc::now();
        let result = domain_to_active(b)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        info!("Booking updated: {} [{}]", result.id, result.status);
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = booking::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Booking", "id", id));
        }
        info!("Booking deleted: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Service, ServiceRepository};
    use crate::infrastructure::database::repositories::catalog_repository::SeaOrmServiceRepository;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn status_round_trips_and_filters() {
        let db = test_connection().await;
        let services = SeaOrmServiceRepository::new(db.clone());
        let repo = SeaOrmBookingRepository::new(db);

        let svc = services
            .create(Service::new("sua-amply", "Sửa amply", 300_000))
            .await
            .unwrap();

        let mut booking = Booking::new(&svc.id, "Ngô Văn E", "0933444555", Utc::now());
        booking.transition_to(BookingStatus::Confirmed).unwrap();
        let saved = repo.create(booking).await.unwrap();
        repo.create(Booking::new(&svc.id, "Đỗ Thị F", "0944555666", Utc::now()))
            .await
            .unwrap();

        let loaded = repo.find_by_id(&saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, BookingStatus::Confirmed);

        assert_eq!(repo.count_by_status(None).await.unwrap(), 2);
        assert_eq!(
            repo.count_by_status(Some(BookingStatus::Pending))
                .await
                .unwrap(),
            1
        );

        let confirmed = repo
            .list(BookingFilter {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(confirmed.total, 1);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = SeaOrmBookingRepository::new(test_connection().await);
        let err = repo.delete("nope").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
