//! SeaORM implementation of TechnicianRepository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{db_err, decode_list, encode_list, write_err};
use crate::domain::technician::{
    Technician, TechnicianFilter, TechnicianRepository, TechnicianSchedule,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{technician, technician_schedule};
use crate::shared::PaginatedResult;

fn technician_to_domain(m: technician::Model) -> Technician {
    Technician {
        id: m.id,
        name: m.name,
        phone: m.phone,
        email: m.email,
        specialties: decode_list(&m.specialties),
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn technician_to_active(t: Technician) -> technician::ActiveModel {
    technician::ActiveModel {
        id: Set(t.id),
        name: Set(t.name),
        phone: Set(t.phone),
        email: Set(t.email),
        specialties: Set(encode_list(&t.specialties)),
        is_active: Set(t.is_active),
        created_at: Set(t.created_at),
        updated_at: Set(t.updated_at),
    }
}

fn schedule_to_domain(m: technician_schedule::Model) -> TechnicianSchedule {
    TechnicianSchedule {
        id: m.id,
        technician_id: m.technician_id,
        date: m.date,
        start_time: m.start_time,
        end_time: m.end_time,
        is_available: m.is_available,
    }
}

fn schedule_to_active(s: TechnicianSchedule) -> technician_schedule::ActiveModel {
    technician_schedule::ActiveModel {
        id: Set(s.id),
        technician_id: Set(s.technician_id),
        date: Set(s.date),
        start_time: Set(s.start_time),
        end_time: Set(s.end_time),
        is_available: Set(s.is_available),
    }
}

pub struct SeaOrmTechnicianRepository {
    db: DatabaseConnection,
}

impl SeaOrmTechnicianRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TechnicianRepository for SeaOrmTechnicianRepository {
    async fn list(&self, filter: TechnicianFilter) -> DomainResult<PaginatedResult<Technician>> {
        let mut query = technician::Entity::find();
        if let Some(active) = filter.is_active {
            query = query.filter(technician::Column::IsActive.eq(active));
        }
        if let Some(ref specialty) = filter.specialty {
            // Specialties are a JSON array; match the quoted element.
            query = query.filter(technician::Column::Specialties.contains(format!("\"{}\"", specialty)));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let page = filter.pagination;
        let models = query
            .order_by_asc(technician::Column::Name)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(technician_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Technician>> {
        let model = technician::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(technician_to_domain))
    }

    async fn find_by_phone(&self, phone: &str) -> DomainResult<Option<Technician>> {
        let model = technician::Entity::find()
            .filter(technician::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(technician_to_domain))
    }

    async fn find_active(&self) -> DomainResult<Vec<Technician>> {
        let models = technician::Entity::find()
            .filter(technician::Column::IsActive.eq(true))
            .order_by_asc(technician::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(technician_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Technician>> {
        let models = technician::Entity::find()
            .order_by_asc(technician::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(technician_to_domain).collect())
    }

    async fn create(&self, t: Technician) -> DomainResult<Technician> {
        let result = technician_to_active(t)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || "Số điện thoại đã được sử dụng".to_string()))?;
        info!("Technician created: {} ({})", result.name, result.id);
        Ok(technician_to_domain(result))
    }

    async fn update(&self, mut t: Technician) -> DomainResult<Technician> {
        if self.find_by_id(&t.id).await?.is_none() {
            return Err(DomainError::not_found("Technician", "id", t.id));
        }
        t.updated_at = Utc::now();
        let result = technician_to_active(t)
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, || "Số điện thoại đã được sử dụng".to_string()))?;
        info!("Technician updated: {}", result.id);
        Ok(technician_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = technician::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Technician", "id", id));
        }
        info!("Technician deleted: {}", id);
        Ok(())
    }

    async fn replace_schedules(
        &self,
        technician_id: &str,
        rows: Vec<TechnicianSchedule>,
    ) -> DomainResult<Vec<TechnicianSchedule>> {
        let txn = self.db.begin().await.map_err(db_err)?;

        technician_schedule::Entity::delete_many()
            .filter(technician_schedule::Column::TechnicianId.eq(technician_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let mut saved = Vec::with_capacity(rows.len());
        for row in rows {
            let model = schedule_to_active(row).insert(&txn).await.map_err(db_err)?;
            saved.push(schedule_to_domain(model));
        }

        txn.commit().await.map_err(db_err)?;
        info!(
            "Technician {} schedule replaced ({} rows)",
            technician_id,
            saved.len()
        );
        Ok(saved)
    }

    async fn schedules_for(&self, technician_id: &str) -> DomainResult<Vec<TechnicianSchedule>> {
        let models = technician_schedule::Entity::find()
            .filter(technician_schedule::Column::TechnicianId.eq(technician_id))
            .order_by_asc(technician_schedule::Column::Date)
            .order_by_asc(technician_schedule::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(schedule_to_domain).collect())
    }

    async fn schedules_on(&self, date: NaiveDate) -> DomainResult<Vec<TechnicianSchedule>> {
        let models = technician_schedule::Entity::find()
            .filter(technician_schedule::Column::Date.eq(date))
            .order_by_asc(technician_schedule::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(schedule_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::technician::ScheduleSlot;
    use crate::infrastructure::database::test_connection;

    fn slot(date: &str, start: &str, end: &str) -> ScheduleSlot {
        ScheduleSlot {
            date: date.parse().unwrap(),
            start_time: start.into(),
            end_time: end.into(),
            is_available: true,
        }
    }

    #[tokio::test]
    async fn replace_schedules_drops_previous_rows() {
        let repo = SeaOrmTechnicianRepository::new(test_connection().await);
        let tech = repo
            .create(Technician::new("Vũ Văn G", "0977000111"))
            .await
            .unwrap();

        let first = vec![
            slot("2026-04-01", "08:00", "12:00").into_schedule(&tech.id),
            slot("2026-04-02", "08:00", "12:00").into_schedule(&tech.id),
        ];
        repo.replace_schedules(&tech.id, first).await.unwrap();

        let second = vec![slot("2026-04-03", "13:00", "17:00").into_schedule(&tech.id)];
        repo.replace_schedules(&tech.id, second).await.unwrap();

        let rows = repo.schedules_for(&tech.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].start_time, "13:00");

        let on_day = repo
            .schedules_on("2026-04-03".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(on_day.len(), 1);
    }

    #[tokio::test]
    async fn phone_is_unique() {
        let repo = SeaOrmTechnicianRepository::new(test_connection().await);
        repo.create(Technician::new("A", "0900000001")).await.unwrap();
        let err = repo
            .create(Technician::new("B", "0900000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn specialty_filter_matches_json_element() {
        let repo = SeaOrmTechnicianRepository::new(test_connection().await);
        let mut a = Technician::new("A", "0900000002");
        a.specialties = vec!["karaoke".into()];
        let mut b = Technician::new("B", "0900000003");
        b.specialties = vec!["loa".into()];
        repo.create(a).await.unwrap();
        repo.create(b).await.unwrap();

        let page = repo
            .list(TechnicianFilter {
                specialty: Some("karaoke".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "A");
    }
}
