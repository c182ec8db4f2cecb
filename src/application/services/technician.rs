//! Technician roster, schedules and workload reporting

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::domain::booking::BookingStatus;
use crate::domain::technician::{
    find_overlap, ScheduleSlot, Technician, TechnicianFilter, TechnicianSchedule, TechnicianStats,
    TechnicianWorkload, TopTechnician,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{parse_hhmm, PaginatedResult};

pub const DEFAULT_SLOT_MINUTES: u32 = 60;
/// A slot never spans more than one day
pub const MAX_SLOT_MINUTES: u32 = 24 * 60;
const TOP_PERFORMERS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct TechnicianInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub specialties: Vec<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct TechnicianPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Percentage with two decimals; zero when there is nothing to complete
fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = completed as f64 * 100.0 / total as f64;
    (pct * 100.0).round() / 100.0
}

pub struct TechnicianService {
    repos: Arc<dyn RepositoryProvider>,
}

impl TechnicianService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(&self, filter: TechnicianFilter) -> DomainResult<PaginatedResult<Technician>> {
        self.repos.technicians().list(filter).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Technician> {
        self.repos
            .technicians()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Technician", "id", id))
    }

    async fn ensure_phone_free(&self, phone: &str, owner: Option<&str>) -> DomainResult<()> {
        if let Some(existing) = self.repos.technicians().find_by_phone(phone).await? {
            if Some(existing.id.as_str()) != owner {
                return Err(DomainError::Conflict(format!(
                    "Phone {} is already registered",
                    phone
                )));
            }
        }
        Ok(())
    }

    pub async fn create(&self, input: TechnicianInput) -> DomainResult<Technician> {
        let phone = input.phone.trim();
        if input.name.trim().is_empty() || phone.is_empty() {
            return Err(DomainError::Validation("Name and phone are required".into()));
        }
        self.ensure_phone_free(phone, None).await?;

        let mut tech = Technician::new(input.name.trim(), phone);
        tech.email = input.email;
        tech.specialties = input.specialties;
        tech.is_active = input.is_active.unwrap_or(true);

        let tech = self.repos.technicians().create(tech).await?;
        info!(technician_id = %tech.id, "Technician created");
        Ok(tech)
    }

    pub async fn update(&self, id: &str, patch: TechnicianPatch) -> DomainResult<Technician> {
        let mut tech = self.get(id).await?;
        if let Some(phone) = patch.phone {
            let phone = phone.trim().to_string();
            self.ensure_phone_free(&phone, Some(id)).await?;
            tech.phone = phone;
        }
        if let Some(name) = patch.name {
            tech.name = name;
        }
        if patch.email.is_some() {
            tech.email = patch.email;
        }
        if let Some(specialties) = patch.specialties {
            tech.specialties = specialties;
        }
        if let Some(active) = patch.is_active {
            tech.is_active = active;
        }
        self.repos.technicians().update(tech).await
    }

    /// Refused while any of the technician's bookings is still open.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.get(id).await?;
        let open = self
            .repos
            .bookings()
            .find_by_technician(id, None, None)
            .await?
            .into_iter()
            .filter(|b| b.status.is_active())
            .count();
        if open > 0 {
            return Err(DomainError::Conflict(format!(
                "Technician has {} active booking(s)",
                open
            )));
        }
        self.repos.technicians().delete(id).await?;
        info!(technician_id = %id, "Technician deleted");
        Ok(())
    }

    pub async fn get_schedule(&self, id: &str) -> DomainResult<Vec<TechnicianSchedule>> {
        self.get(id).await?;
        self.repos.technicians().schedules_for(id).await
    }

    /// Replace every schedule row of the technician with `slots`.
    pub async fn set_schedule(
        &self,
        id: &str,
        slots: Vec<ScheduleSlot>,
    ) -> DomainResult<Vec<TechnicianSchedule>> {
        self.get(id).await?;
        for slot in &slots {
            let (Some(start), Some(end)) = (parse_hhmm(&slot.start_time), parse_hhmm(&slot.end_time))
            else {
                return Err(DomainError::Validation(format!(
                    "Times must be HH:MM ({} - {})",
                    slot.start_time, slot.end_time
                )));
            };
            if start >= end {
                return Err(DomainError::Validation(format!(
                    "start_time {} must be before end_time {} on {}",
                    slot.start_time, slot.end_time, slot.date
                )));
            }
        }
        if let Some((a, b)) = find_overlap(&slots) {
            return Err(DomainError::Validation(format!(
                "Overlapping slots on {}: {}-{} and {}-{}",
                a.date, a.start_time, a.end_time, b.start_time, b.end_time
            )));
        }

        let rows = slots.into_iter().map(|s| s.into_schedule(id)).collect();
        let saved = self.repos.technicians().replace_schedules(id, rows).await?;
        info!(technician_id = %id, rows = saved.len(), "Schedule replaced");
        Ok(saved)
    }

    /// Active technicians with an open slot covering `[time, time + duration]` on `date`.
    pub async fn available(
        &self,
        date: NaiveDate,
        time: &str,
        duration_minutes: Option<u32>,
        specialty: Option<&str>,
    ) -> DomainResult<Vec<Technician>> {
        let start = parse_hhmm(time)
            .ok_or_else(|| DomainError::Validation(format!("time must be HH:MM, got '{}'", time)))?;
        let duration = duration_minutes.unwrap_or(DEFAULT_SLOT_MINUTES);
        if duration == 0 || duration > MAX_SLOT_MINUTES {
            return Err(DomainError::Validation(format!(
                "duration must be 1-{} minutes",
                MAX_SLOT_MINUTES
            )));
        }

        let schedules = self.repos.technicians().schedules_on(date).await?;
        let technicians = self.repos.technicians().find_active().await?;

        Ok(technicians
            .into_iter()
            .filter(|t| specialty.map_or(true, |s| t.has_specialty(s)))
            .filter(|t| {
                schedules
                    .iter()
                    .any(|s| s.technician_id == t.id && s.covers(start, duration))
            })
            .collect())
    }

    pub async fn workload(
        &self,
        id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<TechnicianWorkload> {
        self.get(id).await?;
        let bookings = self
            .repos
            .bookings()
            .find_by_technician(id, from, to)
            .await?;

        let total = bookings.len() as u64;
        let completed: Vec<_> = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .collect();
        let pending = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Pending)
            .count() as u64;
        let revenue = completed
            .iter()
            .map(|b| b.actual_cost_cents.or(b.estimated_cost_cents).unwrap_or(0))
            .sum();

        Ok(TechnicianWorkload {
            technician_id: id.to_string(),
            total_bookings: total,
            completed_bookings: completed.len() as u64,
            pending_bookings: pending,
            completion_rate: completion_rate(completed.len() as u64, total),
            revenue_cents: revenue,
        })
    }

    pub async fn stats(&self) -> DomainResult<TechnicianStats> {
        let all = self.repos.technicians().find_all().await?;
        let active = all.iter().filter(|t| t.is_active).count() as u64;

        let mut ranked = Vec::with_capacity(all.len());
        for tech in &all {
            let completed = self
                .repos
                .bookings()
                .find_by_technician(&tech.id, None, None)
                .await?
                .iter()
                .filter(|b| b.status == BookingStatus::Completed)
                .count() as u64;
            ranked.push(TopTechnician {
                id: tech.id.clone(),
                name: tech.name.clone(),
                completed_bookings: completed,
            });
        }
        ranked.sort_by(|a, b| {
            b.completed_bookings
                .cmp(&a.completed_bookings)
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(TOP_PERFORMERS);

        Ok(TechnicianStats {
            total: all.len() as u64,
            active,
            inactive: all.len() as u64 - active,
            top_performers: ranked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::Booking;
    use crate::domain::catalog::Service;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    async fn setup() -> (TechnicianService, Arc<dyn RepositoryProvider>) {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        (TechnicianService::new(repos.clone()), repos)
    }

    fn tech(name: &str, phone: &str, specialties: &[&str]) -> TechnicianInput {
        TechnicianInput {
            name: name.into(),
            phone: phone.into(),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn slot(date: NaiveDate, start: &str, end: &str) -> ScheduleSlot {
        ScheduleSlot {
            date,
            start_time: start.into(),
            end_time: end.into(),
            is_available: true,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn phone_must_be_unique() {
        let (svc, _) = setup().await;
        let a = svc.create(tech("A", "0901111111", &[])).await.unwrap();
        let err = svc.create(tech("B", "0901111111", &[])).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let b = svc.create(tech("B", "0902222222", &[])).await.unwrap();
        let err = svc
            .update(
                &b.id,
                TechnicianPatch {
                    phone: Some("0901111111".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        svc.update(
            &a.id,
            TechnicianPatch {
                phone: Some("0901111111".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn schedule_rejects_inverted_and_overlapping_rows() {
        let (svc, _) = setup().await;
        let t = svc.create(tech("A", "0901111111", &[])).await.unwrap();

        let err = svc
            .set_schedule(&t.id, vec![slot(day(), "10:00", "09:00")])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = svc
            .set_schedule(
                &t.id,
                vec![slot(day(), "08:00", "12:00"), slot(day(), "11:00", "13:00")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let saved = svc
            .set_schedule(
                &t.id,
                vec![slot(day(), "08:00", "12:00"), slot(day(), "13:00", "17:00")],
            )
            .await
            .unwrap();
        assert_eq!(saved.len(), 2);
        let saved = svc
            .set_schedule(&t.id, vec![slot(day(), "08:00", "10:00")])
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(svc.get_schedule(&t.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn availability_rejects_out_of_range_duration() {
        let (svc, _) = setup().await;
        let t = svc.create(tech("A", "0901111111", &[])).await.unwrap();
        svc.set_schedule(&t.id, vec![slot(day(), "00:00", "23:59")])
            .await
            .unwrap();

        for duration in [0, MAX_SLOT_MINUTES + 1, u32::MAX] {
            let err = svc
                .available(day(), "09:00", Some(duration), None)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{}", duration);
        }
        let found = svc.available(day(), "00:00", Some(23 * 60), None).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn availability_checks_window_and_specialty() {
        let (svc, _) = setup().await;
        let audio = svc
            .create(tech("A", "0901111111", &["karaoke"]))
            .await
            .unwrap();
        let other = svc.create(tech("B", "0902222222", &["cctv"])).await.unwrap();
        svc.set_schedule(&audio.id, vec![slot(day(), "08:00", "12:00")])
            .await
            .unwrap();
        svc.set_schedule(&other.id, vec![slot(day(), "08:00", "12:00")])
            .await
            .unwrap();

        let found = svc.available(day(), "09:00", None, None).await.unwrap();
        assert_eq!(found.len(), 2);

        let found = svc
            .available(day(), "09:00", None, Some("Karaoke"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, audio.id);

        // 11:30 + 60 minutes runs past the slot
        assert!(svc.available(day(), "11:30", None, None).await.unwrap().is_empty());
        assert!(svc.available(day(), "25:00", None, None).await.is_err());
    }

    #[tokio::test]
    async fn workload_and_delete_guard() {
        let (svc, repos) = setup().await;
        let t = svc.create(tech("A", "0901111111", &[])).await.unwrap();
        let service = repos
            .services()
            .create(Service::new("sua-loa", "Sửa loa", 300_000))
            .await
            .unwrap();

        let mut done = Booking::new(&service.id, "Khách 1", "0900000001", Utc::now());
        done.technician_id = Some(t.id.clone());
        done.status = BookingStatus::Completed;
        done.actual_cost_cents = Some(450_000);
        repos.bookings().create(done).await.unwrap();

        let mut open = Booking::new(&service.id, "Khách 2", "0900000002", Utc::now());
        open.technician_id = Some(t.id.clone());
        let open = repos.bookings().create(open).await.unwrap();

        let w = svc.workload(&t.id, None, None).await.unwrap();
        assert_eq!(w.total_bookings, 2);
        assert_eq!(w.completed_bookings, 1);
        assert_eq!(w.pending_bookings, 1);
        assert_eq!(w.completion_rate, 50.0);
        assert_eq!(w.revenue_cents, 450_000);

        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.top_performers[0].completed_bookings, 1);

        assert!(matches!(
            svc.delete(&t.id).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
        repos.bookings().delete(&open.id).await.unwrap();
        svc.delete(&t.id).await.unwrap();
    }

    #[test]
    fn completion_rate_rounds() {
        assert_eq!(completion_rate(1, 3), 33.33);
        assert_eq!(completion_rate(0, 0), 0.0);
    }
}
