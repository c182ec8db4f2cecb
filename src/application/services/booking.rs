//! Booking use-cases

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use tracing::info;

use crate::domain::booking::{Booking, BookingFilter, BookingStatus};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{parse_hhmm, PaginatedResult};

#[derive(Debug, Clone, Default)]
pub struct BookingInput {
    pub service_id: String,
    pub technician_id: Option<String>,
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub address: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub notes: Option<String>,
    pub estimated_cost_cents: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub address: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub notes: Option<String>,
    pub estimated_cost_cents: Option<i64>,
    pub actual_cost_cents: Option<i64>,
}

fn check_time(time: Option<&str>) -> DomainResult<()> {
    match time {
        Some(t) if parse_hhmm(t).is_none() => Err(DomainError::Validation(format!(
            "scheduled_time must be HH:MM, got '{}'",
            t
        ))),
        _ => Ok(()),
    }
}

/// Clock skew allowed between the client and us for "now" bookings
pub const PAST_GRACE_MINUTES: i64 = 5;

fn check_not_past(at: DateTime<Utc>) -> DomainResult<()> {
    if at < Utc::now() - Duration::minutes(PAST_GRACE_MINUTES) {
        return Err(DomainError::Validation(
            "scheduled_at must not be in the past".into(),
        ));
    }
    Ok(())
}

/// Minutes after midnight of the booked slot; `scheduled_time` wins over
/// the clock time of `scheduled_at`.
fn slot_minutes(booking: &Booking) -> Option<u32> {
    match booking.scheduled_time.as_deref() {
        Some(t) => parse_hhmm(t),
        None => parse_hhmm(&booking.scheduled_at.format("%H:%M").to_string()),
    }
}

fn check_cost(cost: Option<i64>) -> DomainResult<()> {
    if cost.is_some_and(|c| c < 0) {
        return Err(DomainError::Validation("Cost cannot be negative".into()));
    }
    Ok(())
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(&self, filter: BookingFilter) -> DomainResult<PaginatedResult<Booking>> {
        self.repos.bookings().list(filter).await
    }

    /// A technician holds at most one open booking per day and slot.
    async fn check_slot_free(&self, booking: &Booking) -> DomainResult<()> {
        let Some(technician_id) = booking.technician_id.as_deref() else {
            return Ok(());
        };
        if booking.status.is_terminal() {
            return Ok(());
        }
        let day = booking.scheduled_at.date_naive();
        let from = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
        let to = from + Duration::days(1);
        let slot = slot_minutes(booking);

        let taken = self
            .repos
            .bookings()
            .find_by_technician(technician_id, Some(from), Some(to))
            .await?
            .into_iter()
            .any(|other| {
                other.id != booking.id && other.status.is_active() && slot_minutes(&other) == slot
            });
        if taken {
            return Err(DomainError::Conflict(format!(
                "Technician already has a booking at {} on {}",
                booking
                    .scheduled_time
                    .clone()
                    .unwrap_or_else(|| booking.scheduled_at.format("%H:%M").to_string()),
                day
            )));
        }
        Ok(())
    }

    pub async fn get(&self, id: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", id))
    }

    pub async fn create(&self, input: BookingInput) -> DomainResult<Booking> {
        if input.customer_name.trim().is_empty() || input.customer_phone.trim().is_empty() {
            return Err(DomainError::Validation(
                "Customer name and phone are required".into(),
            ));
        }
        check_time(input.scheduled_time.as_deref())?;
        check_cost(input.estimated_cost_cents)?;
        if let Some(at) = input.scheduled_at {
            check_not_past(at)?;
        }

        let service = self
            .repos
            .services()
            .find_by_id(&input.service_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", "id", &input.service_id))?;
        if !service.is_active {
            return Err(DomainError::Validation(format!(
                "Service '{}' is not available for booking",
                service.name
            )));
        }
        if let Some(tech_id) = input.technician_id.as_deref() {
            if self.repos.technicians().find_by_id(tech_id).await?.is_none() {
                return Err(DomainError::not_found("Technician", "id", tech_id));
            }
        }

        let mut booking = Booking::new(
            service.id,
            input.customer_name.trim(),
            input.customer_phone.trim(),
            input.scheduled_at.unwrap_or_else(Utc::now),
        );
        booking.technician_id = input.technician_id;
        booking.user_id = input.user_id;
        booking.customer_email = input.customer_email;
        booking.address = input.address;
        booking.scheduled_time = input.scheduled_time;
        booking.notes = input.notes;
        booking.estimated_cost_cents = input
            .estimated_cost_cents
            .or(Some(service.base_price_cents));
        self.check_slot_free(&booking).await?;

        let booking = self.repos.bookings().create(booking).await?;
        metrics::counter!("bookings_created_total").increment(1);
        info!(booking_id = %booking.id, service = %service.slug, "Booking created");
        Ok(booking)
    }

    pub async fn update(&self, id: &str, patch: BookingPatch) -> DomainResult<Booking> {
        let mut booking = self.get(id).await?;
        check_time(patch.scheduled_time.as_deref())?;
        check_cost(patch.estimated_cost_cents)?;
        check_cost(patch.actual_cost_cents)?;
        if let Some(at) = patch.scheduled_at {
            check_not_past(at)?;
        }
        let reschedules = patch.scheduled_at.is_some() || patch.scheduled_time.is_some();

        if let Some(name) = patch.customer_name {
            booking.customer_name = name;
        }
        if let Some(phone) = patch.customer_phone {
            booking.customer_phone = phone;
        }
        if patch.customer_email.is_some() {
            booking.customer_email = patch.customer_email;
        }
        if patch.address.is_some() {
            booking.address = patch.address;
        }
        if let Some(at) = patch.scheduled_at {
            booking.scheduled_at = at;
        }
        if patch.scheduled_time.is_some() {
            booking.scheduled_time = patch.scheduled_time;
        }
        if patch.notes.is_some() {
            booking.notes = patch.notes;
        }
        if patch.estimated_cost_cents.is_some() {
            booking.estimated_cost_cents = patch.estimated_cost_cents;
        }
        if patch.actual_cost_cents.is_some() {
            booking.actual_cost_cents = patch.actual_cost_cents;
        }
        if reschedules {
            self.check_slot_free(&booking).await?;
        }
        self.repos.bookings().update(booking).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repos.bookings().delete(id).await?;
        info!(booking_id = %id, "Booking deleted");
        Ok(())
    }

    /// `status` is the raw wire value; unknown values are a validation error.
    pub async fn update_status(&self, id: &str, status: &str) -> DomainResult<Booking> {
        let next: BookingStatus = status.parse()?;
        let mut booking = self.get(id).await?;
        let previous = booking.status;
        booking.transition_to(next)?;
        if previous == next {
            return Ok(booking);
        }
        let booking = self.repos.bookings().update(booking).await?;
        info!(booking_id = %id, from = %previous, to = %next, "Booking status changed");
        Ok(booking)
    }

    pub async fn assign_technician(&self, id: &str, technician_id: &str) -> DomainResult<Booking> {
        let mut booking = self.get(id).await?;
        if booking.status.is_terminal() {
            return Err(DomainError::Validation(format!(
                "Booking is already {}",
                booking.status
            )));
        }
        let technician = self
            .repos
            .technicians()
            .find_by_id(technician_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Technician", "id", technician_id))?;
        if !technician.is_active {
            return Err(DomainError::Validation(format!(
                "Technician '{}' is not active",
                technician.name
            )));
        }
        booking.technician_id = Some(technician.id);
        self.check_slot_free(&booking).await?;
        let booking = self.repos.bookings().update(booking).await?;
        info!(booking_id = %id, technician_id = %technician_id, "Technician assigned");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Service;
    use crate::domain::technician::Technician;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    struct Fixture {
        svc: BookingService,
        repos: Arc<dyn RepositoryProvider>,
        service_id: String,
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let service = repos
            .services()
            .create(Service::new("lap-dat-karaoke", "Lắp đặt karaoke", 800_000))
            .await
            .unwrap();
        Fixture {
            svc: BookingService::new(repos.clone()),
            repos,
            service_id: service.id,
        }
    }

    fn input(service_id: &str) -> BookingInput {
        BookingInput {
            service_id: service_id.into(),
            customer_name: "Nguyễn Văn A".into(),
            customer_phone: "0901234567".into(),
            scheduled_time: Some("09:00".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_defaults_cost_to_service_price() {
        let f = fixture().await;
        let b = f.svc.create(input(&f.service_id)).await.unwrap();
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.estimated_cost_cents, Some(800_000));
    }

    #[tokio::test]
    async fn create_rejects_unknown_service_and_bad_time() {
        let f = fixture().await;
        let err = f.svc.create(input("missing")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let mut bad = input(&f.service_id);
        bad.scheduled_time = Some("9h".into());
        assert!(matches!(
            f.svc.create(bad).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn unknown_status_is_validation_error() {
        let f = fixture().await;
        let b = f.svc.create(input(&f.service_id)).await.unwrap();
        let err = f.svc.update_status(&b.id, "DONE").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn status_follows_workflow() {
        let f = fixture().await;
        let b = f.svc.create(input(&f.service_id)).await.unwrap();

        let err = f.svc.update_status(&b.id, "COMPLETED").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        f.svc.update_status(&b.id, "confirmed").await.unwrap();
        f.svc.update_status(&b.id, "CONFIRMED").await.unwrap();
        f.svc.update_status(&b.id, "IN_PROGRESS").await.unwrap();
        let done = f.svc.update_status(&b.id, "COMPLETED").await.unwrap();
        assert_eq!(done.status, BookingStatus::Completed);

        let err = f.svc.update_status(&b.id, "CANCELLED").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn past_schedules_are_refused() {
        let f = fixture().await;
        let mut past = input(&f.service_id);
        past.scheduled_at = Some(Utc::now() - Duration::days(1));
        assert!(matches!(
            f.svc.create(past).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let b = f.svc.create(input(&f.service_id)).await.unwrap();
        let err = f
            .svc
            .update(
                &b.id,
                BookingPatch {
                    scheduled_at: Some(Utc::now() - Duration::hours(2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let notes_only = f
            .svc
            .update(
                &b.id,
                BookingPatch {
                    notes: Some("Gọi trước 30 phút".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(notes_only.notes.as_deref(), Some("Gọi trước 30 phút"));
    }

    #[tokio::test]
    async fn technician_slot_holds_one_open_booking() {
        let f = fixture().await;
        let tech = f
            .repos
            .technicians()
            .create(Technician::new("Phạm D", "0933333333"))
            .await
            .unwrap();
        let day = Utc::now().date_naive() + Duration::days(3);
        let at = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
        let booked = |time: &str| BookingInput {
            technician_id: Some(tech.id.clone()),
            scheduled_at: Some(at),
            scheduled_time: Some(time.into()),
            ..input(&f.service_id)
        };

        let first = f.svc.create(booked("09:00")).await.unwrap();
        let err = f.svc.create(booked("09:00")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)), "{:?}", err);
        let later = f.svc.create(booked("14:00")).await.unwrap();

        let err = f
            .svc
            .update(
                &later.id,
                BookingPatch {
                    scheduled_time: Some("09:00".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let unassigned = f
            .svc
            .create(BookingInput {
                scheduled_at: Some(at),
                scheduled_time: Some("09:00".into()),
                ..input(&f.service_id)
            })
            .await
            .unwrap();
        let err = f
            .svc
            .assign_technician(&unassigned.id, &tech.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        f.svc.update_status(&first.id, "CANCELLED").await.unwrap();
        let b = f
            .svc
            .assign_technician(&unassigned.id, &tech.id)
            .await
            .unwrap();
        assert_eq!(b.technician_id.as_deref(), Some(tech.id.as_str()));
    }

    #[tokio::test]
    async fn assign_requires_active_technician() {
        let f = fixture().await;
        let b = f.svc.create(input(&f.service_id)).await.unwrap();

        let mut idle = Technician::new("Trần B", "0912345678");
        idle.is_active = false;
        let idle = f.repos.technicians().create(idle).await.unwrap();
        assert!(matches!(
            f.svc.assign_technician(&b.id, &idle.id).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let tech = f
            .repos
            .technicians()
            .create(Technician::new("Lê C", "0987654321"))
            .await
            .unwrap();
        let b = f.svc.assign_technician(&b.id, &tech.id).await.unwrap();
        assert_eq!(b.technician_id.as_deref(), Some(tech.id.as_str()));
    }
}
