use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::shared::PaginationParams;

/// Booking lifecycle
///
/// ```text
/// Pending ──► Confirmed ──► InProgress ──► Completed
///    │            │              │
///    └────────────┴──────────────┴──────► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Statuses that still occupy a technician
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::Validation(format!("Unknown booking status: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: String,
    pub service_id: String,
    pub technician_id: Option<String>,
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub address: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    /// Local wall-clock slot, "HH:MM"
    pub scheduled_time: Option<String>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub estimated_cost_cents: Option<i64>,
    pub actual_cost_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        service_id: impl Into<String>,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            service_id: service_id.into(),
            technician_id: None,
            user_id: None,
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            customer_email: None,
            address: None,
            scheduled_at,
            scheduled_time: None,
            status: BookingStatus::Pending,
            notes: None,
            estimated_cost_cents: None,
            actual_cost_cents: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`, rejecting moves the lifecycle does not allow.
    /// Re-applying the current status is accepted and changes nothing.
    pub fn transition_to(&mut self, next: BookingStatus) -> Result<(), DomainError> {
        if self.status == next {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                entity: "Booking",
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub technician_id: Option<String>,
    pub service_id: Option<String>,
    pub user_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub pagination: PaginationParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!(
            "IN_PROGRESS".parse::<BookingStatus>().unwrap(),
            BookingStatus::InProgress
        );
        assert_eq!(
            "confirmed".parse::<BookingStatus>().unwrap(),
            BookingStatus::Confirmed
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "DONE".parse::<BookingStatus>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn lifecycle_moves_forward() {
        let mut b = Booking::new("svc", "Nguyễn Văn A", "0901234567", Utc::now());
        b.transition_to(BookingStatus::Confirmed).unwrap();
        b.transition_to(BookingStatus::InProgress).unwrap();
        b.transition_to(BookingStatus::Completed).unwrap();
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn terminal_statuses_are_final() {
        let mut b = Booking::new("svc", "Trần Thị B", "0912345678", Utc::now());
        b.transition_to(BookingStatus::Cancelled).unwrap();
        let err = b.transition_to(BookingStatus::Confirmed).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn cannot_skip_confirmation() {
        let mut b = Booking::new("svc", "Lê C", "0987654321", Utc::now());
        assert!(b.transition_to(BookingStatus::Completed).is_err());
        assert!(b.transition_to(BookingStatus::Pending).is_ok());
    }
}
