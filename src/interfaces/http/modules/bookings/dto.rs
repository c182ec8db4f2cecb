//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::booking::{BookingInput, BookingPatch};
use crate::domain::booking::{BookingFilter, BookingStatus};
use crate::domain::{Booking, DomainResult};
use crate::shared::{validate_hhmm, validate_phone, PaginationParams};

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub service_id: String,
    pub technician_id: Option<String>,
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub address: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub scheduled_time: Option<String>,
    /// PENDING, CONFIRMED, IN_PROGRESS, COMPLETED or CANCELLED
    pub status: String,
    pub notes: Option<String>,
    pub estimated_cost_cents: Option<i64>,
    pub actual_cost_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            service_id: b.service_id,
            technician_id: b.technician_id,
            user_id: b.user_id,
            customer_name: b.customer_name,
            customer_phone: b.customer_phone,
            customer_email: b.customer_email,
            address: b.address,
            scheduled_at: b.scheduled_at,
            scheduled_time: b.scheduled_time,
            status: b.status.to_string(),
            notes: b.notes,
            estimated_cost_cents: b.estimated_cost_cents,
            actual_cost_cents: b.actual_cost_cents,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BookingListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub technician_id: Option<String>,
    pub service_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl BookingListQuery {
    /// Unknown status values are rejected rather than ignored.
    pub fn into_filter(self) -> DomainResult<BookingFilter> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<BookingStatus>)
            .transpose()?;
        Ok(BookingFilter {
            status,
            technician_id: self.technician_id,
            service_id: self.service_id,
            user_id: None,
            from: self.from,
            to: self.to,
            pagination: PaginationParams::new(self.page, self.limit, 20),
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub service_id: String,
    pub technician_id: Option<String>,
    #[validate(length(min = 1, max = 120, message = "customer_name is required"))]
    pub customer_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub customer_phone: String,
    #[validate(email(message = "Invalid email"))]
    pub customer_email: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    /// "HH:MM"
    #[validate(custom(function = "validate_hhmm"))]
    pub scheduled_time: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub estimated_cost_cents: Option<i64>,
}

impl CreateBookingRequest {
    pub fn into_input(self, user_id: Option<String>) -> BookingInput {
        BookingInput {
            service_id: self.service_id,
            technician_id: self.technician_id,
            user_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_email: self.customer_email,
            address: self.address,
            scheduled_at: self.scheduled_at,
            scheduled_time: self.scheduled_time,
            notes: self.notes,
            estimated_cost_cents: self.estimated_cost_cents,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingRequest {
    #[validate(length(min = 1, max = 120))]
    pub customer_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub customer_phone: Option<String>,
    #[validate(email)]
    pub customer_email: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(custom(function = "validate_hhmm"))]
    pub scheduled_time: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub estimated_cost_cents: Option<i64>,
    #[validate(range(min = 0))]
    pub actual_cost_cents: Option<i64>,
}

impl From<UpdateBookingRequest> for BookingPatch {
    fn from(r: UpdateBookingRequest) -> Self {
        Self {
            customer_name: r.customer_name,
            customer_phone: r.customer_phone,
            customer_email: r.customer_email,
            address: r.address,
            scheduled_at: r.scheduled_at,
            scheduled_time: r.scheduled_time,
            notes: r.notes,
            estimated_cost_cents: r.estimated_cost_cents,
            actual_cost_cents: r.actual_cost_cents,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingStatusRequest {
    /// Target status; unknown values are rejected with 400
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignTechnicianRequest {
    #[validate(length(min = 1, message = "technician_id is required"))]
    pub technician_id: String,
}
