//! Technician DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::technician::{TechnicianInput, TechnicianPatch};
use crate::domain::technician::{
    ScheduleSlot, TechnicianFilter, TechnicianStats, TechnicianWorkload, TopTechnician,
};
use crate::domain::{Technician, TechnicianSchedule};
use crate::shared::{validate_hhmm, validate_phone, PaginationParams};

#[derive(Debug, Serialize, ToSchema)]
pub struct TechnicianDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub specialties: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Technician> for TechnicianDto {
    fn from(t: Technician) -> Self {
        Self {
            id: t.id,
            name: t.name,
            phone: t.phone,
            email: t.email,
            specialties: t.specialties,
            is_active: t.is_active,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleDto {
    pub id: String,
    pub technician_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

impl From<TechnicianSchedule> for ScheduleDto {
    fn from(s: TechnicianSchedule) -> Self {
        Self {
            id: s.id,
            technician_id: s.technician_id,
            date: s.date,
            start_time: s.start_time,
            end_time: s.end_time,
            is_available: s.is_available,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkloadDto {
    pub technician_id: String,
    pub total_bookings: u64,
    pub completed_bookings: u64,
    pub pending_bookings: u64,
    /// Percentage, two decimals
    pub completion_rate: f64,
    pub revenue_cents: i64,
}

impl From<TechnicianWorkload> for WorkloadDto {
    fn from(w: TechnicianWorkload) -> Self {
        Self {
            technician_id: w.technician_id,
            total_bookings: w.total_bookings,
            completed_bookings: w.completed_bookings,
            pending_bookings: w.pending_bookings,
            completion_rate: w.completion_rate,
            revenue_cents: w.revenue_cents,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopTechnicianDto {
    pub id: String,
    pub name: String,
    pub completed_bookings: u64,
}

impl From<TopTechnician> for TopTechnicianDto {
    fn from(t: TopTechnician) -> Self {
        Self {
            id: t.id,
            name: t.name,
            completed_bookings: t.completed_bookings,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TechnicianStatsDto {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub top_performers: Vec<TopTechnicianDto>,
}

impl From<TechnicianStats> for TechnicianStatsDto {
    fn from(s: TechnicianStats) -> Self {
        Self {
            total: s.total,
            active: s.active,
            inactive: s.inactive,
            top_performers: s.top_performers.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TechnicianListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub is_active: Option<bool>,
    pub specialty: Option<String>,
}

impl From<TechnicianListQuery> for TechnicianFilter {
    fn from(q: TechnicianListQuery) -> Self {
        Self {
            is_active: q.is_active,
            specialty: q.specialty.filter(|s| !s.trim().is_empty()),
            pagination: PaginationParams::new(q.page, q.limit, 20),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    /// Day to check, `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Start of the slot, `HH:MM`
    pub time: String,
    /// Minutes, default 60
    pub duration: Option<u32>,
    pub specialty: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WorkloadQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTechnicianRequest {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub is_active: Option<bool>,
}

impl From<CreateTechnicianRequest> for TechnicianInput {
    fn from(r: CreateTechnicianRequest) -> Self {
        Self {
            name: r.name,
            phone: r.phone,
            email: r.email,
            specialties: r.specialties,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTechnicianRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl From<UpdateTechnicianRequest> for TechnicianPatch {
    fn from(r: UpdateTechnicianRequest) -> Self {
        Self {
            name: r.name,
            phone: r.phone,
            email: r.email,
            specialties: r.specialties,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ScheduleSlotRequest {
    pub date: NaiveDate,
    #[validate(custom(function = "validate_hhmm"))]
    pub start_time: String,
    #[validate(custom(function = "validate_hhmm"))]
    pub end_time: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl From<ScheduleSlotRequest> for ScheduleSlot {
    fn from(r: ScheduleSlotRequest) -> Self {
        Self {
            date: r.date,
            start_time: r.start_time,
            end_time: r.end_time,
            is_available: r.is_available,
        }
    }
}

/// Full replacement of a technician's schedule
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetScheduleRequest {
    #[validate(length(max = 500), nested)]
    pub schedules: Vec<ScheduleSlotRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::http::common::validated_json::describe_violations;

    fn slot(start: &str, end: &str) -> ScheduleSlotRequest {
        ScheduleSlotRequest {
            date: NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(),
            start_time: start.into(),
            end_time: end.into(),
            is_available: true,
        }
    }

    #[test]
    fn schedule_rows_are_validated_as_a_list() {
        let ok = SetScheduleRequest {
            schedules: vec![slot("08:00", "12:00")],
        };
        assert!(ok.validate().is_ok());

        let bad = SetScheduleRequest {
            schedules: vec![slot("08:00", "12:00"), slot("8h", "12:00")],
        };
        let message = describe_violations(&bad.validate().unwrap_err());
        assert!(message.contains("schedules[1].start_time"), "{}", message);
    }
}
