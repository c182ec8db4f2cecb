use chrono::{DateTime, NaiveDate, Utc};

use crate::shared::{parse_hhmm, PaginationParams};

#[derive(Debug, Clone, PartialEq)]
pub struct Technician {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub specialties: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Technician {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            phone: phone.into(),
            email: None,
            specialties: Vec::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_specialty(&self, specialty: &str) -> bool {
        self.specialties
            .iter()
            .any(|s| s.eq_ignore_ascii_case(specialty))
    }
}

/// One availability row. Times are "HH:MM" on `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicianSchedule {
    pub id: String,
    pub technician_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

impl TechnicianSchedule {
    /// True when this available row spans `[start, start + duration]`,
    /// both given in minutes since midnight.
    pub fn covers(&self, start: u32, duration_minutes: u32) -> bool {
        if !self.is_available {
            return false;
        }
        match (parse_hhmm(&self.start_time), parse_hhmm(&self.end_time)) {
            (Some(from), Some(to)) => {
                from <= start && start.checked_add(duration_minutes).is_some_and(|end| end <= to)
            }
            _ => false,
        }
    }
}

/// Schedule row as submitted, before ids are assigned
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSlot {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

impl ScheduleSlot {
    fn minutes(&self) -> Option<(u32, u32)> {
        Some((parse_hhmm(&self.start_time)?, parse_hhmm(&self.end_time)?))
    }

    pub fn into_schedule(self, technician_id: &str) -> TechnicianSchedule {
        TechnicianSchedule {
            id: uuid::Uuid::new_v4().to_string(),
            technician_id: technician_id.to_string(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            is_available: self.is_available,
        }
    }
}

/// First pair of same-day rows whose time ranges intersect.
/// Rows with unparsable times are ignored here; callers validate them first.
pub fn find_overlap(slots: &[ScheduleSlot]) -> Option<(&ScheduleSlot, &ScheduleSlot)> {
    for (i, a) in slots.iter().enumerate() {
        let Some((a_start, a_end)) = a.minutes() else {
            continue;
        };
        for b in &slots[i + 1..] {
            if a.date != b.date {
                continue;
            }
            let Some((b_start, b_end)) = b.minutes() else {
                continue;
            };
            if a_start < b_end && b_start < a_end {
                return Some((a, b));
            }
        }
    }
    None
}

#[derive(Debug, Clone, Default)]
pub struct TechnicianFilter {
    pub is_active: Option<bool>,
    pub specialty: Option<String>,
    pub pagination: PaginationParams,
}

/// Booking counters for a single technician
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicianWorkload {
    pub technician_id: String,
    pub total_bookings: u64,
    pub completed_bookings: u64,
    pub pending_bookings: u64,
    /// Percentage 0..=100, rounded to two decimals
    pub completion_rate: f64,
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopTechnician {
    pub id: String,
    pub name: String,
    pub completed_bookings: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechnicianStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub top_performers: Vec<TopTechnician>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(date: &str, start: &str, end: &str) -> ScheduleSlot {
        ScheduleSlot {
            date: date.parse().unwrap(),
            start_time: start.into(),
            end_time: end.into(),
            is_available: true,
        }
    }

    #[test]
    fn schedule_covers_window() {
        let row = slot("2026-03-02", "08:00", "12:00").into_schedule("t1");
        assert!(row.covers(8 * 60, 60));
        assert!(row.covers(11 * 60, 60));
        assert!(!row.covers(11 * 60 + 30, 60));
        assert!(!row.covers(7 * 60, 60));
    }

    #[test]
    fn huge_duration_never_covers() {
        let row = slot("2026-03-02", "00:00", "23:59").into_schedule("t1");
        assert!(!row.covers(9 * 60, u32::MAX));
        assert!(!row.covers(u32::MAX, 1));
    }

    #[test]
    fn unavailable_row_covers_nothing() {
        let mut row = slot("2026-03-02", "08:00", "17:00").into_schedule("t1");
        row.is_available = false;
        assert!(!row.covers(9 * 60, 30));
    }

    #[test]
    fn overlap_detected_on_same_day_only() {
        let rows = vec![
            slot("2026-03-02", "08:00", "12:00"),
            slot("2026-03-03", "09:00", "10:00"),
            slot("2026-03-02", "12:00", "17:00"),
        ];
        assert!(find_overlap(&rows).is_none());

        let rows = vec![
            slot("2026-03-02", "08:00", "12:00"),
            slot("2026-03-02", "11:00", "13:00"),
        ];
        assert!(find_overlap(&rows).is_some());
    }

    #[test]
    fn specialty_match_is_case_insensitive() {
        let mut t = Technician::new("Phạm Văn D", "0909000111");
        t.specialties = vec!["Karaoke".into(), "Loa".into()];
        assert!(t.has_specialty("karaoke"));
        assert!(!t.has_specialty("camera"));
    }
}
