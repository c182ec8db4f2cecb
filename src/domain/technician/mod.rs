//! Technician aggregate
//!
//! Field technicians, their specialties, and the dated availability rows
//! used to match them against service bookings.

pub mod model;
pub mod repository;

pub use model::{
    find_overlap, ScheduleSlot, Technician, TechnicianFilter, TechnicianSchedule,
    TechnicianStats, TechnicianWorkload, TopTechnician,
};
pub use repository::TechnicianRepository;
