use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::shared::PaginationParams;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Moderation state. Any state may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 3] = [
        ReviewStatus::Pending,
        ReviewStatus::Approved,
        ReviewStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "PENDING",
            ReviewStatus::Approved => "APPROVED",
            ReviewStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReviewStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::Validation(format!("Unknown review status: {}", s)))
    }
}

pub fn check_rating(rating: i32) -> Result<(), DomainError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(DomainError::Validation(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceReview {
    pub id: String,
    pub service_id: String,
    pub user_id: Option<String>,
    pub booking_id: Option<String>,
    pub customer_name: String,
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub images: Vec<String>,
    pub status: ReviewStatus,
    /// Set when the author has a completed booking for the service
    pub is_verified: bool,
    pub upvotes: i32,
    pub downvotes: i32,
    /// Shop reply shown under the review
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceReview {
    pub fn new(service_id: impl Into<String>, customer_name: impl Into<String>, rating: i32) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            service_id: service_id.into(),
            user_id: None,
            booking_id: None,
            customer_name: customer_name.into(),
            rating,
            title: None,
            comment: None,
            images: Vec::new(),
            status: ReviewStatus::Pending,
            is_verified: false,
            upvotes: 0,
            downvotes: 0,
            response: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub service_id: Option<String>,
    pub rating: Option<i32>,
    pub status: Option<ReviewStatus>,
    pub pagination: PaginationParams,
}

/// Star distribution with its derived average
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    pub total: u64,
    /// 0 when there are no reviews
    pub average: f64,
    /// Count per star, index 0 holding 1-star reviews
    pub distribution: [u64; 5],
}

impl RatingSummary {
    pub fn from_counts(distribution: [u64; 5]) -> Self {
        let total: u64 = distribution.iter().sum();
        let points: u64 = distribution
            .iter()
            .zip(1u64..)
            .map(|(count, stars)| count * stars)
            .sum();
        let average = if total == 0 {
            0.0
        } else {
            points as f64 / total as f64
        };
        Self {
            total,
            average,
            distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_parse_case_insensitively() {
        assert_eq!("approved".parse::<ReviewStatus>().unwrap(), ReviewStatus::Approved);
        assert!(matches!(
            "HIDDEN".parse::<ReviewStatus>().unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn ratings_outside_one_to_five_are_rejected() {
        assert!(check_rating(1).is_ok());
        assert!(check_rating(5).is_ok());
        assert!(check_rating(0).is_err());
        assert!(check_rating(6).is_err());
        assert!(check_rating(-3).is_err());
    }

    #[test]
    fn summary_averages_the_distribution() {
        let summary = RatingSummary::from_counts([0, 0, 1, 0, 3]);
        assert_eq!(summary.total, 4);
        assert!((summary.average - 4.5).abs() < f64::EPSILON);

        let empty = RatingSummary::from_counts([0; 5]);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.average, 0.0);
    }
}
