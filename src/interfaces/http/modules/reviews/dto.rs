//! Service review DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::review::{
    ReviewInput, ReviewPatch, ReviewStats, ServiceReviewPage,
};
use crate::domain::review::{RatingSummary, ReviewFilter, ReviewStatus, ServiceReview};
use crate::domain::DomainResult;
use crate::interfaces::http::common::PaginatedResponse;
use crate::shared::PaginationParams;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDto {
    pub id: String,
    pub service_id: String,
    pub user_id: Option<String>,
    pub booking_id: Option<String>,
    pub customer_name: String,
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub images: Vec<String>,
    /// PENDING, APPROVED or REJECTED
    pub status: String,
    pub is_verified: bool,
    pub upvotes: i32,
    pub downvotes: i32,
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceReview> for ReviewDto {
    fn from(r: ServiceReview) -> Self {
        Self {
            id: r.id,
            service_id: r.service_id,
            user_id: r.user_id,
            booking_id: r.booking_id,
            customer_name: r.customer_name,
            rating: r.rating,
            title: r.title,
            comment: r.comment,
            images: r.images,
            status: r.status.to_string(),
            is_verified: r.is_verified,
            upvotes: r.upvotes,
            downvotes: r.downvotes,
            response: r.response,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingSummaryDto {
    pub average_rating: f64,
    pub total_reviews: u64,
    /// Review count keyed by star, "1" through "5"
    pub distribution: std::collections::BTreeMap<String, u64>,
}

impl From<RatingSummary> for RatingSummaryDto {
    fn from(s: RatingSummary) -> Self {
        Self {
            average_rating: s.average,
            total_reviews: s.total,
            distribution: s
                .distribution
                .iter()
                .zip(1..)
                .map(|(count, stars): (&u64, u32)| (stars.to_string(), *count))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceRatingDto {
    pub service_id: String,
    pub average_rating: f64,
    pub total_reviews: u64,
}

impl ServiceRatingDto {
    pub fn new(service_id: String, summary: RatingSummary) -> Self {
        Self {
            service_id,
            average_rating: summary.average,
            total_reviews: summary.total,
        }
    }
}

/// One page of approved reviews plus the service's rating summary
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceReviewsDto {
    pub items: Vec<ReviewDto>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub stats: RatingSummaryDto,
}

impl From<ServiceReviewPage> for ServiceReviewsDto {
    fn from(p: ServiceReviewPage) -> Self {
        let page = PaginatedResponse::from_result(p.page, ReviewDto::from);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
            stats: p.summary.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewStatsDto {
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
    pub rejected: u64,
    pub average_rating: f64,
}

impl From<ReviewStats> for ReviewStatsDto {
    fn from(s: ReviewStats) -> Self {
        Self {
            total: s.total,
            approved: s.approved,
            pending: s.pending,
            rejected: s.rejected,
            average_rating: s.average_rating,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReviewListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub service_id: Option<String>,
    pub rating: Option<i32>,
    pub status: Option<String>,
}

impl ReviewListQuery {
    /// Unknown status values are rejected rather than ignored.
    pub fn into_filter(self) -> DomainResult<ReviewFilter> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<ReviewStatus>)
            .transpose()?;
        Ok(ReviewFilter {
            service_id: self.service_id,
            rating: self.rating,
            status,
            pagination: PaginationParams::new(self.page, self.limit, 20),
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "service_id is required"))]
    pub service_id: String,
    pub booking_id: Option<String>,
    /// Optional when signed in; the account name is used instead
    #[validate(length(min = 1, max = 120))]
    pub customer_name: Option<String>,
    #[validate(range(min = 1, max = 5, message = "rating must be 1-5"))]
    pub rating: i32,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
    #[validate(length(max = 5, message = "at most 5 images"))]
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateReviewRequest {
    pub fn into_input(self, user_id: Option<String>) -> ReviewInput {
        ReviewInput {
            service_id: self.service_id,
            user_id,
            booking_id: self.booking_id,
            customer_name: self.customer_name,
            rating: self.rating,
            title: self.title,
            comment: self.comment,
            images: self.images,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "rating must be 1-5"))]
    pub rating: Option<i32>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
    /// Shop reply
    #[validate(length(max = 2000))]
    pub response: Option<String>,
}

impl From<UpdateReviewRequest> for ReviewPatch {
    fn from(r: UpdateReviewRequest) -> Self {
        Self {
            rating: r.rating,
            title: r.title,
            comment: r.comment,
            response: r.response,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewStatusRequest {
    /// PENDING, APPROVED or REJECTED
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HelpfulRequest {
    /// `false` counts a down-vote
    #[serde(default = "default_helpful")]
    pub helpful: bool,
}

fn default_helpful() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_is_keyed_by_star() {
        let dto = RatingSummaryDto::from(RatingSummary::from_counts([1, 0, 0, 0, 3]));
        assert_eq!(dto.total_reviews, 4);
        assert_eq!(dto.distribution.get("1"), Some(&1));
        assert_eq!(dto.distribution.get("5"), Some(&3));
        assert_eq!(dto.distribution.len(), 5);
    }

    #[test]
    fn create_request_rules() {
        let ok: CreateReviewRequest = serde_json::from_value(serde_json::json!({
            "service_id": "svc",
            "rating": 5
        }))
        .unwrap();
        assert!(ok.validate().is_ok());
        assert!(ok.images.is_empty());

        let bad: CreateReviewRequest = serde_json::from_value(serde_json::json!({
            "service_id": "svc",
            "rating": 7,
            "images": ["a", "b", "c", "d", "e", "f"]
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("rating"));
        assert!(fields.contains_key("images"));
    }

    #[test]
    fn unknown_status_filter_is_rejected() {
        let query = ReviewListQuery {
            page: None,
            limit: None,
            service_id: None,
            rating: None,
            status: Some("HIDDEN".into()),
        };
        assert!(query.into_filter().is_err());
    }
}
