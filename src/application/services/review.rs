//! Service reviews: submission, moderation and rating aggregates

use std::sync::Arc;

use tracing::info;

use crate::domain::booking::{BookingFilter, BookingStatus};
use crate::domain::review::model::check_rating;
use crate::domain::review::{RatingSummary, ReviewFilter, ReviewStatus, ServiceReview};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

pub const MAX_REVIEW_IMAGES: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub service_id: String,
    pub user_id: Option<String>,
    pub booking_id: Option<String>,
    /// Falls back to the account name when signed in
    pub customer_name: Option<String>,
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub rating: Option<i32>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub response: Option<String>,
}

/// Approved reviews of one service with its rating summary
#[derive(Debug)]
pub struct ServiceReviewPage {
    pub page: PaginatedResult<ServiceReview>,
    pub summary: RatingSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewStats {
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
    pub rejected: u64,
    /// Over every review regardless of status
    pub average_rating: f64,
}

pub struct ReviewService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReviewService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(&self, filter: ReviewFilter) -> DomainResult<PaginatedResult<ServiceReview>> {
        self.repos.reviews().list(filter).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<ServiceReview> {
        self.repos
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceReview", "id", id))
    }

    async fn require_service(&self, service_id: &str) -> DomainResult<()> {
        if self.repos.services().find_by_id(service_id).await?.is_none() {
            return Err(DomainError::not_found("Service", "id", service_id));
        }
        Ok(())
    }

    pub async fn list_for_service(
        &self,
        service_id: &str,
        pagination: PaginationParams,
    ) -> DomainResult<ServiceReviewPage> {
        self.require_service(service_id).await?;
        let page = self
            .repos
            .reviews()
            .list(ReviewFilter {
                service_id: Some(service_id.to_string()),
                status: Some(ReviewStatus::Approved),
                pagination,
                ..Default::default()
            })
            .await?;
        let summary = self.service_rating(service_id).await?;
        Ok(ServiceReviewPage { page, summary })
    }

    /// Summary over APPROVED reviews only
    pub async fn service_rating(&self, service_id: &str) -> DomainResult<RatingSummary> {
        let counts = self
            .repos
            .reviews()
            .rating_counts(Some(service_id), Some(ReviewStatus::Approved))
            .await?;
        Ok(RatingSummary::from_counts(counts))
    }

    /// The author counts as verified when they hold a COMPLETED booking for
    /// the service; a given `booking_id` must be that booking.
    async fn is_verified(&self, input: &ReviewInput) -> DomainResult<bool> {
        if let Some(booking_id) = input.booking_id.as_deref() {
            let Some(booking) = self.repos.bookings().find_by_id(booking_id).await? else {
                return Ok(false);
            };
            return Ok(booking.status == BookingStatus::Completed
                && booking.service_id == input.service_id
                && input.user_id.is_some()
                && booking.user_id == input.user_id);
        }
        let Some(user_id) = input.user_id.clone() else {
            return Ok(false);
        };
        let completed = self
            .repos
            .bookings()
            .list(BookingFilter {
                status: Some(BookingStatus::Completed),
                service_id: Some(input.service_id.clone()),
                user_id: Some(user_id),
                pagination: PaginationParams::new(Some(1), Some(1), 1),
                ..Default::default()
            })
            .await?;
        Ok(completed.total > 0)
    }

    async fn author_name(&self, input: &ReviewInput) -> DomainResult<String> {
        if let Some(name) = input.customer_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                return Ok(name.to_string());
            }
        }
        if let Some(user_id) = input.user_id.as_deref() {
            if let Some(user) = self.repos.users().find_by_id(user_id).await? {
                return Ok(user.name);
            }
        }
        Err(DomainError::Validation("customer_name is required".into()))
    }

    /// New reviews wait in PENDING until moderated.
    pub async fn create(&self, input: ReviewInput) -> DomainResult<ServiceReview> {
        if input.service_id.trim().is_empty() {
            return Err(DomainError::Validation("service_id is required".into()));
        }
        check_rating(input.rating)?;
        if input.images.len() > MAX_REVIEW_IMAGES {
            return Err(DomainError::Validation(format!(
                "At most {} images per review",
                MAX_REVIEW_IMAGES
            )));
        }
        self.require_service(&input.service_id).await?;

        let customer_name = self.author_name(&input).await?;
        let is_verified = self.is_verified(&input).await?;

        let mut review = ServiceReview::new(input.service_id, customer_name, input.rating);
        review.user_id = input.user_id;
        review.booking_id = input.booking_id;
        review.title = input.title;
        review.comment = input.comment;
        review.images = input.images;
        review.is_verified = is_verified;

        let review = self.repos.reviews().create(review).await?;
        metrics::counter!("service_reviews_created_total").increment(1);
        info!(review_id = %review.id, service_id = %review.service_id, rating = review.rating, verified = review.is_verified, "Service review submitted");
        Ok(review)
    }

    pub async fn update(&self, id: &str, patch: ReviewPatch) -> DomainResult<ServiceReview> {
        let mut review = self.get(id).await?;
        if let Some(rating) = patch.rating {
            check_rating(rating)?;
            review.rating = rating;
        }
        if patch.title.is_some() {
            review.title = patch.title;
        }
        if patch.comment.is_some() {
            review.comment = patch.comment;
        }
        if patch.response.is_some() {
            review.response = patch.response;
        }
        self.repos.reviews().update(review).await
    }

    /// `status` is the raw wire value; unknown values are a validation error.
    pub async fn update_status(&self, id: &str, status: &str) -> DomainResult<ServiceReview> {
        let next: ReviewStatus = status.parse()?;
        let mut review = self.get(id).await?;
        if review.status == next {
            return Ok(review);
        }
        let previous = review.status;
        review.status = next;
        let review = self.repos.reviews().update(review).await?;
        info!(review_id = %id, from = %previous, to = %next, "Service review moderated");
        Ok(review)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repos.reviews().delete(id).await?;
        info!(review_id = %id, "Service review deleted");
        Ok(())
    }

    /// Count an up-vote (`helpful`) or a down-vote.
    pub async fn mark_helpful(&self, id: &str, helpful: bool) -> DomainResult<ServiceReview> {
        self.repos.reviews().add_vote(id, helpful).await?;
        self.get(id).await
    }

    pub async fn stats(&self) -> DomainResult<ReviewStats> {
        let reviews = self.repos.reviews();
        let all = RatingSummary::from_counts(reviews.rating_counts(None, None).await?);
        Ok(ReviewStats {
            total: all.total,
            approved: reviews.count_by_status(Some(ReviewStatus::Approved)).await?,
            pending: reviews.count_by_status(Some(ReviewStatus::Pending)).await?,
            rejected: reviews.count_by_status(Some(ReviewStatus::Rejected)).await?,
            average_rating: all.average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::Booking;
    use crate::domain::catalog::Service;
    use crate::domain::user::User;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;
    use chrono::Utc;

    struct Fixture {
        svc: ReviewService,
        repos: Arc<dyn RepositoryProvider>,
        service_id: String,
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let service = repos
            .services()
            .create(Service::new("sua-loa-keo", "Sửa loa kéo", 350_000))
            .await
            .unwrap();
        Fixture {
            svc: ReviewService::new(repos.clone()),
            repos,
            service_id: service.id,
        }
    }

    fn input(service_id: &str, rating: i32) -> ReviewInput {
        ReviewInput {
            service_id: service_id.into(),
            customer_name: Some("Vũ Thị H".into()),
            rating,
            comment: Some("Thợ đến đúng giờ".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_validates_rating_and_service() {
        let f = fixture().await;
        for rating in [0, 6] {
            let err = f.svc.create(input(&f.service_id, rating)).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
        let err = f.svc.create(input("missing", 4)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let mut anonymous = input(&f.service_id, 4);
        anonymous.customer_name = None;
        assert!(matches!(
            f.svc.create(anonymous).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let review = f.svc.create(input(&f.service_id, 4)).await.unwrap();
        assert_eq!(review.status, ReviewStatus::Pending);
        assert!(!review.is_verified);
    }

    #[tokio::test]
    async fn only_approved_reviews_count_toward_the_service_rating() {
        let f = fixture().await;
        let five = f.svc.create(input(&f.service_id, 5)).await.unwrap();
        let four = f.svc.create(input(&f.service_id, 4)).await.unwrap();
        let one = f.svc.create(input(&f.service_id, 1)).await.unwrap();

        let summary = f.svc.service_rating(&f.service_id).await.unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average, 0.0);

        f.svc.update_status(&five.id, "APPROVED").await.unwrap();
        f.svc.update_status(&four.id, "approved").await.unwrap();
        f.svc.update_status(&one.id, "REJECTED").await.unwrap();
        assert!(matches!(
            f.svc.update_status(&one.id, "HIDDEN").await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let listing = f
            .svc
            .list_for_service(&f.service_id, PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(listing.page.total, 2);
        assert_eq!(listing.summary.distribution, [0, 0, 0, 1, 1]);
        assert!((listing.summary.average - 4.5).abs() < f64::EPSILON);

        let stats = f.svc.stats().await.unwrap();
        assert_eq!(
            (stats.total, stats.approved, stats.pending, stats.rejected),
            (3, 2, 0, 1)
        );
        assert!((stats.average_rating - 10.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn completed_booking_verifies_the_author() {
        let f = fixture().await;
        let user = f
            .repos
            .users()
            .create(User::new("khach@audiotailoc.com", "Đặng Văn K", "hash"))
            .await
            .unwrap();
        let mut booking = Booking::new(&f.service_id, "Đặng Văn K", "0977000111", Utc::now());
        booking.user_id = Some(user.id.clone());
        let booking = f.repos.bookings().create(booking).await.unwrap();

        let signed_in = ReviewInput {
            user_id: Some(user.id.clone()),
            customer_name: None,
            ..input(&f.service_id, 5)
        };
        let early = f.svc.create(signed_in.clone()).await.unwrap();
        assert!(!early.is_verified);
        assert_eq!(early.customer_name, "Đặng Văn K");

        let mut done = booking.clone();
        for status in [
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
            BookingStatus::Completed,
        ] {
            done.transition_to(status).unwrap();
        }
        f.repos.bookings().update(done).await.unwrap();

        let verified = f.svc.create(signed_in.clone()).await.unwrap();
        assert!(verified.is_verified);

        let stranger = ReviewInput {
            booking_id: Some(booking.id.clone()),
            ..input(&f.service_id, 5)
        };
        assert!(!f.svc.create(stranger).await.unwrap().is_verified);
    }

    #[tokio::test]
    async fn helpful_votes_and_shop_response() {
        let f = fixture().await;
        let review = f.svc.create(input(&f.service_id, 3)).await.unwrap();

        f.svc.mark_helpful(&review.id, true).await.unwrap();
        let voted = f.svc.mark_helpful(&review.id, false).await.unwrap();
        assert_eq!((voted.upvotes, voted.downvotes), (1, 1));

        let answered = f
            .svc
            .update(
                &review.id,
                ReviewPatch {
                    response: Some("Cảm ơn anh/chị đã góp ý".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(answered.response.as_deref(), Some("Cảm ơn anh/chị đã góp ý"));
        assert_eq!(answered.rating, 3);

        let err = f
            .svc
            .update(
                &review.id,
                ReviewPatch {
                    rating: Some(9),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        f.svc.delete(&review.id).await.unwrap();
        assert!(matches!(
            f.svc.mark_helpful(&review.id, true).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
