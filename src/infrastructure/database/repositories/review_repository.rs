//! SeaORM implementation of ReviewRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, decode_list, encode_list, parse_or, write_err};
use crate::domain::review::{ReviewFilter, ReviewRepository, ReviewStatus, ServiceReview};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::service_review;
use crate::shared::PaginatedResult;

fn entity_to_domain(m: service_review::Model) -> ServiceReview {
    ServiceReview {
        id: m.id,
        service_id: m.service_id,
        user_id: m.user_id,
        booking_id: m.booking_id,
        customer_name: m.customer_name,
        rating: m.rating,
        title: m.title,
        comment: m.comment,
        images: decode_list(&m.images),
        status: parse_or(&m.status, ReviewStatus::Pending),
        is_verified: m.is_verified,
        upvotes: m.upvotes,
        downvotes: m.downvotes,
        response: m.response,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(r: ServiceReview) -> service_review::ActiveModel {
    service_review::ActiveModel {
        id: Set(r.id),
        service_id: Set(r.service_id),
        user_id: Set(r.user_id),
        booking_id: Set(r.booking_id),
        customer_name: Set(r.customer_name),
        rating: Set(r.rating),
        title: Set(r.title),
        comment: Set(r.comment),
        images: Set(encode_list(&r.images)),
        status: Set(r.status.as_str().to_string()),
        is_verified: Set(r.is_verified),
        upvotes: Set(r.upvotes),
        downvotes: Set(r.downvotes),
        response: Set(r.response),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn list(&self, filter: ReviewFilter) -> DomainResult<PaginatedResult<ServiceReview>> {
        let mut query = service_review::Entity::find();

        if let Some(ref service_id) = filter.service_id {
            query = query.filter(service_review::Column::ServiceId.eq(service_id.as_str()));
        }
        if let Some(rating) = filter.rating {
            query = query.filter(service_review::Column::Rating.eq(rating));
        }
        if let Some(status) = filter.status {
            query = query.filter(service_review::Column::Status.eq(status.as_str()));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let page = filter.pagination;
        let models = query
            .order_by_desc(service_review::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(entity_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceReview>> {
        let model = service_review::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn create(&self, r: ServiceReview) -> DomainResult<ServiceReview> {
        let result = domain_to_active(r)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || "Review already exists".to_string()))?;
        info!(
            "Service review created: {} for service {} ({} stars)",
            result.id, result.service_id, result.rating
        );
        Ok(entity_to_domain(result))
    }

    async fn update(&self, mut r: ServiceReview) -> DomainResult<ServiceReview> {
        if self.find_by_id(&r.id).await?.is_none() {
            return Err(DomainError::not_found("ServiceReview", "id", r.id));
        }
        r.updated_at = Utc::now();
        let result = domain_to_active(r)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        info!("Service review updated: {} [{}]", result.id, result.status);
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = service_review::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("ServiceReview", "id", id));
        }
        info!("Service review deleted: {}", id);
        Ok(())
    }

    async fn count_by_status(&self, status: Option<ReviewStatus>) -> DomainResult<u64> {
        let mut query = service_review::Entity::find();
        if let Some(status) = status {
            query = query.filter(service_review::Column::Status.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(db_err)
    }

    async fn rating_counts(
        &self,
        service_id: Option<&str>,
        status: Option<ReviewStatus>,
    ) -> DomainResult<[u64; 5]> {
        let mut query = service_review::Entity::find()
            .select_only()
            .column(service_review::Column::Rating)
            .column_as(Expr::col(service_review::Column::Id).count(), "count")
            .group_by(service_review::Column::Rating);
        if let Some(service_id) = service_id {
            query = query.filter(service_review::Column::ServiceId.eq(service_id));
        }
        if let Some(status) = status {
            query = query.filter(service_review::Column::Status.eq(status.as_str()));
        }
        let rows: Vec<(i32, i64)> = query.into_tuple().all(&self.db).await.map_err(db_err)?;

        let mut counts = [0u64; 5];
        for (rating, count) in rows {
            if let Some(slot) = usize::try_from(rating - 1).ok().and_then(|i| counts.get_mut(i)) {
                *slot = u64::try_from(count).unwrap_or(0);
            }
        }
        Ok(counts)
    }

    async fn add_vote(&self, id: &str, helpful: bool) -> DomainResult<()> {
        let column = if helpful {
            service_review::Column::Upvotes
        } else {
            service_review::Column::Downvotes
        };
        let result = service_review::Entity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .col_expr(service_review::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(service_review::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("ServiceReview", "id", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Service, ServiceRepository};
    use crate::infrastructure::database::repositories::catalog_repository::SeaOrmServiceRepository;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn rating_counts_group_by_star_and_status() {
        let db = test_connection().await;
        let services = SeaOrmServiceRepository::new(db.clone());
        let repo = SeaOrmReviewRepository::new(db);
        let svc = services
            .create(Service::new("bao-tri-loa", "Bảo trì loa", 200_000))
            .await
            .unwrap();

        for (rating, status) in [
            (5, ReviewStatus::Approved),
            (5, ReviewStatus::Approved),
            (3, ReviewStatus::Approved),
            (1, ReviewStatus::Rejected),
        ] {
            let mut review = ServiceReview::new(&svc.id, "Khách", rating);
            review.status = status;
            repo.create(review).await.unwrap();
        }

        let approved = repo
            .rating_counts(Some(&svc.id), Some(ReviewStatus::Approved))
            .await
            .unwrap();
        assert_eq!(approved, [0, 0, 1, 0, 2]);
        assert_eq!(repo.rating_counts(None, None).await.unwrap(), [1, 0, 1, 0, 2]);
        assert_eq!(
            repo.count_by_status(Some(ReviewStatus::Rejected)).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn votes_increment_in_place() {
        let db = test_connection().await;
        let services = SeaOrmServiceRepository::new(db.clone());
        let repo = SeaOrmReviewRepository::new(db);
        let svc = services
            .create(Service::new("lap-loa", "Lắp loa", 400_000))
            .await
            .unwrap();
        let mut review = ServiceReview::new(&svc.id, "Hoa", 4);
        review.images = vec!["/uploads/a.jpg".into()];
        let review = repo.create(review).await.unwrap();

        repo.add_vote(&review.id, true).await.unwrap();
        repo.add_vote(&review.id, true).await.unwrap();
        repo.add_vote(&review.id, false).await.unwrap();
        let loaded = repo.find_by_id(&review.id).await.unwrap().unwrap();
        assert_eq!((loaded.upvotes, loaded.downvotes), (2, 1));
        assert_eq!(loaded.images, vec!["/uploads/a.jpg".to_string()]);

        let err = repo.add_vote("missing", true).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
