//! Service review API handlers

use axum::extract::{Path, Query, State};
use axum::Extension;

use super::dto::*;
use crate::interfaces::http::common::{
    created, ok, ApiResponse, ApiResult, CreatedResult, EmptyData, PageQuery, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/services/{id}/reviews",
    tag = "Reviews",
    params(("id" = String, Path, description = "Service ID"), PageQuery),
    responses(
        (status = 200, description = "Approved reviews with rating summary", body = ApiResponse<ServiceReviewsDto>),
        (status = 404, description = "Service not found")
    )
)]
pub async fn list_service_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<ServiceReviewsDto> {
    let listing = state.reviews.list_for_service(&id, query.params()).await?;
    ok(listing.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/services/{id}/rating",
    tag = "Reviews",
    params(("id" = String, Path, description = "Service ID")),
    responses((status = 200, description = "Average of approved reviews", body = ApiResponse<ServiceRatingDto>))
)]
pub async fn service_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ServiceRatingDto> {
    let summary = state.reviews.service_rating(&id).await?;
    ok(ServiceRatingDto::new(id, summary))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review submitted for moderation", body = ApiResponse<ReviewDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    caller: Option<Extension<AuthenticatedUser>>,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> CreatedResult<ReviewDto> {
    let user_id = caller.and_then(|Extension(user)| user.account_id());
    let review = state.reviews.create(request.into_input(user_id)).await?;
    created(review.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews/{id}/helpful",
    tag = "Reviews",
    params(("id" = String, Path, description = "Review ID")),
    request_body = HelpfulRequest,
    responses(
        (status = 200, description = "Vote counted", body = ApiResponse<ReviewDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn mark_helpful(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<HelpfulRequest>,
) -> ApiResult<ReviewDto> {
    ok(state.reviews.mark_helpful(&id, request.helpful).await?.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "Reviews",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(ReviewListQuery),
    responses(
        (status = 200, description = "Review page", body = ApiResponse<PaginatedResponse<ReviewDto>>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> ApiResult<PaginatedResponse<ReviewDto>> {
    let page = state.reviews.list(query.into_filter()?).await?;
    ok(PaginatedResponse::from_result(page, ReviewDto::from))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/stats",
    tag = "Reviews",
    security(("bearer_auth" = []), ("api_key" = [])),
    responses((status = 200, description = "Moderation counters", body = ApiResponse<ReviewStatsDto>))
)]
pub async fn review_stats(State(state): State<AppState>) -> ApiResult<ReviewStatsDto> {
    ok(state.reviews.stats().await?.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review", body = ApiResponse<ReviewDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ReviewDto> {
    ok(state.reviews.get(&id).await?.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses((status = 200, description = "Review updated", body = ApiResponse<ReviewDto>))
)]
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateReviewRequest>,
) -> ApiResult<ReviewDto> {
    ok(state.reviews.update(&id, request.into()).await?.into())
}

#[utoipa::path(
    patch,
    path = "/api/v1/reviews/{id}/status",
    tag = "Reviews",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Review ID")),
    request_body = UpdateReviewStatusRequest,
    responses(
        (status = 200, description = "Review moderated", body = ApiResponse<ReviewDto>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn update_review_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateReviewStatusRequest>,
) -> ApiResult<ReviewDto> {
    ok(state.reviews.update_status(&id, &request.status).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Review ID")),
    responses((status = 200, description = "Review deleted"))
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.reviews.delete(&id).await?;
    ok(EmptyData {})
}
