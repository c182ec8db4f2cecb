//! Content API handlers
//!
//! Reads are public and address pages, policies and articles by slug;
//! admin writes address them by id on the same route.

use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::Deserialize;
use utoipa::IntoParams;

use super::dto::*;
use crate::interfaces::http::common::{
    created, ok, ApiResponse, ApiResult, CreatedResult, EmptyData, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;
use crate::shared::PaginationParams;

fn caller_is_admin(caller: &Option<Extension<AuthenticatedUser>>) -> bool {
    caller.as_ref().is_some_and(|Extension(user)| user.is_admin())
}

// ── FAQ ────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/faq",
    tag = "Content",
    params(FaqQuery),
    responses((status = 200, description = "Active FAQ entries in display order", body = ApiResponse<Vec<FaqDto>>))
)]
pub async fn list_faqs(
    State(state): State<AppState>,
    Query(query): Query<FaqQuery>,
) -> ApiResult<Vec<FaqDto>> {
    let category = query.category.as_deref().filter(|c| !c.trim().is_empty());
    let faqs = state.content.list_faqs(category).await?;
    ok(faqs.into_iter().map(FaqDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/faq/{id}",
    tag = "Content",
    params(("id" = String, Path, description = "FAQ ID")),
    responses(
        (status = 200, description = "FAQ entry", body = ApiResponse<FaqDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_faq(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<FaqDto> {
    ok(state.content.get_faq(&id).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/faq",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = FaqRequest,
    responses((status = 201, description = "FAQ created", body = ApiResponse<FaqDto>))
)]
pub async fn create_faq(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<FaqRequest>,
) -> CreatedResult<FaqDto> {
    created(state.content.create_faq(request.into()).await?.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/faq/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "FAQ ID")),
    request_body = FaqRequest,
    responses((status = 200, description = "FAQ replaced", body = ApiResponse<FaqDto>))
)]
pub async fn update_faq(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<FaqRequest>,
) -> ApiResult<FaqDto> {
    ok(state.content.update_faq(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/faq/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "FAQ ID")),
    responses((status = 200, description = "FAQ deleted"))
)]
pub async fn delete_faq(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.content.delete_faq(&id).await?;
    ok(EmptyData {})
}

// ── Policies ───────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/policies",
    tag = "Content",
    responses((status = 200, description = "Published policies", body = ApiResponse<Vec<PolicyDto>>))
)]
pub async fn list_policies(State(state): State<AppState>) -> ApiResult<Vec<PolicyDto>> {
    let policies = state.content.list_policies().await?;
    ok(policies.into_iter().map(PolicyDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/policies/{slug}",
    tag = "Content",
    params(("slug" = String, Path, description = "Policy slug")),
    responses(
        (status = 200, description = "Published policy", body = ApiResponse<PolicyDto>),
        (status = 404, description = "Not found or unpublished")
    )
)]
pub async fn get_policy(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<PolicyDto> {
    ok(state.content.get_policy_by_slug(&slug).await?.into())
}

/// Creates the policy, or replaces the one with the same slug.
#[utoipa::path(
    post,
    path = "/api/v1/policies",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = PolicyRequest,
    responses((status = 201, description = "Policy saved", body = ApiResponse<PolicyDto>))
)]
pub async fn upsert_policy(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PolicyRequest>,
) -> CreatedResult<PolicyDto> {
    created(state.content.upsert_policy(request.into()).await?.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/policies/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Policy ID")),
    request_body = PolicyRequest,
    responses((status = 200, description = "Policy replaced", body = ApiResponse<PolicyDto>))
)]
pub async fn update_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<PolicyRequest>,
) -> ApiResult<PolicyDto> {
    ok(state.content.update_policy(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/policies/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Policy ID")),
    responses((status = 200, description = "Policy deleted"))
)]
pub async fn delete_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.content.delete_policy(&id).await?;
    ok(EmptyData {})
}

// ── Testimonials ───────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
pub struct TestimonialQuery {
    /// Admins only
    pub include_unpublished: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/testimonials",
    tag = "Content",
    params(TestimonialQuery),
    responses((status = 200, description = "Testimonials in display order", body = ApiResponse<Vec<TestimonialDto>>))
)]
pub async fn list_testimonials(
    State(state): State<AppState>,
    caller: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<TestimonialQuery>,
) -> ApiResult<Vec<TestimonialDto>> {
    let everything = query.include_unpublished == Some(true) && caller_is_admin(&caller);
    let list = state.content.list_testimonials(!everything).await?;
    ok(list.into_iter().map(TestimonialDto::from).collect())
}

#[utoipa::path(
    post,
    path = "/api/v1/testimonials",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = TestimonialRequest,
    responses(
        (status = 201, description = "Testimonial created", body = ApiResponse<TestimonialDto>),
        (status = 400, description = "Rating outside 1–5")
    )
)]
pub async fn create_testimonial(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TestimonialRequest>,
) -> CreatedResult<TestimonialDto> {
    created(state.content.create_testimonial(request.into()).await?.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/testimonials/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Testimonial ID")),
    responses((status = 200, description = "Testimonial", body = ApiResponse<TestimonialDto>))
)]
pub async fn get_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TestimonialDto> {
    ok(state.content.get_testimonial(&id).await?.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/testimonials/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Testimonial ID")),
    request_body = TestimonialRequest,
    responses((status = 200, description = "Testimonial replaced", body = ApiResponse<TestimonialDto>))
)]
pub async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<TestimonialRequest>,
) -> ApiResult<TestimonialDto> {
    ok(state
        .content
        .update_testimonial(&id, request.into())
        .await?
        .into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/testimonials/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Testimonial ID")),
    responses((status = 200, description = "Testimonial deleted"))
)]
pub async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.content.delete_testimonial(&id).await?;
    ok(EmptyData {})
}

// ── Pages ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/pages",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    responses((status = 200, description = "All pages, drafts included", body = ApiResponse<Vec<PageDto>>))
)]
pub async fn list_pages(State(state): State<AppState>) -> ApiResult<Vec<PageDto>> {
    let pages = state.content.list_pages().await?;
    ok(pages.into_iter().map(PageDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/pages/{slug}",
    tag = "Content",
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Published page", body = ApiResponse<PageDto>),
        (status = 404, description = "Not found or unpublished")
    )
)]
pub async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<PageDto> {
    ok(state.content.get_page_by_slug(&slug).await?.into())
}

/// Creates the page, or replaces the one with the same slug.
#[utoipa::path(
    post,
    path = "/api/v1/pages",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = PageRequest,
    responses((status = 201, description = "Page saved", body = ApiResponse<PageDto>))
)]
pub async fn upsert_page(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PageRequest>,
) -> CreatedResult<PageDto> {
    created(state.content.upsert_page(request.into()).await?.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/pages/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Page ID")),
    request_body = PageRequest,
    responses((status = 200, description = "Page replaced", body = ApiResponse<PageDto>))
)]
pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<PageRequest>,
) -> ApiResult<PageDto> {
    ok(state.content.update_page(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/pages/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Page ID")),
    responses((status = 200, description = "Page deleted"))
)]
pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.content.delete_page(&id).await?;
    ok(EmptyData {})
}

// ── Blog ───────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/blog",
    tag = "Content",
    params(ArticleListQuery),
    responses((status = 200, description = "Articles, newest first", body = ApiResponse<PaginatedResponse<ArticleDto>>))
)]
pub async fn list_articles(
    State(state): State<AppState>,
    caller: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<ArticleListQuery>,
) -> ApiResult<PaginatedResponse<ArticleDto>> {
    let drafts = query.include_drafts == Some(true) && caller_is_admin(&caller);
    let page = state
        .content
        .list_articles(!drafts, PaginationParams::new(query.page, query.limit, 10))
        .await?;
    ok(PaginatedResponse::from_result(page, ArticleDto::from))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/{slug}",
    tag = "Content",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Published article; counts a view", body = ApiResponse<ArticleDto>),
        (status = 404, description = "Not found or unpublished")
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ArticleDto> {
    ok(state.content.get_article_by_slug(&slug).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/blog",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = ArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ApiResponse<ArticleDto>),
        (status = 409, description = "Slug already used")
    )
)]
pub async fn create_article(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ArticleRequest>,
) -> CreatedResult<ArticleDto> {
    created(state.content.create_article(request.into()).await?.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/blog/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Article ID")),
    request_body = ArticleRequest,
    responses((status = 200, description = "Article replaced", body = ApiResponse<ArticleDto>))
)]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ArticleRequest>,
) -> ApiResult<ArticleDto> {
    ok(state.content.update_article(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/blog/{id}",
    tag = "Content",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Article ID")),
    responses((status = 200, description = "Article deleted"))
)]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.content.delete_article(&id).await?;
    ok(EmptyData {})
}

// ── Newsletter ─────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/v1/newsletter/subscribe",
    tag = "Newsletter",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscribed (idempotent)", body = ApiResponse<SubscriberDto>),
        (status = 400, description = "Invalid email")
    )
)]
pub async fn subscribe(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SubscribeRequest>,
) -> ApiResult<SubscriberDto> {
    ok(state
        .content
        .subscribe(&request.email, request.name)
        .await?
        .into())
}

#[utoipa::path(
    post,
    path = "/api/v1/newsletter/unsubscribe",
    tag = "Newsletter",
    request_body = UnsubscribeRequest,
    responses(
        (status = 200, description = "Unsubscribed"),
        (status = 404, description = "Address never subscribed")
    )
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UnsubscribeRequest>,
) -> ApiResult<EmptyData> {
    state.content.unsubscribe(&request.email).await?;
    ok(EmptyData {})
}

#[utoipa::path(
    get,
    path = "/api/v1/newsletter/subscribers",
    tag = "Newsletter",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(SubscriberListQuery),
    responses((status = 200, description = "Subscriber page", body = ApiResponse<PaginatedResponse<SubscriberDto>>))
)]
pub async fn list_subscribers(
    State(state): State<AppState>,
    Query(query): Query<SubscriberListQuery>,
) -> ApiResult<PaginatedResponse<SubscriberDto>> {
    let page = state
        .content
        .list_subscribers(
            query.active_only.unwrap_or(true),
            PaginationParams::new(query.page, query.limit, 20),
        )
        .await?;
    ok(PaginatedResponse::from_result(page, SubscriberDto::from))
}
