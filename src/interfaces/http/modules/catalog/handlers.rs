//! Catalog API handlers: categories, products and services

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use utoipa::IntoParams;

use super::dto::*;
use crate::interfaces::http::common::{
    created, ok, ApiError, ApiResponse, ApiResult, CreatedResult, EmptyData, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::state::AppState;

// ── Categories ─────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "Catalog",
    responses((status = 200, description = "All categories", body = ApiResponse<Vec<CategoryDto>>))
)]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryDto>> {
    let categories = state.catalog.list_categories().await?;
    ok(categories.into_iter().map(CategoryDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<CategoryDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CategoryDto> {
    ok(state.catalog.get_category(&id).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "Catalog",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryDto>),
        (status = 409, description = "Slug already used")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> CreatedResult<CategoryDto> {
    let category = state.catalog.create_category(request.into()).await?;
    created(category.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses((status = 200, description = "Category updated", body = ApiResponse<CategoryDto>))
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<CategoryDto> {
    ok(state.catalog.update_category(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 409, description = "Category still in use")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.catalog.delete_category(&id).await?;
    ok(EmptyData {})
}

// ── Products ───────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Catalog",
    params(ProductListQuery),
    responses((status = 200, description = "Product page", body = ApiResponse<PaginatedResponse<ProductDto>>))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<PaginatedResponse<ProductDto>> {
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(ApiError::bad_request("min_price cannot exceed max_price"));
        }
    }
    let page = state.catalog.list_products(query.into()).await?;
    ok(PaginatedResponse::from_result(page, ProductDto::from))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Catalog",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<ProductDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ProductDto> {
    ok(state.catalog.get_product(&id).await?.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/products/slug/{slug}",
    tag = "Catalog",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<ProductDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ProductDto> {
    ok(state.catalog.get_product_by_slug(&slug).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Catalog",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug or SKU already used")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> CreatedResult<ProductDto> {
    let product = state.catalog.create_product(request.into()).await?;
    created(product.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses((status = 200, description = "Product updated", body = ApiResponse<ProductDto>))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<ProductDto> {
    ok(state.catalog.update_product(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Product ID")),
    responses((status = 200, description = "Product soft-deleted"))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.catalog.delete_product(&id).await?;
    ok(EmptyData {})
}

// ── Services ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
pub struct ServiceListQuery {
    /// Defaults to true
    pub active_only: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "Catalog",
    params(ServiceListQuery),
    responses((status = 200, description = "Bookable services", body = ApiResponse<Vec<ServiceDto>>))
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceListQuery>,
) -> ApiResult<Vec<ServiceDto>> {
    let services = state
        .catalog
        .list_services(query.active_only.unwrap_or(true))
        .await?;
    ok(services.into_iter().map(ServiceDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/services/{id}",
    tag = "Catalog",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ApiResponse<ServiceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ServiceDto> {
    ok(state.catalog.get_service(&id).await?.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/services/slug/{slug}",
    tag = "Catalog",
    params(("slug" = String, Path, description = "Service slug")),
    responses(
        (status = 200, description = "Service", body = ApiResponse<ServiceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_service_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ServiceDto> {
    ok(state.catalog.get_service_by_slug(&slug).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/services",
    tag = "Catalog",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = CreateServiceRequest,
    responses((status = 201, description = "Service created", body = ApiResponse<ServiceDto>))
)]
pub async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateServiceRequest>,
) -> CreatedResult<ServiceDto> {
    let service = state.catalog.create_service(request.into()).await?;
    created(service.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/services/{id}",
    tag = "Catalog",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses((status = 200, description = "Service updated", body = ApiResponse<ServiceDto>))
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateServiceRequest>,
) -> ApiResult<ServiceDto> {
    ok(state.catalog.update_service(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/services/{id}",
    tag = "Catalog",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Service ID")),
    responses((status = 200, description = "Service deleted"))
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.catalog.delete_service(&id).await?;
    ok(EmptyData {})
}
