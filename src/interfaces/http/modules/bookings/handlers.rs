//! Booking API handlers

use axum::extract::{Path, Query, State};
use axum::Extension;

use super::dto::*;
use crate::interfaces::http::common::{
    created, ok, ApiResponse, ApiResult, CreatedResult, EmptyData, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse<BookingDto>),
        (status = 400, description = "Validation error or inactive service"),
        (status = 404, description = "Service or technician not found")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    caller: Option<Extension<AuthenticatedUser>>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> CreatedResult<BookingDto> {
    let user_id = caller.and_then(|Extension(user)| user.account_id());
    let booking = state.bookings.create(request.into_input(user_id)).await?;
    created(booking.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(BookingListQuery),
    responses(
        (status = 200, description = "Booking page", body = ApiResponse<PaginatedResponse<BookingDto>>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<PaginatedResponse<BookingDto>> {
    let page = state.bookings.list(query.into_filter()?).await?;
    ok(PaginatedResponse::from_result(page, BookingDto::from))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BookingDto> {
    ok(state.bookings.get(&id).await?.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses((status = 200, description = "Booking updated", body = ApiResponse<BookingDto>))
)]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateBookingRequest>,
) -> ApiResult<BookingDto> {
    ok(state.bookings.update(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    responses((status = 200, description = "Booking deleted"))
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.bookings.delete(&id).await?;
    ok(EmptyData {})
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}/status",
    tag = "Bookings",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<BookingDto>),
        (status = 400, description = "Unknown status or disallowed transition")
    )
)]
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateBookingStatusRequest>,
) -> ApiResult<BookingDto> {
    ok(state.bookings.update_status(&id, &request.status).await?.into())
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}/assign",
    tag = "Bookings",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    request_body = AssignTechnicianRequest,
    responses(
        (status = 200, description = "Technician assigned", body = ApiResponse<BookingDto>),
        (status = 400, description = "Technician inactive"),
        (status = 404, description = "Booking or technician not found")
    )
)]
pub async fn assign_technician(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<AssignTechnicianRequest>,
) -> ApiResult<BookingDto> {
    let booking = state
        .bookings
        .assign_technician(&id, &request.technician_id)
        .await?;
    ok(booking.into())
}
