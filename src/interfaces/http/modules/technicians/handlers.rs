//! Technician API handlers

use axum::extract::{Path, Query, State};

use super::dto::*;
use crate::interfaces::http::common::{
    created, ok, ApiResponse, ApiResult, CreatedResult, EmptyData, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/technicians",
    tag = "Technicians",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(TechnicianListQuery),
    responses((status = 200, description = "Technician page", body = ApiResponse<PaginatedResponse<TechnicianDto>>))
)]
pub async fn list_technicians(
    State(state): State<AppState>,
    Query(query): Query<TechnicianListQuery>,
) -> ApiResult<PaginatedResponse<TechnicianDto>> {
    let page = state.technicians.list(query.into()).await?;
    ok(PaginatedResponse::from_result(page, TechnicianDto::from))
}

#[utoipa::path(
    post,
    path = "/api/v1/technicians",
    tag = "Technicians",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = CreateTechnicianRequest,
    responses(
        (status = 201, description = "Technician created", body = ApiResponse<TechnicianDto>),
        (status = 409, description = "Phone already registered")
    )
)]
pub async fn create_technician(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTechnicianRequest>,
) -> CreatedResult<TechnicianDto> {
    let tech = state.technicians.create(request.into()).await?;
    created(tech.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/technicians/available",
    tag = "Technicians",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Technicians free for the slot", body = ApiResponse<Vec<TechnicianDto>>),
        (status = 400, description = "Malformed time or duration")
    )
)]
pub async fn available_technicians(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Vec<TechnicianDto>> {
    let techs = state
        .technicians
        .available(
            query.date,
            &query.time,
            query.duration,
            query.specialty.as_deref().filter(|s| !s.trim().is_empty()),
        )
        .await?;
    ok(techs.into_iter().map(TechnicianDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/technicians/stats",
    tag = "Technicians",
    security(("bearer_auth" = []), ("api_key" = [])),
    responses((status = 200, description = "Roster totals and top performers", body = ApiResponse<TechnicianStatsDto>))
)]
pub async fn technician_stats(State(state): State<AppState>) -> ApiResult<TechnicianStatsDto> {
    ok(state.technicians.stats().await?.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/technicians/{id}",
    tag = "Technicians",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Technician", body = ApiResponse<TechnicianDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_technician(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TechnicianDto> {
    ok(state.technicians.get(&id).await?.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/technicians/{id}",
    tag = "Technicians",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Technician ID")),
    request_body = UpdateTechnicianRequest,
    responses(
        (status = 200, description = "Technician updated", body = ApiResponse<TechnicianDto>),
        (status = 409, description = "Phone already registered")
    )
)]
pub async fn update_technician(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTechnicianRequest>,
) -> ApiResult<TechnicianDto> {
    ok(state.technicians.update(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/technicians/{id}",
    tag = "Technicians",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Technician deleted"),
        (status = 409, description = "Technician has active bookings")
    )
)]
pub async fn delete_technician(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.technicians.delete(&id).await?;
    ok(EmptyData {})
}

#[utoipa::path(
    get,
    path = "/api/v1/technicians/{id}/schedule",
    tag = "Technicians",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Technician ID")),
    responses((status = 200, description = "Schedule rows", body = ApiResponse<Vec<ScheduleDto>>))
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<ScheduleDto>> {
    let rows = state.technicians.get_schedule(&id).await?;
    ok(rows.into_iter().map(ScheduleDto::from).collect())
}

#[utoipa::path(
    put,
    path = "/api/v1/technicians/{id}/schedule",
    tag = "Technicians",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Technician ID")),
    request_body = SetScheduleRequest,
    responses(
        (status = 200, description = "Schedule replaced", body = ApiResponse<Vec<ScheduleDto>>),
        (status = 400, description = "Inverted or overlapping slots")
    )
)]
pub async fn set_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<SetScheduleRequest>,
) -> ApiResult<Vec<ScheduleDto>> {
    let slots = request.schedules.into_iter().map(Into::into).collect();
    let rows = state.technicians.set_schedule(&id, slots).await?;
    ok(rows.into_iter().map(ScheduleDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/technicians/{id}/workload",
    tag = "Technicians",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Technician ID"), WorkloadQuery),
    responses((status = 200, description = "Booking counters", body = ApiResponse<WorkloadDto>))
)]
pub async fn get_workload(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<WorkloadQuery>,
) -> ApiResult<WorkloadDto> {
    ok(state
        .technicians
        .workload(&id, query.from, query.to)
        .await?
        .into())
}
