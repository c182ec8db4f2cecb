//! Response envelope, pagination DTOs and the domain-error mapping
//! shared by every handler.

pub mod validated_json;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::shared::{PaginatedResult, PaginationParams};

pub use validated_json::ValidatedJson;

/// Standard API envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Body for operations that return nothing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// `?page=&limit=` query
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PageQuery {
    /// 1-based page, default 1
    pub page: Option<u32>,
    /// Page size 1–100, default 20
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn params(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit, 20)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Convert a domain page, mapping each item to its DTO.
    pub fn from_result<D>(result: PaginatedResult<D>, f: impl FnMut(D) -> T) -> Self {
        let mapped = result.map(f);
        Self {
            items: mapped.items,
            total: mapped.total,
            page: mapped.page,
            limit: mapped.limit,
            total_pages: mapped.total_pages,
        }
    }
}

/// Error half of every handler result; renders the standard envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) | DomainError::InvalidTransition { .. } => {
            StatusCode::BAD_REQUEST
        }
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Database(_) | DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        let status = status_for(&e);
        if status.is_server_error() {
            // Internal details stay in the log
            error!(error = %e, "Request failed");
            return Self::new(status, "Internal server error");
        }
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrap a value in a successful envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// `201 Created` with the standard envelope
pub fn created<T>(data: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::not_found("Product", "id", "x"), StatusCode::NOT_FOUND),
            (DomainError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                DomainError::InvalidTransition {
                    entity: "Booking",
                    from: "COMPLETED".into(),
                    to: "PENDING".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::Conflict("dup".into()), StatusCode::CONFLICT),
            (DomainError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (DomainError::Database("locked".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err), status);
        }
    }

    #[test]
    fn server_errors_hide_details() {
        let api: ApiError = DomainError::Database("disk I/O error".into()).into();
        assert_eq!(api.message, "Internal server error");
        let api: ApiError = DomainError::Conflict("Email already exists".into()).into();
        assert!(api.message.contains("Email already exists"));
    }

    #[test]
    fn page_query_clamps() {
        let p = PageQuery { page: Some(0), limit: Some(500) }.params();
        assert_eq!((p.page, p.limit), (1, 100));
    }
}
