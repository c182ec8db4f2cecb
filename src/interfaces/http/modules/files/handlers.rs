//! Upload API handlers

use axum::extract::{Multipart, Path, Query, State};
use axum::Extension;
use serde_json::Value;

use super::dto::*;
use crate::application::services::file::UploadRequest;
use crate::interfaces::http::common::{
    created, ok, ApiError, ApiResponse, ApiResult, CreatedResult, EmptyData, PageQuery,
    PaginatedResponse,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

/// Field holding the bytes
const FILE_FIELD: &str = "file";
const METADATA_FIELD: &str = "metadata";

#[utoipa::path(
    post,
    path = "/api/v1/files/upload",
    tag = "Files",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Stored; `url` is publicly served", body = ApiResponse<FileDto>),
        (status = 400, description = "Missing file, disallowed type or too large")
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> CreatedResult<FileDto> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;
    let mut metadata: Option<Value> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some(FILE_FIELD) => {
                let name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                upload = Some((name, content_type, bytes.to_vec()));
            }
            Some(METADATA_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read metadata: {}", e)))?;
                if !text.trim().is_empty() {
                    let value: Value = serde_json::from_str(&text)
                        .map_err(|_| ApiError::bad_request("metadata must be a JSON object"))?;
                    if !value.is_object() {
                        return Err(ApiError::bad_request("metadata must be a JSON object"));
                    }
                    metadata = Some(value);
                }
            }
            _ => {}
        }
    }

    let (original_name, content_type, bytes) =
        upload.ok_or_else(|| ApiError::bad_request("Multipart field 'file' is required"))?;
    let stored = state
        .files
        .upload(UploadRequest {
            original_name,
            content_type,
            bytes,
            metadata,
            uploaded_by: caller.account_id(),
        })
        .await?;
    created(stored.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/files",
    tag = "Files",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(PageQuery),
    responses((status = 200, description = "Uploaded files, newest first", body = ApiResponse<PaginatedResponse<FileDto>>))
)]
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<FileDto>> {
    let page = state.files.list_files(query.params()).await?;
    ok(PaginatedResponse::from_result(page, FileDto::from))
}

#[utoipa::path(
    get,
    path = "/api/v1/files/{id}",
    tag = "Files",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 200, description = "File metadata", body = ApiResponse<FileDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<FileDto> {
    ok(state.files.get_file(&id).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/files/{id}",
    tag = "Files",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 200, description = "Bytes and record removed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.files.delete_file(&id).await?;
    ok(EmptyData {})
}
