//! File DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::file::StoredFile;

#[derive(Debug, Serialize, ToSchema)]
pub struct FileDto {
    pub id: String,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub url: String,
    /// image or document
    pub kind: String,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Value>,
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StoredFile> for FileDto {
    fn from(f: StoredFile) -> Self {
        Self {
            id: f.id,
            filename: f.filename,
            original_name: f.original_name,
            mime_type: f.mime_type,
            size: f.size,
            url: f.url,
            kind: f.kind.to_string(),
            metadata: f.metadata,
            uploaded_by: f.uploaded_by,
            created_at: f.created_at,
        }
    }
}

/// Multipart form accepted by the upload endpoint (documentation only)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Optional JSON object stored with the file
    pub metadata: Option<String>,
}
