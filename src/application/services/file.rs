//! Upload validation and bookkeeping

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::UploadConfig;
use crate::domain::file::{FileKind, FileStorage, FileValidationOptions, StoredFile};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub metadata: Option<Value>,
    pub uploaded_by: Option<String>,
}

/// Lower-cased extension of a client-supplied file name
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
}

/// Check size, allow-list and that the extension is one the MIME type uses.
pub fn validate_upload(
    options: &FileValidationOptions,
    original_name: &str,
    content_type: &str,
    size: u64,
) -> DomainResult<String> {
    if size == 0 {
        return Err(DomainError::Validation("File is empty".into()));
    }
    if size > options.max_size {
        return Err(DomainError::Validation(format!(
            "File exceeds the {} byte limit",
            options.max_size
        )));
    }
    if !options.allows(content_type) {
        return Err(DomainError::Validation(format!(
            "File type {} is not allowed",
            content_type
        )));
    }
    let ext = extension_of(original_name).ok_or_else(|| {
        DomainError::Validation(format!("File name '{}' has no extension", original_name))
    })?;
    let agrees = mime_guess::from_ext(&ext)
        .iter()
        .any(|m| m.essence_str().eq_ignore_ascii_case(content_type));
    if !agrees {
        return Err(DomainError::Validation(format!(
            "Extension .{} does not match {}",
            ext, content_type
        )));
    }
    Ok(ext)
}

pub struct FileService {
    repos: Arc<dyn RepositoryProvider>,
    storage: Arc<dyn FileStorage>,
    options: FileValidationOptions,
    public_base_url: String,
}

impl FileService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        storage: Arc<dyn FileStorage>,
        config: &UploadConfig,
    ) -> Self {
        Self {
            repos,
            storage,
            options: FileValidationOptions {
                max_size: config.max_size_bytes,
                allowed_mime_types: config.allowed_mime_types.clone(),
            },
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn options(&self) -> &FileValidationOptions {
        &self.options
    }

    pub async fn upload(&self, req: UploadRequest) -> DomainResult<StoredFile> {
        let content_type = req.content_type.trim().to_ascii_lowercase();
        let ext = validate_upload(
            &self.options,
            &req.original_name,
            &content_type,
            req.bytes.len() as u64,
        )?;

        let kind = FileKind::from_mime(&content_type);
        let id = uuid::Uuid::new_v4().to_string();
        let filename = format!("{}.{}", id, ext);
        let path = format!("{}/{}", kind.dir(), filename);

        self.storage.put(&path, &req.bytes).await?;

        let file = StoredFile {
            id,
            filename,
            original_name: req.original_name,
            mime_type: content_type,
            size: req.bytes.len() as i64,
            url: format!("{}/{}", self.public_base_url, path),
            path: path.clone(),
            kind,
            metadata: req.metadata,
            uploaded_by: req.uploaded_by,
            created_at: Utc::now(),
        };

        match self.repos.files().create(file).await {
            Ok(saved) => {
                info!(file_id = %saved.id, path = %saved.path, size = saved.size, "File uploaded");
                Ok(saved)
            }
            Err(e) => {
                // Orphaned bytes are worse than a failed upload
                if let Err(cleanup) = self.storage.delete(&path).await {
                    warn!(path = %path, error = %cleanup, "Failed to remove bytes after insert error");
                }
                Err(e)
            }
        }
    }

    pub async fn list_files(&self, pagination: PaginationParams) -> DomainResult<PaginatedResult<StoredFile>> {
        self.repos.files().list(pagination).await
    }

    pub async fn get_file(&self, id: &str) -> DomainResult<StoredFile> {
        self.repos
            .files()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("File", "id", id))
    }

    pub async fn delete_file(&self, id: &str) -> DomainResult<()> {
        let file = self.get_file(id).await?;
        self.storage.delete(&file.path).await?;
        self.repos.files().delete(&file.id).await?;
        info!(file_id = %file.id, path = %file.path, "File deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::storage::LocalFileStorage;

    async fn service(dir: &Path) -> (FileService, Arc<LocalFileStorage>) {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let storage = Arc::new(LocalFileStorage::new(dir));
        let config = UploadConfig {
            dir: dir.to_path_buf(),
            public_base_url: "https://cdn.audiotailoc.vn/uploads/".into(),
            max_size_bytes: 1024,
            ..UploadConfig::default()
        };
        (FileService::new(repos, storage.clone(), &config), storage)
    }

    fn png(name: &str, len: usize) -> UploadRequest {
        UploadRequest {
            original_name: name.into(),
            content_type: "image/png".into(),
            bytes: vec![0x89; len],
            metadata: None,
            uploaded_by: None,
        }
    }

    #[test]
    fn extension_must_match_declared_type() {
        let opts = FileValidationOptions {
            max_size: 100,
            allowed_mime_types: vec!["image/png".into(), "application/pdf".into()],
        };
        assert_eq!(validate_upload(&opts, "Loa.PNG", "image/png", 10).unwrap(), "png");
        assert!(validate_upload(&opts, "loa.pdf", "image/png", 10).is_err());
        assert!(validate_upload(&opts, "loa", "image/png", 10).is_err());
        assert!(validate_upload(&opts, "loa.gif", "image/gif", 10).is_err());
        assert!(validate_upload(&opts, "loa.png", "image/png", 101).is_err());
    }

    #[tokio::test]
    async fn upload_stores_bytes_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, storage) = service(dir.path()).await;

        let file = svc.upload(png("amply.png", 64)).await.unwrap();
        assert_eq!(file.kind, FileKind::Image);
        assert!(file.path.starts_with("images/"));
        assert!(file.filename.ends_with(".png"));
        assert_eq!(
            file.url,
            format!("https://cdn.audiotailoc.vn/uploads/{}", file.path)
        );
        assert!(storage.exists(&file.path).await.unwrap());

        let listed = svc.list_files(PaginationParams::default()).await.unwrap();
        assert_eq!(listed.total, 1);
    }

    #[tokio::test]
    async fn oversized_upload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, _) = service(dir.path()).await;
        let err = svc.upload(png("big.png", 2048)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(!dir.path().join("images").exists());
    }

    #[tokio::test]
    async fn delete_removes_bytes_and_row() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, storage) = service(dir.path()).await;
        let file = svc.upload(png("x.png", 8)).await.unwrap();

        svc.delete_file(&file.id).await.unwrap();
        assert!(!storage.exists(&file.path).await.unwrap());
        assert!(matches!(
            svc.get_file(&file.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
