use async_trait::async_trait;

use super::model::StoredFile;
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn create(&self, file: StoredFile) -> DomainResult<StoredFile>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<StoredFile>>;
    async fn list(&self, pagination: PaginationParams) -> DomainResult<PaginatedResult<StoredFile>>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}

/// Where uploaded bytes live. Paths are relative to the upload root.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn put(&self, relative_path: &str, bytes: &[u8]) -> DomainResult<()>;
    async fn delete(&self, relative_path: &str) -> DomainResult<()>;
    async fn exists(&self, relative_path: &str) -> DomainResult<bool>;
}
