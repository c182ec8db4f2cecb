//! SeaORM implementation of FileRepository

use async_trait::async_trait;
use log::info;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set,
};

use super::{db_err, decode_json, encode_json};
use crate::domain::file::{FileKind, FileRepository, StoredFile};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::stored_file;
use crate::shared::{PaginatedResult, PaginationParams};

fn entity_to_domain(m: stored_file::Model) -> StoredFile {
    StoredFile {
        id: m.id,
        filename: m.filename,
        original_name: m.original_name,
        mime_type: m.mime_type,
        size: m.size,
        path: m.path,
        url: m.url,
        kind: FileKind::parse(&m.kind),
        metadata: decode_json(m.metadata),
        uploaded_by: m.uploaded_by,
        created_at: m.created_at,
    }
}

pub struct SeaOrmFileRepository {
    db: DatabaseConnection,
}

impl SeaOrmFileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FileRepository for SeaOrmFileRepository {
    async fn create(&self, f: StoredFile) -> DomainResult<StoredFile> {
        let result = stored_file::ActiveModel {
            id: Set(f.id),
            filename: Set(f.filename),
            original_name: Set(f.original_name),
            mime_type: Set(f.mime_type),
            size: Set(f.size),
            path: Set(f.path),
            url: Set(f.url),
            kind: Set(f.kind.as_str().to_string()),
            metadata: Set(encode_json(&f.metadata)),
            uploaded_by: Set(f.uploaded_by),
            created_at: Set(f.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        info!(
            "File recorded: {} ({}, {} bytes)",
            result.path, result.mime_type, result.size
        );
        Ok(entity_to_domain(result))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<StoredFile>> {
        let model = stored_file::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn list(&self, pagination: PaginationParams) -> DomainResult<PaginatedResult<StoredFile>> {
        let total = stored_file::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)?;
        let models = stored_file::Entity::find()
            .order_by_desc(stored_file::Column::CreatedAt)
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(PaginatedResult::new(
            models.into_iter().map(entity_to_domain).collect(),
            total,
            pagination.page,
            pagination.limit,
        ))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = stored_file::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("File", "id", id));
        }
        info!("File record deleted: {}", id);
        Ok(())
    }
}
