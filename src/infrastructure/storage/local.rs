//! Local filesystem storage for uploads

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::file::FileStorage;
use crate::domain::{DomainError, DomainResult};

/// Stores uploads under a root directory, served back at `/uploads`
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Only plain relative paths; `..` and absolute paths are rejected.
    fn resolve(&self, relative_path: &str) -> DomainResult<PathBuf> {
        let rel = Path::new(relative_path);
        let clean = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if relative_path.is_empty() || !clean {
            return Err(DomainError::Validation(format!(
                "Invalid storage path: {}",
                relative_path
            )));
        }
        Ok(self.root.join(rel))
    }
}

fn io_err(e: std::io::Error) -> DomainError {
    DomainError::Storage(e.to_string())
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn put(&self, relative_path: &str, bytes: &[u8]) -> DomainResult<()> {
        let path = self.resolve(relative_path)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, bytes).await.map_err(io_err)?;
        debug!(path = %path.display(), size = bytes.len(), "Stored upload");
        Ok(())
    }

    async fn delete(&self, relative_path: &str) -> DomainResult<()> {
        let path = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(e)),
        }
    }

    async fn exists(&self, relative_path: &str) -> DomainResult<bool> {
        let path = self.resolve(relative_path)?;
        tokio::fs::try_exists(&path).await.map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_exists_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        storage.put("images/a.png", b"png").await.unwrap();
        assert!(storage.exists("images/a.png").await.unwrap());
        assert_eq!(
            std::fs::read(dir.path().join("images/a.png")).unwrap(),
            b"png"
        );

        storage.delete("images/a.png").await.unwrap();
        assert!(!storage.exists("images/a.png").await.unwrap());
        storage.delete("images/a.png").await.unwrap();
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());
        let err = storage.put("../escape.txt", b"x").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(storage.put("/etc/passwd", b"x").await.is_err());
    }
}
