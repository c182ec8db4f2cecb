use async_trait::async_trait;

use super::model::{Language, Translation};
use crate::domain::DomainResult;

#[async_trait]
pub trait TranslationRepository: Send + Sync {
    async fn languages(&self, active_only: bool) -> DomainResult<Vec<Language>>;
    async fn upsert_language(&self, language: Language) -> DomainResult<Language>;
    async fn find_by_context(&self, context: &str, locale: &str) -> DomainResult<Vec<Translation>>;
    async fn find_one(
        &self,
        locale: &str,
        context: &str,
        key: &str,
    ) -> DomainResult<Option<Translation>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Translation>>;
    /// Insert or overwrite the value keyed by `(locale, context, key)`
    async fn upsert(&self, translation: Translation) -> DomainResult<Translation>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    async fn count(&self) -> DomainResult<u64>;
}
