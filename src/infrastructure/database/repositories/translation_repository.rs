//! SeaORM implementation of TranslationRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::db_err;
use crate::domain::i18n::{Language, Translation, TranslationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{language, translation};

fn language_to_domain(m: language::Model) -> Language {
    Language {
        code: m.code,
        name: m.name,
        native_name: m.native_name,
        flag: m.flag,
        is_default: m.is_default,
        is_active: m.is_active,
        sort_order: m.sort_order,
    }
}

fn translation_to_domain(m: translation::Model) -> Translation {
    Translation {
        id: m.id,
        locale: m.locale,
        context: m.context,
        key: m.key,
        value: m.value,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

pub struct SeaOrmTranslationRepository {
    db: DatabaseConnection,
}

impl SeaOrmTranslationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TranslationRepository for SeaOrmTranslationRepository {
    async fn languages(&self, active_only: bool) -> DomainResult<Vec<Language>> {
        let mut query = language::Entity::find();
        if active_only {
            query = query.filter(language::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_desc(language::Column::IsDefault)
            .order_by_asc(language::Column::SortOrder)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(language_to_domain).collect())
    }

    async fn upsert_language(&self, l: Language) -> DomainResult<Language> {
        let existing = language::Entity::find_by_id(l.code.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let model = language::ActiveModel {
            code: Set(l.code),
            name: Set(l.name),
            native_name: Set(l.native_name),
            flag: Set(l.flag),
            is_default: Set(l.is_default),
            is_active: Set(l.is_active),
            sort_order: Set(l.sort_order),
        };
        let result = if existing.is_some() {
            model.update(&self.db).await
        } else {
            model.insert(&self.db).await
        }
        .map_err(db_err)?;
        info!("Language saved: {}", result.code);
        Ok(language_to_domain(result))
    }

    async fn find_by_context(&self, context: &str, locale: &str) -> DomainResult<Vec<Translation>> {
        let models = translation::Entity::find()
            .filter(translation::Column::Context.eq(context))
            .filter(translation::Column::Locale.eq(locale))
            .order_by_asc(translation::Column::Key)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(translation_to_domain).collect())
    }

    async fn find_one(
        &self,
        locale: &str,
        context: &str,
        key: &str,
    ) -> DomainResult<Option<Translation>> {
        let model = translation::Entity::find()
            .filter(translation::Column::Locale.eq(locale))
            .filter(translation::Column::Context.eq(context))
            .filter(translation::Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(translation_to_domain))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Translation>> {
        let model = translation::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(translation_to_domain))
    }

    async fn upsert(&self, t: Translation) -> DomainResult<Translation> {
        let existing = self.find_one(&t.locale, &t.context, &t.key).await?;
        let result = match existing {
            Some(existing) => {
                let model = translation::ActiveModel {
                    id: Set(existing.id),
                    value: Set(t.value),
                    updated_at: Set(Utc::now()),
                    ..Default::default()
                };
                model.update(&self.db).await.map_err(db_err)?
            }
            None => translation::ActiveModel {
                id: Set(t.id),
                locale: Set(t.locale),
                context: Set(t.context),
                key: Set(t.key),
                value: Set(t.value),
                created_at: Set(t.created_at),
                updated_at: Set(t.updated_at),
            }
            .insert(&self.db)
            .await
            .map_err(db_err)?,
        };
        info!(
            "Translation saved: [{}] {}.{}",
            result.locale, result.context, result.key
        );
        Ok(translation_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = translation::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Translation", "id", id));
        }
        info!("Translation deleted: {}", id);
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        translation::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn migration_seeds_default_language_first() {
        let repo = SeaOrmTranslationRepository::new(test_connection().await);
        let langs = repo.languages(true).await.unwrap();
        assert_eq!(langs.len(), 2);
        assert_eq!(langs[0].code, "vi");
        assert!(langs[0].is_default);
    }

    #[tokio::test]
    async fn upsert_overwrites_value_in_place() {
        let repo = SeaOrmTranslationRepository::new(test_connection().await);
        let first = repo
            .upsert(Translation::new("en", "common", "cart", "Cart"))
            .await
            .unwrap();
        let second = repo
            .upsert(Translation::new("en", "common", "cart", "Shopping cart"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.value, "Shopping cart");
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
