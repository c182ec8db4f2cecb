//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use super::{db_err, write_err};
use crate::domain::user::{User, UserRepository, UserRole};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Customer => UserRole::Customer,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Customer => user::UserRole::Customer,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        phone: model.phone,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_model_to_domain))
    }

    async fn create(&self, u: User) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            id: Set(u.id),
            email: Set(u.email.to_lowercase()),
            name: Set(u.name),
            phone: Set(u.phone),
            password_hash: Set(u.password_hash),
            role: Set(domain_role_to_entity(u.role)),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
            last_login_at: Set(u.last_login_at),
        };

        let result = new_user
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || "Email already exists".to_string()))?;
        info!("User created: {} [{:?}]", result.email, result.role);
        Ok(user_model_to_domain(result))
    }

    async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<()> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::Role, Expr::value(role.as_str()))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", "id", id));
        }
        info!("User {} role set to {}", id, role);
        Ok(())
    }

    async fn touch_login(&self, id: &str) -> DomainResult<()> {
        user::Entity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(Some(Utc::now())))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn email_lookup_is_case_insensitive_and_role_updates() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        let user = repo
            .create(User::new("Chu@AudioTaiLoc.com", "Chủ cửa hàng", "hash"))
            .await
            .unwrap();

        let found = repo
            .find_by_email("CHU@audiotailoc.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);

        repo.update_role(&user.id, UserRole::Admin).await.unwrap();
        let found = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(found.is_admin());
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        repo.create(User::new("a@b.vn", "A", "h")).await.unwrap();
        let err = repo.create(User::new("a@b.vn", "B", "h")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
