use async_trait::async_trait;

use super::model::{User, UserRole};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn create(&self, user: User) -> DomainResult<User>;
    async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<()>;
    async fn touch_login(&self, id: &str) -> DomainResult<()>;
}
