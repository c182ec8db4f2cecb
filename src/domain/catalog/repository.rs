//! Catalog repository interfaces

use async_trait::async_trait;

use super::model::{Category, Product, ProductFilter, Service};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<Category>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Category>>;
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Category>>;
    async fn create(&self, category: Category) -> DomainResult<Category>;
    async fn update(&self, category: Category) -> DomainResult<Category>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    /// Insert, or overwrite the row with the same slug (keeps its id)
    async fn upsert_by_slug(&self, category: Category) -> DomainResult<Category>;
    async fn count_children(&self, id: &str) -> DomainResult<u64>;
    async fn count(&self) -> DomainResult<u64>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, filter: ProductFilter) -> DomainResult<PaginatedResult<Product>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Product>>;
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Product>>;
    async fn sku_exists(&self, sku: &str, exclude_id: Option<&str>) -> DomainResult<bool>;
    async fn create(&self, product: Product) -> DomainResult<Product>;
    async fn update(&self, product: Product) -> DomainResult<Product>;
    async fn upsert_by_slug(&self, product: Product) -> DomainResult<Product>;
    /// Live (not soft-deleted) products in a category
    async fn count_by_category(&self, category_id: &str) -> DomainResult<u64>;
    async fn count(&self) -> DomainResult<u64>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn list(&self, active_only: bool) -> DomainResult<Vec<Service>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Service>>;
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Service>>;
    async fn create(&self, service: Service) -> DomainResult<Service>;
    async fn update(&self, service: Service) -> DomainResult<Service>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    async fn upsert_by_slug(&self, service: Service) -> DomainResult<Service>;
    async fn count(&self) -> DomainResult<u64>;
}
