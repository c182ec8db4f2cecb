//! SeaORM implementations of the catalog repositories

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{db_err, decode_json, decode_list, encode_json, encode_list, write_err};
use crate::domain::catalog::{
    Category, CategoryRepository, Product, ProductFilter, ProductRepository, Service,
    ServiceRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{category, product, service};
use crate::shared::PaginatedResult;

// ── Conversion helpers ──────────────────────────────────────────

fn category_to_domain(m: category::Model) -> Category {
    Category {
        id: m.id,
        slug: m.slug,
        name: m.name,
        description: m.description,
        image_url: m.image_url,
        parent_id: m.parent_id,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn category_to_active(c: Category) -> category::ActiveModel {
    category::ActiveModel {
        id: Set(c.id),
        slug: Set(c.slug),
        name: Set(c.name),
        description: Set(c.description),
        image_url: Set(c.image_url),
        parent_id: Set(c.parent_id),
        is_active: Set(c.is_active),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

fn product_to_domain(m: product::Model) -> Product {
    Product {
        id: m.id,
        slug: m.slug,
        sku: m.sku,
        name: m.name,
        description: m.description,
        short_description: m.short_description,
        price_cents: m.price_cents,
        original_price_cents: m.original_price_cents,
        stock_quantity: m.stock_quantity,
        brand: m.brand,
        images: decode_list(&m.images),
        specifications: decode_json(m.specifications),
        category_id: m.category_id,
        featured: m.featured,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
        deleted_at: m.deleted_at,
    }
}

fn product_to_active(p: Product) -> product::ActiveModel {
    product::ActiveModel {
        id: Set(p.id),
        slug: Set(p.slug),
        sku: Set(p.sku),
        name: Set(p.name),
        description: Set(p.description),
        short_description: Set(p.short_description),
        price_cents: Set(p.price_cents),
        original_price_cents: Set(p.original_price_cents),
        stock_quantity: Set(p.stock_quantity),
        brand: Set(p.brand),
        images: Set(encode_list(&p.images)),
        specifications: Set(encode_json(&p.specifications)),
        category_id: Set(p.category_id),
        featured: Set(p.featured),
        is_active: Set(p.is_active),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
        deleted_at: Set(p.deleted_at),
    }
}

fn service_to_domain(m: service::Model) -> Service {
    Service {
        id: m.id,
        slug: m.slug,
        name: m.name,
        description: m.description,
        base_price_cents: m.base_price_cents,
        duration_minutes: m.duration_minutes,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn service_to_active(s: Service) -> service::ActiveModel {
    service::ActiveModel {
        id: Set(s.id),
        slug: Set(s.slug),
        name: Set(s.name),
        description: Set(s.description),
        base_price_cents: Set(s.base_price_cents),
        duration_minutes: Set(s.duration_minutes),
        is_active: Set(s.is_active),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

// ── SeaOrmCategoryRepository ────────────────────────────────────

pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find_all(&self) -> DomainResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(category_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Category>> {
        let model = category::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(category_to_domain))
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Category>> {
        let model = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(category_to_domain))
    }

    async fn create(&self, c: Category) -> DomainResult<Category> {
        let slug = c.slug.clone();
        let result = category_to_active(c)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Category slug '{}' already exists", slug)))?;
        info!("Category created: {} ({})", result.slug, result.id);
        Ok(category_to_domain(result))
    }

    async fn update(&self, mut c: Category) -> DomainResult<Category> {
        if self.find_by_id(&c.id).await?.is_none() {
            return Err(DomainError::not_found("Category", "id", c.id));
        }
        c.updated_at = Utc::now();
        let slug = c.slug.clone();
        let result = category_to_active(c)
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Category slug '{}' already exists", slug)))?;
        info!("Category updated: {}", result.id);
        Ok(category_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = category::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Category", "id", id));
        }
        info!("Category deleted: {}", id);
        Ok(())
    }

    async fn upsert_by_slug(&self, mut c: Category) -> DomainResult<Category> {
        match self.find_by_slug(&c.slug).await? {
            Some(existing) => {
                c.id = existing.id;
                c.created_at = existing.created_at;
                self.update(c).await
            }
            None => self.create(c).await,
        }
    }

    async fn count_children(&self, id: &str) -> DomainResult<u64> {
        category::Entity::find()
            .filter(category::Column::ParentId.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count(&self) -> DomainResult<u64> {
        category::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

// ── SeaOrmProductRepository ─────────────────────────────────────

pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn list(&self, filter: ProductFilter) -> DomainResult<PaginatedResult<Product>> {
        let mut query = product::Entity::find().filter(product::Column::DeletedAt.is_null());

        if !filter.include_inactive {
            query = query.filter(product::Column::IsActive.eq(true));
        }
        if let Some(ref search) = filter.search {
            query = query.filter(
                Condition::any()
                    .add(product::Column::Name.contains(search))
                    .add(product::Column::Sku.contains(search))
                    .add(product::Column::Brand.contains(search)),
            );
        }
        if let Some(ref category_id) = filter.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id.as_str()));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(product::Column::PriceCents.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(product::Column::PriceCents.lte(max));
        }
        if let Some(featured) = filter.featured {
            query = query.filter(product::Column::Featured.eq(featured));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let page = filter.pagination;
        let models = query
            .order_by_desc(product::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(product_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Product>> {
        let model = product::Entity::find_by_id(id.to_string())
            .filter(product::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(product_to_domain))
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Product>> {
        let model = product::Entity::find()
            .filter(product::Column::Slug.eq(slug))
            .filter(product::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(product_to_domain))
    }

    async fn sku_exists(&self, sku: &str, exclude_id: Option<&str>) -> DomainResult<bool> {
        let mut query = product::Entity::find().filter(product::Column::Sku.eq(sku));
        if let Some(id) = exclude_id {
            query = query.filter(product::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.map_err(db_err)?;
        Ok(count > 0)
    }

    async fn create(&self, p: Product) -> DomainResult<Product> {
        let slug = p.slug.clone();
        let result = product_to_active(p)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Product slug or SKU '{}' already exists", slug)))?;
        info!("Product created: {} ({})", result.slug, result.id);
        Ok(product_to_domain(result))
    }

    async fn update(&self, mut p: Product) -> DomainResult<Product> {
        let exists = product::Entity::find_by_id(p.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Product", "id", p.id));
        }
        p.updated_at = Utc::now();
        let slug = p.slug.clone();
        let result = product_to_active(p)
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Product slug or SKU '{}' already exists", slug)))?;
        info!("Product updated: {}", result.id);
        Ok(product_to_domain(result))
    }

    async fn upsert_by_slug(&self, mut p: Product) -> DomainResult<Product> {
        // Soft-deleted rows still own their slug, so look them up too.
        let existing = product::Entity::find()
            .filter(product::Column::Slug.eq(p.slug.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match existing {
            Some(existing) => {
                p.id = existing.id;
                p.created_at = existing.created_at;
                if p.sku.is_empty() {
                    p.sku = existing.sku;
                }
                self.update(p).await
            }
            None => self.create(p).await,
        }
    }

    async fn count_by_category(&self, category_id: &str) -> DomainResult<u64> {
        product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .filter(product::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count(&self) -> DomainResult<u64> {
        product::Entity::find()
            .filter(product::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

// ── SeaOrmServiceRepository ─────────────────────────────────────

pub struct SeaOrmServiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn list(&self, active_only: bool) -> DomainResult<Vec<Service>> {
        let mut query = service::Entity::find();
        if active_only {
            query = query.filter(service::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_asc(service::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(service_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Service>> {
        let model = service::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(service_to_domain))
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Service>> {
        let model = service::Entity::find()
            .filter(service::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(service_to_domain))
    }

    async fn create(&self, s: Service) -> DomainResult<Service> {
        let slug = s.slug.clone();
        let result = service_to_active(s)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Service slug '{}' already exists", slug)))?;
        info!("Service created: {} ({})", result.slug, result.id);
        Ok(service_to_domain(result))
    }

    async fn update(&self, mut s: Service) -> DomainResult<Service> {
        if self.find_by_id(&s.id).await?.is_none() {
            return Err(DomainError::not_found("Service", "id", s.id));
        }
        s.updated_at = Utc::now();
        let slug = s.slug.clone();
        let result = service_to_active(s)
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Service slug '{}' already exists", slug)))?;
        info!("Service updated: {}", result.id);
        Ok(service_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = service::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| {
                write_err(e, || "Service is still referenced by bookings".to_string())
            })?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Service", "id", id));
        }
        info!("Service deleted: {}", id);
        Ok(())
    }

    async fn upsert_by_slug(&self, mut s: Service) -> DomainResult<Service> {
        match self.find_by_slug(&s.slug).await? {
            Some(existing) => {
                s.id = existing.id;
                s.created_at = existing.created_at;
                self.update(s).await
            }
            None => self.create(s).await,
        }
    }

    async fn count(&self) -> DomainResult<u64> {
        service::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;
    use crate::shared::PaginationParams;

    #[tokio::test]
    async fn upsert_by_slug_keeps_single_row() {
        let repo = SeaOrmCategoryRepository::new(test_connection().await);

        let first = repo
            .upsert_by_slug(Category::new("loa-karaoke", "Loa karaoke"))
            .await
            .unwrap();
        let second = repo
            .upsert_by_slug(Category::new("loa-karaoke", "Loa Karaoke cao cấp"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Loa Karaoke cao cấp");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_slug_is_conflict() {
        let repo = SeaOrmServiceRepository::new(test_connection().await);
        repo.create(Service::new("lap-dat", "Lắp đặt", 500_000))
            .await
            .unwrap();
        let err = repo
            .create(Service::new("lap-dat", "Lắp đặt 2", 600_000))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_skips_soft_deleted_and_filters_price() {
        let repo = SeaOrmProductRepository::new(test_connection().await);

        let mut cheap = Product::new("micro-a", "Micro A", 1_000_000);
        cheap.sku = "SKU-A".into();
        let mut pricey = Product::new("amply-b", "Amply B", 15_000_000);
        pricey.sku = "SKU-B".into();
        let mut gone = Product::new("loa-c", "Loa C", 5_000_000);
        gone.sku = "SKU-C".into();
        gone.soft_delete();

        repo.create(cheap).await.unwrap();
        repo.create(pricey).await.unwrap();
        repo.create(gone).await.unwrap();

        let all = repo
            .list(ProductFilter {
                include_inactive: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.total, 2);

        let filtered = repo
            .list(ProductFilter {
                min_price: Some(2_000_000),
                pagination: PaginationParams::new(Some(1), Some(10), 20),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.items.len(), 1);
        assert_eq!(filtered.items[0].slug, "amply-b");

        assert!(repo.find_by_slug("loa-c").await.unwrap().is_none());
        assert!(repo.sku_exists("SKU-C", None).await.unwrap());
    }
}
