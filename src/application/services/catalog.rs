//! Catalog use-cases: categories, products and bookable services

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::domain::catalog::{Category, Product, ProductFilter, Service};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{is_valid_slug, slugify, PaginatedResult, PaginationParams};

/// Public product listing query; the category is addressed by slug
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_slug: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub featured: Option<bool>,
    pub include_inactive: bool,
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub slug: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price_cents: i64,
    pub original_price_cents: Option<i64>,
    pub stock_quantity: Option<i32>,
    pub brand: Option<String>,
    pub images: Vec<String>,
    pub specifications: Option<Value>,
    pub category_id: Option<String>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price_cents: Option<i64>,
    pub original_price_cents: Option<i64>,
    pub stock_quantity: Option<i32>,
    pub brand: Option<String>,
    pub images: Option<Vec<String>>,
    pub specifications: Option<Value>,
    pub category_id: Option<String>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceInput {
    pub slug: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub base_price_cents: i64,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price_cents: Option<i64>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

/// Explicit slug when given (must be well formed), otherwise derived from the name.
pub(crate) fn resolve_slug(explicit: Option<String>, name: &str) -> DomainResult<String> {
    let slug = match explicit {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => slugify(name),
    };
    if !is_valid_slug(&slug) {
        return Err(DomainError::Validation(format!("Invalid slug: '{}'", slug)));
    }
    Ok(slug)
}

fn require_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("Name is required".into()));
    }
    Ok(())
}

fn require_positive_price(price_cents: i64) -> DomainResult<()> {
    if price_cents <= 0 {
        return Err(DomainError::Validation("Price must be greater than 0".into()));
    }
    Ok(())
}

/// `ATL-<SLUG PREFIX>-<4 hex>`; uniqueness is checked by the caller.
pub fn generate_sku(slug: &str) -> String {
    let prefix: String = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .take(3)
        .map(|part| part.chars().take(3).collect::<String>())
        .collect::<Vec<_>>()
        .join("")
        .to_uppercase();
    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..4];
    format!("ATL-{}-{}", prefix, suffix.to_uppercase())
}

pub struct CatalogService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CatalogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Categories ──────────────────────────────────────────────

    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        self.repos.categories().find_all().await
    }

    pub async fn get_category(&self, id: &str) -> DomainResult<Category> {
        self.repos
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", "id", id))
    }

    async fn check_parent(&self, parent_id: Option<&str>, self_id: Option<&str>) -> DomainResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        if Some(parent_id) == self_id {
            return Err(DomainError::Validation(
                "Category cannot be its own parent".into(),
            ));
        }
        let Some(parent) = self.repos.categories().find_by_id(parent_id).await? else {
            return Err(DomainError::not_found("Category", "id", parent_id));
        };

        // Walk up from the new parent; meeting self (or any repeat) is a cycle.
        let mut seen = HashSet::from([parent.id.clone()]);
        let mut next = parent.parent_id;
        while let Some(ancestor_id) = next {
            if Some(ancestor_id.as_str()) == self_id || !seen.insert(ancestor_id.clone()) {
                return Err(DomainError::Validation(
                    "Category cannot be moved under its own descendant".into(),
                ));
            }
            next = match self.repos.categories().find_by_id(&ancestor_id).await? {
                Some(ancestor) => ancestor.parent_id,
                None => None,
            };
        }
        Ok(())
    }

    pub async fn create_category(&self, input: CategoryInput) -> DomainResult<Category> {
        require_name(&input.name)?;
        let slug = resolve_slug(input.slug, &input.name)?;
        self.check_parent(input.parent_id.as_deref(), None).await?;

        let mut category = Category::new(slug, input.name.trim());
        category.description = input.description;
        category.image_url = input.image_url;
        category.parent_id = input.parent_id;
        category.is_active = input.is_active.unwrap_or(true);

        let category = self.repos.categories().create(category).await?;
        info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn update_category(&self, id: &str, patch: CategoryPatch) -> DomainResult<Category> {
        let mut category = self.get_category(id).await?;
        if let Some(name) = patch.name {
            require_name(&name)?;
            category.name = name.trim().to_string();
        }
        if let Some(slug) = patch.slug {
            category.slug = resolve_slug(Some(slug), &category.name)?;
        }
        if patch.parent_id.is_some() {
            self.check_parent(patch.parent_id.as_deref(), Some(id)).await?;
            category.parent_id = patch.parent_id;
        }
        if patch.description.is_some() {
            category.description = patch.description;
        }
        if patch.image_url.is_some() {
            category.image_url = patch.image_url;
        }
        if let Some(active) = patch.is_active {
            category.is_active = active;
        }
        self.repos.categories().update(category).await
    }

    /// Refused while live products or subcategories still point at it.
    pub async fn delete_category(&self, id: &str) -> DomainResult<()> {
        self.get_category(id).await?;
        let products = self.repos.products().count_by_category(id).await?;
        if products > 0 {
            return Err(DomainError::Conflict(format!(
                "Category still has {} product(s)",
                products
            )));
        }
        let children = self.repos.categories().count_children(id).await?;
        if children > 0 {
            return Err(DomainError::Conflict(format!(
                "Category still has {} subcategory(ies)",
                children
            )));
        }
        self.repos.categories().delete(id).await?;
        info!(category_id = %id, "Category deleted");
        Ok(())
    }

    pub async fn upsert_category_by_slug(&self, input: CategoryInput) -> DomainResult<Category> {
        require_name(&input.name)?;
        let slug = resolve_slug(input.slug, &input.name)?;
        let mut category = Category::new(slug, input.name.trim());
        category.description = input.description;
        category.image_url = input.image_url;
        category.parent_id = input.parent_id;
        category.is_active = input.is_active.unwrap_or(true);
        self.repos.categories().upsert_by_slug(category).await
    }

    // ── Products ────────────────────────────────────────────────

    pub async fn list_products(&self, query: ProductQuery) -> DomainResult<PaginatedResult<Product>> {
        if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
            if min > max {
                return Err(DomainError::Validation(
                    "min_price must not exceed max_price".into(),
                ));
            }
        }

        let category_id = match query.category_slug.as_deref() {
            Some(slug) => match self.repos.categories().find_by_slug(slug).await? {
                Some(c) => Some(c.id),
                // Unknown category: nothing can match
                None => {
                    return Ok(PaginatedResult::new(
                        Vec::new(),
                        0,
                        query.pagination.page,
                        query.pagination.limit,
                    ))
                }
            },
            None => None,
        };

        self.repos
            .products()
            .list(ProductFilter {
                search: query.search.filter(|s| !s.trim().is_empty()),
                category_id,
                min_price: query.min_price,
                max_price: query.max_price,
                featured: query.featured,
                include_inactive: query.include_inactive,
                pagination: query.pagination,
            })
            .await
    }

    /// Soft-deleted products read as missing.
    pub async fn get_product(&self, id: &str) -> DomainResult<Product> {
        match self.repos.products().find_by_id(id).await? {
            Some(p) if !p.is_deleted() => Ok(p),
            _ => Err(DomainError::not_found("Product", "id", id)),
        }
    }

    pub async fn get_product_by_slug(&self, slug: &str) -> DomainResult<Product> {
        match self.repos.products().find_by_slug(slug).await? {
            Some(p) if !p.is_deleted() && p.is_active => Ok(p),
            _ => Err(DomainError::not_found("Product", "slug", slug)),
        }
    }

    async fn check_category(&self, category_id: Option<&str>) -> DomainResult<()> {
        if let Some(id) = category_id {
            if self.repos.categories().find_by_id(id).await?.is_none() {
                return Err(DomainError::not_found("Category", "id", id));
            }
        }
        Ok(())
    }

    async fn unique_sku(&self, requested: Option<String>, slug: &str, product_id: &str) -> DomainResult<String> {
        if let Some(sku) = requested.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            if self.repos.products().sku_exists(&sku, Some(product_id)).await? {
                return Err(DomainError::Conflict(format!("SKU '{}' already exists", sku)));
            }
            return Ok(sku);
        }
        loop {
            let sku = generate_sku(slug);
            if !self.repos.products().sku_exists(&sku, Some(product_id)).await? {
                return Ok(sku);
            }
        }
    }

    fn build_product(slug: String, input: ProductInput) -> Product {
        let mut product = Product::new(slug, input.name.trim(), input.price_cents);
        product.description = input.description;
        product.short_description = input.short_description;
        product.original_price_cents = input.original_price_cents;
        product.stock_quantity = input.stock_quantity.unwrap_or(0);
        product.brand = input.brand;
        product.images = input.images;
        product.specifications = input.specifications;
        product.category_id = input.category_id;
        product.featured = input.featured.unwrap_or(false);
        product.is_active = input.is_active.unwrap_or(true);
        product
    }

    pub async fn create_product(&self, input: ProductInput) -> DomainResult<Product> {
        require_name(&input.name)?;
        require_positive_price(input.price_cents)?;
        if input.stock_quantity.is_some_and(|q| q < 0) {
            return Err(DomainError::Validation("Stock cannot be negative".into()));
        }
        let slug = resolve_slug(input.slug.clone(), &input.name)?;
        if self.repos.products().find_by_slug(&slug).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Product slug '{}' already exists",
                slug
            )));
        }
        self.check_category(input.category_id.as_deref()).await?;

        let requested_sku = input.sku.clone();
        let mut product = Self::build_product(slug, input);
        product.sku = self.unique_sku(requested_sku, &product.slug, &product.id).await?;

        let product = self.repos.products().create(product).await?;
        info!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> DomainResult<Product> {
        let mut product = self.get_product(id).await?;

        if let Some(name) = patch.name {
            require_name(&name)?;
            product.name = name.trim().to_string();
        }
        if let Some(slug) = patch.slug {
            let slug = resolve_slug(Some(slug), &product.name)?;
            if slug != product.slug {
                if self.repos.products().find_by_slug(&slug).await?.is_some() {
                    return Err(DomainError::Conflict(format!(
                        "Product slug '{}' already exists",
                        slug
                    )));
                }
                product.slug = slug;
            }
        }
        if let Some(sku) = patch.sku {
            product.sku = self.unique_sku(Some(sku), &product.slug, &product.id).await?;
        }
        if let Some(price) = patch.price_cents {
            require_positive_price(price)?;
            product.price_cents = price;
        }
        if let Some(qty) = patch.stock_quantity {
            if qty < 0 {
                return Err(DomainError::Validation("Stock cannot be negative".into()));
            }
            product.stock_quantity = qty;
        }
        if patch.category_id.is_some() {
            self.check_category(patch.category_id.as_deref()).await?;
            product.category_id = patch.category_id;
        }
        if patch.description.is_some() {
            product.description = patch.description;
        }
        if patch.short_description.is_some() {
            product.short_description = patch.short_description;
        }
        if patch.original_price_cents.is_some() {
            product.original_price_cents = patch.original_price_cents;
        }
        if patch.brand.is_some() {
            product.brand = patch.brand;
        }
        if let Some(images) = patch.images {
            product.images = images;
        }
        if patch.specifications.is_some() {
            product.specifications = patch.specifications;
        }
        if let Some(featured) = patch.featured {
            product.featured = featured;
        }
        if let Some(active) = patch.is_active {
            product.is_active = active;
        }

        self.repos.products().update(product).await
    }

    /// Soft delete: the row stays, hidden from every listing.
    pub async fn delete_product(&self, id: &str) -> DomainResult<()> {
        let mut product = self.get_product(id).await?;
        product.soft_delete();
        self.repos.products().update(product).await?;
        info!(product_id = %id, "Product soft-deleted");
        Ok(())
    }

    pub async fn upsert_product_by_slug(&self, input: ProductInput) -> DomainResult<Product> {
        require_name(&input.name)?;
        require_positive_price(input.price_cents)?;
        let slug = resolve_slug(input.slug.clone(), &input.name)?;
        self.check_category(input.category_id.as_deref()).await?;

        let existing = self.repos.products().find_by_slug(&slug).await?;
        let requested_sku = input.sku.clone();
        let mut product = Self::build_product(slug, input);
        if let Some(existing) = &existing {
            product.id = existing.id.clone();
        }
        product.sku = match (requested_sku, existing) {
            (Some(sku), _) => self.unique_sku(Some(sku), &product.slug, &product.id).await?,
            (None, Some(existing)) => existing.sku,
            (None, None) => self.unique_sku(None, &product.slug, &product.id).await?,
        };
        self.repos.products().upsert_by_slug(product).await
    }

    // ── Services ────────────────────────────────────────────────

    pub async fn list_services(&self, active_only: bool) -> DomainResult<Vec<Service>> {
        self.repos.services().list(active_only).await
    }

    pub async fn get_service(&self, id: &str) -> DomainResult<Service> {
        self.repos
            .services()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", "id", id))
    }

    pub async fn get_service_by_slug(&self, slug: &str) -> DomainResult<Service> {
        self.repos
            .services()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", "slug", slug))
    }

    fn build_service(slug: String, input: ServiceInput) -> DomainResult<Service> {
        require_name(&input.name)?;
        if input.base_price_cents < 0 {
            return Err(DomainError::Validation("Price cannot be negative".into()));
        }
        let mut service = Service::new(slug, input.name.trim(), input.base_price_cents);
        service.description = input.description;
        if let Some(minutes) = input.duration_minutes {
            if minutes <= 0 {
                return Err(DomainError::Validation("Duration must be positive".into()));
            }
            service.duration_minutes = minutes;
        }
        service.is_active = input.is_active.unwrap_or(true);
        Ok(service)
    }

    pub async fn create_service(&self, input: ServiceInput) -> DomainResult<Service> {
        let slug = resolve_slug(input.slug.clone(), &input.name)?;
        let service = Self::build_service(slug, input)?;
        let service = self.repos.services().create(service).await?;
        info!(service_id = %service.id, slug = %service.slug, "Service created");
        Ok(service)
    }

    pub async fn update_service(&self, id: &str, patch: ServicePatch) -> DomainResult<Service> {
        let mut service = self.get_service(id).await?;
        if let Some(name) = patch.name {
            require_name(&name)?;
            service.name = name.trim().to_string();
        }
        if let Some(slug) = patch.slug {
            service.slug = resolve_slug(Some(slug), &service.name)?;
        }
        if patch.description.is_some() {
            service.description = patch.description;
        }
        if let Some(price) = patch.base_price_cents {
            if price < 0 {
                return Err(DomainError::Validation("Price cannot be negative".into()));
            }
            service.base_price_cents = price;
        }
        if let Some(minutes) = patch.duration_minutes {
            if minutes <= 0 {
                return Err(DomainError::Validation("Duration must be positive".into()));
            }
            service.duration_minutes = minutes;
        }
        if let Some(active) = patch.is_active {
            service.is_active = active;
        }
        self.repos.services().update(service).await
    }

    pub async fn delete_service(&self, id: &str) -> DomainResult<()> {
        self.get_service(id).await?;
        let bookings = self.repos.bookings().count_by_service(id).await?;
        if bookings > 0 {
            return Err(DomainError::Conflict(format!(
                "Service still has {} booking(s)",
                bookings
            )));
        }
        self.repos.services().delete(id).await?;
        info!(service_id = %id, "Service deleted");
        Ok(())
    }

    pub async fn upsert_service_by_slug(&self, input: ServiceInput) -> DomainResult<Service> {
        let slug = resolve_slug(input.slug.clone(), &input.name)?;
        let service = Self::build_service(slug, input)?;
        self.repos.services().upsert_by_slug(service).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    async fn service() -> CatalogService {
        let repos = SeaOrmRepositoryProvider::new(test_connection().await);
        CatalogService::new(Arc::new(repos))
    }

    fn product(name: &str, price: i64) -> ProductInput {
        ProductInput {
            name: name.into(),
            price_cents: price,
            ..Default::default()
        }
    }

    #[test]
    fn sku_has_store_prefix() {
        let sku = generate_sku("loa-karaoke-jbl-pasion");
        assert!(sku.starts_with("ATL-LOAKARJBL-"));
        assert_eq!(sku.len(), "ATL-LOAKARJBL-".len() + 4);
    }

    #[tokio::test]
    async fn create_product_derives_slug_and_sku() {
        let svc = service().await;
        let p = svc
            .create_product(product("Loa Karaoke Đỉnh Cao", 5_500_000))
            .await
            .unwrap();
        assert_eq!(p.slug, "loa-karaoke-dinh-cao");
        assert!(p.sku.starts_with("ATL-"));
        assert_eq!(svc.get_product_by_slug(&p.slug).await.unwrap().id, p.id);
    }

    #[tokio::test]
    async fn create_product_rejects_zero_price_and_duplicate_slug() {
        let svc = service().await;
        let err = svc.create_product(product("Micro", 0)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        svc.create_product(product("Micro", 900_000)).await.unwrap();
        let err = svc.create_product(product("Micro", 900_000)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleted_product_disappears() {
        let svc = service().await;
        let p = svc.create_product(product("Amply", 3_000_000)).await.unwrap();
        svc.delete_product(&p.id).await.unwrap();

        assert!(matches!(
            svc.get_product(&p.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        let page = svc.list_products(ProductQuery::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn category_with_products_cannot_be_deleted() {
        let svc = service().await;
        let cat = svc
            .create_category(CategoryInput {
                name: "Loa".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let mut input = product("Loa JBL", 4_000_000);
        input.category_id = Some(cat.id.clone());
        let p = svc.create_product(input).await.unwrap();

        let err = svc.delete_category(&cat.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        svc.delete_product(&p.id).await.unwrap();
        svc.delete_category(&cat.id).await.unwrap();
    }

    #[tokio::test]
    async fn booked_service_cannot_be_deleted() {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let svc = CatalogService::new(repos.clone());
        let booked = svc
            .create_service(ServiceInput {
                name: "Lắp đặt loa".into(),
                base_price_cents: 300_000,
                ..Default::default()
            })
            .await
            .unwrap();
        let idle = svc
            .create_service(ServiceInput {
                name: "Vệ sinh amply".into(),
                base_price_cents: 150_000,
                ..Default::default()
            })
            .await
            .unwrap();
        repos
            .bookings()
            .create(crate::domain::booking::Booking::new(
                booked.id.clone(),
                "Trần B",
                "0901234567",
                chrono::Utc::now() + chrono::Duration::days(2),
            ))
            .await
            .unwrap();

        let err = svc.delete_service(&booked.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(svc.get_service(&booked.id).await.is_ok());

        svc.delete_service(&idle.id).await.unwrap();
        let err = svc.delete_service(&idle.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn category_cannot_move_under_its_descendant() {
        let svc = service().await;
        let root = svc
            .create_category(CategoryInput {
                name: "Âm thanh".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let child = svc
            .create_category(CategoryInput {
                name: "Loa".into(),
                parent_id: Some(root.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        let grandchild = svc
            .create_category(CategoryInput {
                name: "Loa kéo".into(),
                parent_id: Some(child.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();

        for descendant in [&child.id, &grandchild.id] {
            let err = svc
                .update_category(
                    &root.id,
                    CategoryPatch {
                        parent_id: Some(descendant.clone()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{:?}", err);
        }
        assert_eq!(svc.get_category(&root.id).await.unwrap().parent_id, None);

        let sibling = svc
            .create_category(CategoryInput {
                name: "Micro".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let moved = svc
            .update_category(
                &sibling.id,
                CategoryPatch {
                    parent_id: Some(grandchild.id.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.parent_id.as_deref(), Some(grandchild.id.as_str()));
    }

    #[tokio::test]
    async fn list_by_category_slug() {
        let svc = service().await;
        let cat = svc
            .create_category(CategoryInput {
                name: "Micro không dây".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let mut input = product("Micro Shure", 2_000_000);
        input.category_id = Some(cat.id.clone());
        svc.create_product(input).await.unwrap();
        svc.create_product(product("Loa Bose", 9_000_000)).await.unwrap();

        let page = svc
            .list_products(ProductQuery {
                category_slug: Some("micro-khong-day".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let none = svc
            .list_products(ProductQuery {
                category_slug: Some("khong-ton-tai".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(none.total, 0);
    }

    #[tokio::test]
    async fn upsert_product_keeps_sku() {
        let svc = service().await;
        let first = svc
            .upsert_product_by_slug(product("Loa Array", 10_000_000))
            .await
            .unwrap();
        let second = svc
            .upsert_product_by_slug(product("Loa Array", 11_000_000))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.sku, second.sku);
        assert_eq!(second.price_cents, 11_000_000);
    }
}
