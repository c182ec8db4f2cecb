//! Catalog DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::catalog::{
    CategoryInput, CategoryPatch, ProductInput, ProductPatch, ProductQuery, ServiceInput,
    ServicePatch,
};
use crate::domain::{Category, Product, Service};
use crate::shared::{validate_slug, PaginationParams};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDto {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            slug: c.slug,
            name: c.name,
            description: c.description,
            image_url: c.image_url,
            parent_id: c.parent_id,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: String,
    pub slug: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    /// Whole VND
    pub price_cents: i64,
    pub original_price_cents: Option<i64>,
    pub discount_percent: Option<u8>,
    pub stock_quantity: i32,
    pub in_stock: bool,
    pub brand: Option<String>,
    pub images: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub specifications: Option<Value>,
    pub category_id: Option<String>,
    pub featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            discount_percent: p.discount_percent(),
            in_stock: p.in_stock(),
            id: p.id,
            slug: p.slug,
            sku: p.sku,
            name: p.name,
            description: p.description,
            short_description: p.short_description,
            price_cents: p.price_cents,
            original_price_cents: p.original_price_cents,
            stock_quantity: p.stock_quantity,
            brand: p.brand,
            images: p.images,
            specifications: p.specifications,
            category_id: p.category_id,
            featured: p.featured,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceDto {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price_cents: i64,
    pub duration_minutes: i32,
    pub is_active: bool,
}

impl From<Service> for ServiceDto {
    fn from(s: Service) -> Self {
        Self {
            id: s.id,
            slug: s.slug,
            name: s.name,
            description: s.description,
            base_price_cents: s.base_price_cents,
            duration_minutes: s.duration_minutes,
            is_active: s.is_active,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Matches name, SKU or brand
    pub search: Option<String>,
    /// Category slug
    pub category: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub featured: Option<bool>,
}

impl From<ProductListQuery> for ProductQuery {
    fn from(q: ProductListQuery) -> Self {
        Self {
            search: q.search.filter(|s| !s.trim().is_empty()),
            category_slug: q.category.filter(|s| !s.trim().is_empty()),
            min_price: q.min_price,
            max_price: q.max_price,
            featured: q.featured,
            include_inactive: false,
            pagination: PaginationParams::new(q.page, q.limit, 20),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(url(message = "image_url must be a URL"))]
    pub image_url: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: Option<bool>,
}

impl From<CreateCategoryRequest> for CategoryInput {
    fn from(r: CreateCategoryRequest) -> Self {
        Self {
            slug: r.slug,
            name: r.name,
            description: r.description,
            image_url: r.image_url,
            parent_id: r.parent_id,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateCategoryRequest> for CategoryPatch {
    fn from(r: UpdateCategoryRequest) -> Self {
        Self {
            slug: r.slug,
            name: r.name,
            description: r.description,
            image_url: r.image_url,
            parent_id: r.parent_id,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 64))]
    pub sku: Option<String>,
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    #[validate(range(min = 1, message = "price must be greater than 0"))]
    pub price_cents: i64,
    #[validate(range(min = 1))]
    pub original_price_cents: Option<i64>,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub stock_quantity: Option<i32>,
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub specifications: Option<Value>,
    pub category_id: Option<String>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl From<CreateProductRequest> for ProductInput {
    fn from(r: CreateProductRequest) -> Self {
        Self {
            slug: r.slug,
            sku: r.sku,
            name: r.name,
            description: r.description,
            short_description: r.short_description,
            price_cents: r.price_cents,
            original_price_cents: r.original_price_cents,
            stock_quantity: r.stock_quantity,
            brand: r.brand,
            images: r.images,
            specifications: r.specifications,
            category_id: r.category_id,
            featured: r.featured,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 64))]
    pub sku: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    #[validate(range(min = 1, message = "price must be greater than 0"))]
    pub price_cents: Option<i64>,
    #[validate(range(min = 1))]
    pub original_price_cents: Option<i64>,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i32>,
    pub brand: Option<String>,
    pub images: Option<Vec<String>>,
    #[schema(value_type = Option<Object>)]
    pub specifications: Option<Value>,
    pub category_id: Option<String>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(r: UpdateProductRequest) -> Self {
        Self {
            slug: r.slug,
            sku: r.sku,
            name: r.name,
            description: r.description,
            short_description: r.short_description,
            price_cents: r.price_cents,
            original_price_cents: r.original_price_cents,
            stock_quantity: r.stock_quantity,
            brand: r.brand,
            images: r.images,
            specifications: r.specifications,
            category_id: r.category_id,
            featured: r.featured,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub base_price_cents: i64,
    #[validate(range(min = 15, max = 1440, message = "duration must be 15–1440 minutes"))]
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<CreateServiceRequest> for ServiceInput {
    fn from(r: CreateServiceRequest) -> Self {
        Self {
            slug: r.slug,
            name: r.name,
            description: r.description,
            base_price_cents: r.base_price_cents,
            duration_minutes: r.duration_minutes,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub base_price_cents: Option<i64>,
    #[validate(range(min = 15, max = 1440))]
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UpdateServiceRequest> for ServicePatch {
    fn from(r: UpdateServiceRequest) -> Self {
        Self {
            slug: r.slug,
            name: r.name,
            description: r.description,
            base_price_cents: r.base_price_cents,
            duration_minutes: r.duration_minutes,
            is_active: r.is_active,
        }
    }
}
