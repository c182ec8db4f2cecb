//! Catalog domain entities

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::shared::PaginationParams;

/// Product category (tree via `parent_id`)
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
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

impl Category {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slug: slug.into(),
            name: name.into(),
            description: None,
            image_url: None,
            parent_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sellable product. Prices are whole VND.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub slug: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price_cents: i64,
    /// Price before discount, shown struck through
    pub original_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub brand: Option<String>,
    pub images: Vec<String>,
    pub specifications: Option<Value>,
    pub category_id: Option<String>,
    pub featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slug: slug.into(),
            sku: String::new(),
            name: name.into(),
            description: None,
            short_description: None,
            price_cents,
            original_price_cents: None,
            stock_quantity: 0,
            brand: None,
            images: Vec::new(),
            specifications: None,
            category_id: None,
            featured: false,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Whole-percent discount relative to `original_price_cents`
    pub fn discount_percent(&self) -> Option<u8> {
        let original = self.original_price_cents?;
        if original <= self.price_cents || original <= 0 {
            return None;
        }
        let pct = ((original - self.price_cents) * 100) / original;
        Some(pct as u8)
    }

    /// Mark as removed from the storefront without deleting the row
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.is_active = false;
        self.updated_at = now;
    }
}

/// Product list query
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub featured: Option<bool>,
    /// Admin listings also see inactive (but never soft-deleted) products
    pub include_inactive: bool,
    pub pagination: PaginationParams,
}

/// Installation / repair service that customers can book
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price_cents: i64,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, base_price_cents: i64) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slug: slug.into(),
            name: name.into(),
            description: None,
            base_price_cents,
            duration_minutes: 60,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_percent_only_when_cheaper() {
        let mut p = Product::new("loa-jbl", "Loa JBL", 8_000_000);
        assert_eq!(p.discount_percent(), None);

        p.original_price_cents = Some(10_000_000);
        assert_eq!(p.discount_percent(), Some(20));

        p.original_price_cents = Some(7_000_000);
        assert_eq!(p.discount_percent(), None);
    }

    #[test]
    fn soft_delete_hides_product() {
        let mut p = Product::new("micro-shure", "Micro Shure", 2_500_000);
        assert!(!p.is_deleted());
        p.soft_delete();
        assert!(p.is_deleted());
        assert!(!p.is_active);
    }
}
