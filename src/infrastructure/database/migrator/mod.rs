//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_catalog;
mod m20250101_000003_create_technicians;
mod m20250101_000004_create_bookings;
mod m20250101_000005_create_i18n;
mod m20250101_000006_create_orders_payments;
mod m20250101_000007_create_files;
mod m20250101_000008_create_content;
mod m20250101_000009_create_service_reviews;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_catalog::Migration),
            Box::new(m20250101_000003_create_technicians::Migration),
            Box::new(m20250101_000004_create_bookings::Migration),
            Box::new(m20250101_000005_create_i18n::Migration),
            Box::new(m20250101_000006_create_orders_payments::Migration),
            Box::new(m20250101_000007_create_files::Migration),
            Box::new(m20250101_000008_create_content::Migration),
            Box::new(m20250101_000009_create_service_reviews::Migration),
        ]
    }
}
