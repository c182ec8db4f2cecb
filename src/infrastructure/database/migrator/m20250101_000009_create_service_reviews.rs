//! Create service_reviews table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;
use super::m20250101_000002_create_catalog::Services;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceReviews::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceReviews::ServiceId).string().not_null())
                    .col(ColumnDef::new(ServiceReviews::UserId).string())
                    .col(ColumnDef::new(ServiceReviews::BookingId).string())
                    .col(ColumnDef::new(ServiceReviews::CustomerName).string().not_null())
                    .col(ColumnDef::new(ServiceReviews::Rating).integer().not_null())
                    .col(ColumnDef::new(ServiceReviews::Title).string())
                    .col(ColumnDef::new(ServiceReviews::Comment).text())
                    .col(
                        ColumnDef::new(ServiceReviews::Images)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ServiceReviews::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(ServiceReviews::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ServiceReviews::Upvotes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ServiceReviews::Downvotes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ServiceReviews::Response).text())
                    .col(
                        ColumnDef::new(ServiceReviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceReviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_reviews_service")
                            .from(ServiceReviews::Table, ServiceReviews::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_reviews_user")
                            .from(ServiceReviews::Table, ServiceReviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_reviews_service_status")
                    .table(ServiceReviews::Table)
                    .col(ServiceReviews::ServiceId)
                    .col(ServiceReviews::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceReviews::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ServiceReviews {
    Table,
    Id,
    ServiceId,
    UserId,
    BookingId,
    CustomerName,
    Rating,
    Title,
    Comment,
    Images,
    Status,
    IsVerified,
    Upvotes,
    Downvotes,
    Response,
    CreatedAt,
    UpdatedAt,
}
