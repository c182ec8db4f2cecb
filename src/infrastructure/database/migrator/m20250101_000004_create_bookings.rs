//! Create bookings table

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_catalog::Services;
use super::m20250101_000003_create_technicians::Technicians;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::ServiceId).string().not_null())
                    .col(ColumnDef::new(Bookings::TechnicianId).string())
                    .col(ColumnDef::new(Bookings::UserId).string())
                    .col(ColumnDef::new(Bookings::CustomerName).string().not_null())
                    .col(ColumnDef::new(Bookings::CustomerPhone).string().not_null())
                    .col(ColumnDef::new(Bookings::CustomerEmail).string())
                    .col(ColumnDef::new(Bookings::Address).string())
                    .col(
                        ColumnDef::new(Bookings::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::ScheduledTime).string_len(5))
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Bookings::Notes).text())
                    .col(ColumnDef::new(Bookings::EstimatedCostCents).big_integer())
                    .col(ColumnDef::new(Bookings::ActualCostCents).big_integer())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_service")
                            .from(Bookings::Table, Bookings::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_technician")
                            .from(Bookings::Table, Bookings::TechnicianId)
                            .to(Technicians::Table, Technicians::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_technician")
                    .table(Bookings::Table)
                    .col(Bookings::TechnicianId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    ServiceId,
    TechnicianId,
    UserId,
    CustomerName,
    CustomerPhone,
    CustomerEmail,
    Address,
    ScheduledAt,
    ScheduledTime,
    Status,
    Notes,
    EstimatedCostCents,
    ActualCostCents,
    CreatedAt,
    UpdatedAt,
}
