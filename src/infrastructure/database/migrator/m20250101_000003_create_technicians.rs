//! Create technicians and technician_schedules tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Technicians::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Technicians::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Technicians::Name).string().not_null())
                    .col(
                        ColumnDef::new(Technicians::Phone)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Technicians::Email).string())
                    .col(
                        ColumnDef::new(Technicians::Specialties)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Technicians::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Technicians::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Technicians::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TechnicianSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TechnicianSchedules::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TechnicianSchedules::TechnicianId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TechnicianSchedules::Date).date().not_null())
                    .col(
                        ColumnDef::new(TechnicianSchedules::StartTime)
                            .string_len(5)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TechnicianSchedules::EndTime)
                            .string_len(5)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TechnicianSchedules::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_technician_schedules_technician")
                            .from(TechnicianSchedules::Table, TechnicianSchedules::TechnicianId)
                            .to(Technicians::Table, Technicians::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_technician_schedules_technician_date")
                    .table(TechnicianSchedules::Table)
                    .col(TechnicianSchedules::TechnicianId)
                    .col(TechnicianSchedules::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TechnicianSchedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Technicians::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Technicians {
    Table,
    Id,
    Name,
    Phone,
    Email,
    Specialties,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum TechnicianSchedules {
    Table,
    Id,
    TechnicianId,
    Date,
    StartTime,
    EndTime,
    IsAvailable,
}
