//! Create files table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Files::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Files::Filename).string().not_null())
                    .col(ColumnDef::new(Files::OriginalName).string().not_null())
                    .col(ColumnDef::new(Files::MimeType).string().not_null())
                    .col(ColumnDef::new(Files::Size).big_integer().not_null())
                    .col(ColumnDef::new(Files::Path).string().not_null())
                    .col(ColumnDef::new(Files::Url).string().not_null())
                    .col(ColumnDef::new(Files::Kind).string_len(20).not_null())
                    .col(ColumnDef::new(Files::Metadata).text())
                    .col(ColumnDef::new(Files::UploadedBy).string())
                    .col(
                        ColumnDef::new(Files::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Files {
    Table,
    Id,
    Filename,
    OriginalName,
    MimeType,
    Size,
    Path,
    Url,
    Kind,
    Metadata,
    UploadedBy,
    CreatedAt,
}
