//! Create languages and translations tables
//!
//! Seeds Vietnamese (default) and English so lookups work on a fresh
//! database before any seed run.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Languages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Languages::Code)
                            .string_len(10)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Languages::Name).string().not_null())
                    .col(ColumnDef::new(Languages::NativeName).string().not_null())
                    .col(ColumnDef::new(Languages::Flag).string())
                    .col(
                        ColumnDef::new(Languages::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Languages::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Languages::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Translations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Translations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Translations::Locale).string_len(10).not_null())
                    .col(ColumnDef::new(Translations::Context).string().not_null())
                    .col(ColumnDef::new(Translations::Key).string().not_null())
                    .col(ColumnDef::new(Translations::Value).text().not_null())
                    .col(
                        ColumnDef::new(Translations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Translations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_translations_locale_context_key")
                    .table(Translations::Table)
                    .col(Translations::Locale)
                    .col(Translations::Context)
                    .col(Translations::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert.into_table(Languages::Table).columns([
            Languages::Code,
            Languages::Name,
            Languages::NativeName,
            Languages::Flag,
            Languages::IsDefault,
            Languages::IsActive,
            Languages::SortOrder,
        ]);
        for (code, name, native, flag, is_default, order) in [
            ("vi", "Vietnamese", "Tiếng Việt", "🇻🇳", true, 0),
            ("en", "English", "English", "🇺🇸", false, 1),
        ] {
            insert
                .values([
                    code.into(),
                    name.into(),
                    native.into(),
                    flag.into(),
                    is_default.into(),
                    true.into(),
                    order.into(),
                ])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Translations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Languages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Languages {
    Table,
    Code,
    Name,
    NativeName,
    Flag,
    IsDefault,
    IsActive,
    SortOrder,
}

#[derive(Iden)]
pub enum Translations {
    Table,
    Id,
    Locale,
    Context,
    Key,
    Value,
    CreatedAt,
    UpdatedAt,
}
