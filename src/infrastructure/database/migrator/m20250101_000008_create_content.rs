//! Create storefront content tables
//!
//! faqs, policies, testimonials, pages, blog_articles, newsletter_subscribers

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn created_updated(table: &mut TableCreateStatement, created: impl IntoIden, updated: impl IntoIden) {
    table
        .col(
            ColumnDef::new(created)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(updated)
                .timestamp_with_time_zone()
                .not_null(),
        );
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut faqs = Table::create();
        faqs.table(Faqs::Table)
            .if_not_exists()
            .col(ColumnDef::new(Faqs::Id).string().not_null().primary_key())
            .col(ColumnDef::new(Faqs::Question).string().not_null())
            .col(ColumnDef::new(Faqs::Answer).text().not_null())
            .col(ColumnDef::new(Faqs::Category).string())
            .col(
                ColumnDef::new(Faqs::SortOrder)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Faqs::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        created_updated(&mut faqs, Faqs::CreatedAt, Faqs::UpdatedAt);
        manager.create_table(faqs).await?;

        let mut policies = Table::create();
        policies
            .table(Policies::Table)
            .if_not_exists()
            .col(ColumnDef::new(Policies::Id).string().not_null().primary_key())
            .col(
                ColumnDef::new(Policies::Slug)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Policies::Title).string().not_null())
            .col(ColumnDef::new(Policies::Summary).string())
            .col(ColumnDef::new(Policies::Content).text().not_null())
            .col(
                ColumnDef::new(Policies::IsPublished)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        created_updated(&mut policies, Policies::CreatedAt, Policies::UpdatedAt);
        manager.create_table(policies).await?;

        let mut testimonials = Table::create();
        testimonials
            .table(Testimonials::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Testimonials::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Testimonials::Name).string().not_null())
            .col(ColumnDef::new(Testimonials::Position).string())
            .col(ColumnDef::new(Testimonials::Content).text().not_null())
            .col(
                ColumnDef::new(Testimonials::Rating)
                    .integer()
                    .not_null()
                    .default(5),
            )
            .col(ColumnDef::new(Testimonials::AvatarUrl).string())
            .col(
                ColumnDef::new(Testimonials::IsPublished)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(
                ColumnDef::new(Testimonials::SortOrder)
                    .integer()
                    .not_null()
                    .default(0),
            );
        created_updated(
            &mut testimonials,
            Testimonials::CreatedAt,
            Testimonials::UpdatedAt,
        );
        manager.create_table(testimonials).await?;

        let mut pages = Table::create();
        pages
            .table(Pages::Table)
            .if_not_exists()
            .col(ColumnDef::new(Pages::Id).string().not_null().primary_key())
            .col(ColumnDef::new(Pages::Slug).string().not_null().unique_key())
            .col(ColumnDef::new(Pages::Title).string().not_null())
            .col(ColumnDef::new(Pages::Content).text().not_null())
            .col(ColumnDef::new(Pages::MetaTitle).string())
            .col(ColumnDef::new(Pages::MetaDescription).string())
            .col(
                ColumnDef::new(Pages::IsPublished)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        created_updated(&mut pages, Pages::CreatedAt, Pages::UpdatedAt);
        manager.create_table(pages).await?;

        let mut blog = Table::create();
        blog.table(BlogArticles::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(BlogArticles::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(BlogArticles::Slug)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(BlogArticles::Title).string().not_null())
            .col(ColumnDef::new(BlogArticles::Excerpt).string())
            .col(ColumnDef::new(BlogArticles::Content).text().not_null())
            .col(ColumnDef::new(BlogArticles::Author).string())
            .col(ColumnDef::new(BlogArticles::CoverImage).string())
            .col(
                ColumnDef::new(BlogArticles::Tags)
                    .text()
                    .not_null()
                    .default("[]"),
            )
            .col(
                ColumnDef::new(BlogArticles::IsPublished)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(BlogArticles::PublishedAt).timestamp_with_time_zone())
            .col(
                ColumnDef::new(BlogArticles::ViewCount)
                    .big_integer()
                    .not_null()
                    .default(0),
            );
        created_updated(&mut blog, BlogArticles::CreatedAt, BlogArticles::UpdatedAt);
        manager.create_table(blog).await?;

        manager
            .create_table(
                Table::create()
                    .table(NewsletterSubscribers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NewsletterSubscribers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NewsletterSubscribers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(NewsletterSubscribers::Name).string())
                    .col(
                        ColumnDef::new(NewsletterSubscribers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NewsletterSubscribers::SubscribedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NewsletterSubscribers::UnsubscribedAt)
                            .timestamp_with_time_zone(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NewsletterSubscribers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BlogArticles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Testimonials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Policies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Faqs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Faqs {
    Table,
    Id,
    Question,
    Answer,
    Category,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Policies {
    Table,
    Id,
    Slug,
    Title,
    Summary,
    Content,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Testimonials {
    Table,
    Id,
    Name,
    Position,
    Content,
    Rating,
    AvatarUrl,
    IsPublished,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Pages {
    Table,
    Id,
    Slug,
    Title,
    Content,
    MetaTitle,
    MetaDescription,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum BlogArticles {
    Table,
    Id,
    Slug,
    Title,
    Excerpt,
    Content,
    Author,
    CoverImage,
    Tags,
    IsPublished,
    PublishedAt,
    ViewCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum NewsletterSubscribers {
    Table,
    Id,
    Email,
    Name,
    IsActive,
    SubscribedAt,
    UnsubscribedAt,
}
