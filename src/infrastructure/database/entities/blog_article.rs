//! Blog article entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    #[sea_orm(nullable)]
    pub excerpt: Option<String>,
    pub content: String,
    #[sea_orm(nullable)]
    pub author: Option<String>,
    #[sea_orm(nullable)]
    pub cover_image: Option<String>,
    /// JSON array of tags
    pub tags: String,
    pub is_published: bool,
    #[sea_orm(nullable)]
    pub published_at: Option<DateTimeUtc>,
    pub view_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
