//! Service review entity
//!
//! `images` holds JSON text.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub service_id: String,
    #[sea_orm(nullable)]
    pub user_id: Option<String>,
    #[sea_orm(nullable)]
    pub booking_id: Option<String>,
    pub customer_name: String,
    pub rating: i32,
    #[sea_orm(nullable)]
    pub title: Option<String>,
    #[sea_orm(nullable)]
    pub comment: Option<String>,
    pub images: String,
    /// PENDING, APPROVED, REJECTED
    pub status: String,
    pub is_verified: bool,
    pub upvotes: i32,
    pub downvotes: i32,
    #[sea_orm(nullable)]
    pub response: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::Id"
    )]
    Service,
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
