//! Supported language entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "languages")]
pub struct Model {
    /// Locale code, e.g. "vi"
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    pub native_name: String,
    #[sea_orm(nullable)]
    pub flag: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
