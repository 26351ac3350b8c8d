use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A creator record. Created on demand when an own-work submission from a
/// known uploader is approved.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    /// The uploader account this artist belongs to, when known.
    pub user_id: Option<i32>,

    #[sea_orm(has_many)]
    pub items: HasMany<super::archived_item::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
