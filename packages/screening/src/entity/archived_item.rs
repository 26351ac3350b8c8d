use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A permanently published track. Filename and hash are unique across the
/// whole archive; the folder bucket is derived from the filename and is
/// part of the on-disk contract.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "archived_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub hash: String,
    #[sea_orm(unique)]
    pub filename: String,
    /// Storage folder bucket (first filename character upper-cased,
    /// numeric collapsed to "0_9").
    pub folder: String,

    /// Display title; falls back to the filename when the declared title
    /// is blank.
    pub title: String,
    /// The title exactly as declared at upload, kept for audit.
    pub declared_title: Option<String>,

    pub format: String,
    pub channels: i32,
    pub size_bytes: i64,

    pub uploader_id: Option<i32>,

    pub artist_id: Option<i32>,
    #[sea_orm(belongs_to, from = "artist_id", to = "id")]
    pub artist: BelongsTo<Option<super::artist::Entity>>,

    pub featured_by: Option<i32>,
    pub featured_at: Option<DateTimeUtc>,

    pub approved_by: i32,
    pub approved_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
