use common::policy::QueueState;
use common::{ScreeningFlag, Uploader};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A submitted file awaiting screening. Created by the (external)
/// ingestion step; mutated only through the queue operations; deleted on
/// approval or rejection.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// SHA-256 of the file, lowercase hex.
    pub hash: String,
    #[sea_orm(unique)]
    pub filename: String,
    /// Declared tracker format token (e.g. "MOD", "XM", "S3M", "IT").
    pub format: String,
    pub channels: i32,
    pub size_bytes: i64,
    pub declared_title: Option<String>,

    /// NULL means an anonymous upload; see `common::Uploader`.
    pub uploader_id: Option<i32>,
    pub uploader_handle: Option<String>,
    /// Uploader claims this is their own composition.
    pub is_own_work: bool,

    pub claimed_by: Option<i32>,
    pub claim_time: Option<DateTimeUtc>,

    pub flag: Option<ScreeningFlag>,
    pub flagged_by: Option<i32>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn uploader(&self) -> Uploader {
        Uploader::from(self.uploader_id)
    }

    /// Queue state as seen by `moderator`, for the policy table.
    pub fn queue_state(&self, moderator: i32) -> QueueState {
        match self.claimed_by {
            Some(owner) if owner == moderator => QueueState::ClaimedByCaller { flag: self.flag },
            Some(_) => QueueState::ClaimedByOther,
            None => QueueState::Unclaimed,
        }
    }
}
