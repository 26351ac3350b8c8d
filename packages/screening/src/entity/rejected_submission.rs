use common::RejectionReason;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Terminal, non-published record of a rejected submission.
///
/// A permanent rejection (`is_temporary = false`) blocks re-upload of the
/// same content hash; the ingestion step consumes that contract.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rejected_submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub hash: String,
    pub filename: String,

    pub reason: RejectionReason,
    pub message: String,
    pub is_temporary: bool,

    pub rejected_by: i32,
    pub uploader_id: Option<i32>,

    pub rejected_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
