use common::ScreeningEventKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only audit row for a queue transition.
///
/// `submission_id` is a plain id, deliberately not a foreign key: the
/// subject is deleted on approval or rejection while its events remain.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "screening_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub submission_id: i32,
    pub moderator_id: i32,

    pub event: ScreeningEventKind,
    /// Free text capturing before/after state.
    pub detail: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
