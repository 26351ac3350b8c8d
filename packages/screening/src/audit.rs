use chrono::Utc;
use common::ScreeningEventKind;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set};

use crate::entity::screening_event;

/// Append one audit event. Called inside the transaction that performs the
/// transition, so the event and the state change land together.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    submission_id: i32,
    moderator_id: i32,
    event: ScreeningEventKind,
    detail: String,
) -> Result<(), DbErr> {
    screening_event::ActiveModel {
        submission_id: Set(submission_id),
        moderator_id: Set(moderator_id),
        event: Set(event),
        detail: Set(detail),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// All events ever recorded for a submission, oldest first. The subject
/// may no longer exist; events outlive it.
pub async fn events_for<C: ConnectionTrait>(
    conn: &C,
    submission_id: i32,
) -> Result<Vec<screening_event::Model>, DbErr> {
    screening_event::Entity::find()
        .filter(screening_event::Column::SubmissionId.eq(submission_id))
        .order_by_asc(screening_event::Column::Id)
        .all(conn)
        .await
}
