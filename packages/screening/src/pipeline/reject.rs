use chrono::Utc;
use common::RejectionReason;
use common::storage::ScreeningFiles;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{info, warn};

use crate::entity::{pending_submission, rejected_submission};
use crate::error::Result;
use crate::outcome::{ActionOutcome, QueueFilter, Redirect, Warning};
use crate::pipeline::revert_or_orphan;

/// Reject a batch of submissions.
///
/// Unlike approval there is no pre-screen escape hatch: every targeted id
/// must be claimed by the caller, validated up front for the whole batch.
/// Commits then run per item with the same move-then-insert protocol as
/// approval, relocating each file into the dated rejected-items area.
pub async fn reject(
    db: &DatabaseConnection,
    files: &ScreeningFiles,
    ids: &[i32],
    moderator: i32,
    reason: RejectionReason,
    message: Option<&str>,
    temporary: bool,
) -> Result<ActionOutcome> {
    if ids.is_empty() {
        return Ok(ActionOutcome::rejected(
            Redirect::Queue(QueueFilter::ClaimedBy(moderator)),
            vec![Warning::new(None, "No submissions selected")],
        ));
    }

    let subs = pending_submission::Entity::find()
        .filter(pending_submission::Column::Id.is_in(ids.to_vec()))
        .all(db)
        .await?;

    let mut warnings = Vec::new();
    for &id in ids {
        if !subs.iter().any(|s| s.id == id) {
            warnings.push(Warning::new(id, format!("Submission {id} no longer exists")));
        }
    }
    for sub in &subs {
        if sub.claimed_by != Some(moderator) {
            warnings.push(Warning::new(
                sub.id,
                format!("'{}' is not claimed by you", sub.filename),
            ));
        }
    }
    if !warnings.is_empty() {
        return Ok(ActionOutcome::rejected(
            Redirect::Queue(QueueFilter::ClaimedBy(moderator)),
            warnings,
        ));
    }

    let message = match message {
        Some(m) if !m.trim().is_empty() => m.trim().to_string(),
        _ => reason.default_message().to_string(),
    };

    let mut committed = 0;
    for sub in subs {
        if finalize_rejection(db, files, sub, moderator, reason, &message, temporary).await? {
            committed += 1;
        }
    }

    Ok(ActionOutcome::ok(
        Redirect::Queue(QueueFilter::ClaimedBy(moderator)),
        committed,
    ))
}

/// Commit one rejection: move the staged file into the rejected area, then
/// insert the terminal row and delete the pending row as one transaction.
/// Returns whether the item was committed.
pub async fn finalize_rejection(
    db: &DatabaseConnection,
    files: &ScreeningFiles,
    sub: pending_submission::Model,
    moderator: i32,
    reason: RejectionReason,
    message: &str,
    temporary: bool,
) -> Result<bool> {
    let date = Utc::now().date_naive();

    let mv = match files.begin_rejected_move(&sub.filename, date).await {
        Ok(mv) => mv,
        Err(e) => {
            warn!(
                submission_id = sub.id,
                filename = %sub.filename,
                error = %e,
                "Skipping rejection: staged file could not be moved"
            );
            return Ok(false);
        }
    };

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(e) => {
            revert_or_orphan(mv).await?;
            return Err(e.into());
        }
    };

    match commit_item(&txn, &sub, moderator, reason, message, temporary).await {
        Ok(()) => match txn.commit().await {
            Ok(()) => {
                mv.commit();
                info!(
                    submission_id = sub.id,
                    filename = %sub.filename,
                    %reason,
                    temporary,
                    "Rejected submission"
                );
                Ok(true)
            }
            Err(e) => {
                warn!(
                    submission_id = sub.id,
                    error = %e,
                    "Rejection commit failed; reversing file move"
                );
                revert_or_orphan(mv).await?;
                Ok(false)
            }
        },
        Err(e) => {
            let _ = txn.rollback().await;
            warn!(
                submission_id = sub.id,
                error = %e,
                "Rejection row transition failed; reversing file move"
            );
            revert_or_orphan(mv).await?;
            Ok(false)
        }
    }
}

/// The store half of the per-item commit.
async fn commit_item(
    txn: &DatabaseTransaction,
    sub: &pending_submission::Model,
    moderator: i32,
    reason: RejectionReason,
    message: &str,
    temporary: bool,
) -> std::result::Result<(), DbErr> {
    rejected_submission::ActiveModel {
        hash: Set(sub.hash.clone()),
        filename: Set(sub.filename.clone()),
        reason: Set(reason),
        message: Set(message.to_string()),
        is_temporary: Set(temporary),
        rejected_by: Set(moderator),
        uploader_id: Set(sub.uploader_id),
        rejected_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    // Rejection always requires a live claim, re-checked at commit time.
    let deleted = pending_submission::Entity::delete_many()
        .filter(pending_submission::Column::Id.eq(sub.id))
        .filter(pending_submission::Column::ClaimedBy.eq(Some(moderator)))
        .exec(txn)
        .await?;
    if deleted.rows_affected == 0 {
        return Err(DbErr::Custom(format!(
            "submission {} is no longer claimed by moderator {moderator}",
            sub.id
        )));
    }

    Ok(())
}

/// Whether `hash` is permanently blocked from re-upload. The ingestion
/// step consumes this; a temporary rejection does not block.
pub async fn permanently_blocked<C: ConnectionTrait>(
    conn: &C,
    hash: &str,
) -> std::result::Result<bool, DbErr> {
    let count = rejected_submission::Entity::find()
        .filter(rejected_submission::Column::Hash.eq(hash))
        .filter(rejected_submission::Column::IsTemporary.eq(false))
        .count(conn)
        .await?;
    Ok(count > 0)
}
