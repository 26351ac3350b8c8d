use std::collections::HashSet;

use chrono::Utc;
use common::policy::QueueState;
use common::storage::{ScreeningFiles, bucket_for};
use common::{ScreeningFlag, Uploader};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{info, warn};

use crate::entity::{archived_item, artist, pending_submission};
use crate::error::Result;
use crate::outcome::{ActionOutcome, QueueFilter, Redirect, Warning};
use crate::pipeline::revert_or_orphan;

/// Approve a batch of submissions, optionally featuring them.
///
/// Validation is all-or-nothing: a single violated rule rejects the whole
/// batch with warnings and no state change. Commits then run one
/// transaction scope per item, so a per-item failure never takes its
/// siblings down with it.
pub async fn approve(
    db: &DatabaseConnection,
    files: &ScreeningFiles,
    ids: &[i32],
    approver: i32,
    feature: bool,
) -> Result<ActionOutcome> {
    if ids.is_empty() {
        return Ok(ActionOutcome::rejected(
            Redirect::Queue(QueueFilter::All),
            vec![Warning::new(None, "No submissions selected")],
        ));
    }
    let bulk = ids.len() > 1;

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

    if warnings.is_empty() {
        if bulk {
            warnings = validate_bulk(db, &subs, approver).await?;
        } else if let Some(sub) = subs.first() {
            warnings = validate_single(db, sub, approver).await?;
        }
    }

    if !warnings.is_empty() {
        let redirect = if bulk {
            Redirect::Queue(QueueFilter::PreScreened)
        } else {
            match subs.first() {
                Some(sub) => Redirect::Item(sub.id),
                None => Redirect::Queue(QueueFilter::All),
            }
        };
        return Ok(ActionOutcome::rejected(redirect, warnings));
    }

    let mut committed = 0;
    let mut first_archived = None;
    for sub in subs {
        if let Some(archived_id) = finalize_approval(db, files, sub, approver, feature).await? {
            committed += 1;
            first_archived.get_or_insert(archived_id);
        }
    }

    let redirect = if bulk {
        Redirect::Queue(QueueFilter::PreScreened)
    } else {
        match first_archived {
            Some(archived_id) => Redirect::Archived(archived_id),
            // The lone item's file move failed; it is still pending.
            None => Redirect::Item(ids[0]),
        }
    };
    Ok(ActionOutcome::ok(redirect, committed))
}

/// Single-item rules: the caller must hold the claim or the item must be
/// pre-screened; escalation flags that question the item block approval;
/// filename and hash must be new to the archive.
async fn validate_single(
    db: &DatabaseConnection,
    sub: &pending_submission::Model,
    approver: i32,
) -> Result<Vec<Warning>> {
    let mut warnings = Vec::new();

    let claimed_by_caller = matches!(
        sub.queue_state(approver),
        QueueState::ClaimedByCaller { .. }
    );
    let pre_screened = sub.flag.is_some_and(|f| f.is_pre_screen());
    if !claimed_by_caller && !pre_screened {
        warnings.push(Warning::new(
            sub.id,
            format!("'{}' is not claimed by you and is not pre-screened", sub.filename),
        ));
    }

    if let Some(flag) = sub.flag
        && matches!(
            flag,
            ScreeningFlag::UnderInvestigation | ScreeningFlag::PossibleDuplicate
        )
    {
        warnings.push(Warning::new(
            sub.id,
            format!("'{}' is flagged as {}", sub.filename, flag.label()),
        ));
    }

    warnings.extend(archive_collisions(db, std::slice::from_ref(sub)).await?);
    Ok(warnings)
}

/// Bulk rules: every item pre-screened, nothing claimed by someone else,
/// and no filename or hash shared within the batch or with the archive.
async fn validate_bulk(
    db: &DatabaseConnection,
    subs: &[pending_submission::Model],
    approver: i32,
) -> Result<Vec<Warning>> {
    let mut warnings = Vec::new();

    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut seen_hashes: HashSet<&str> = HashSet::new();
    for sub in subs {
        if !sub.flag.is_some_and(|f| f.is_pre_screen()) {
            warnings.push(Warning::new(
                sub.id,
                format!("'{}' is not pre-screened", sub.filename),
            ));
        }
        if matches!(sub.queue_state(approver), QueueState::ClaimedByOther) {
            warnings.push(Warning::new(
                sub.id,
                format!("'{}' is claimed by another screener", sub.filename),
            ));
        }
        if !seen_names.insert(sub.filename.as_str()) {
            warnings.push(Warning::new(
                sub.id,
                format!("Duplicate filename '{}' in the selection", sub.filename),
            ));
        }
        if !seen_hashes.insert(sub.hash.as_str()) {
            warnings.push(Warning::new(
                sub.id,
                format!("'{}' duplicates another selected file's content", sub.filename),
            ));
        }
    }

    warnings.extend(archive_collisions(db, subs).await?);
    Ok(warnings)
}

/// Filename/hash collisions between the candidates and the archive.
async fn archive_collisions(
    db: &DatabaseConnection,
    subs: &[pending_submission::Model],
) -> Result<Vec<Warning>> {
    let mut warnings = Vec::new();

    for sub in subs {
        let filename_taken = archived_item::Entity::find()
            .filter(archived_item::Column::Filename.eq(&sub.filename))
            .count(db)
            .await?
            > 0;
        if filename_taken {
            warnings.push(Warning::new(
                sub.id,
                format!("An archived item already uses the filename '{}'", sub.filename),
            ));
        }

        let hash_taken = archived_item::Entity::find()
            .filter(archived_item::Column::Hash.eq(&sub.hash))
            .count(db)
            .await?
            > 0;
        if hash_taken {
            warnings.push(Warning::new(
                sub.id,
                format!("An archived item already has the content of '{}'", sub.filename),
            ));
        }
    }

    Ok(warnings)
}

/// Commit one approved submission: move the staged file into the archive
/// layout, then insert the archived row, link its artist, and delete the
/// pending row as one transaction. A failed move skips the item; a failed
/// transaction reverses the move.
///
/// Returns the new archived item's id, or `None` if the item was skipped.
pub async fn finalize_approval(
    db: &DatabaseConnection,
    files: &ScreeningFiles,
    sub: pending_submission::Model,
    approver: i32,
    feature: bool,
) -> Result<Option<i32>> {
    let folder = bucket_for(&sub.filename);

    let mv = match files.begin_archive_move(&sub.filename).await {
        Ok(mv) => mv,
        Err(e) => {
            warn!(
                submission_id = sub.id,
                filename = %sub.filename,
                error = %e,
                "Skipping approval: staged file could not be moved"
            );
            return Ok(None);
        }
    };

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(e) => {
            revert_or_orphan(mv).await?;
            return Err(e.into());
        }
    };

    match commit_item(&txn, &sub, approver, feature, folder).await {
        Ok(archived_id) => match txn.commit().await {
            Ok(()) => {
                mv.commit();
                info!(
                    submission_id = sub.id,
                    archived_id,
                    filename = %sub.filename,
                    "Approved into archive"
                );
                Ok(Some(archived_id))
            }
            Err(e) => {
                warn!(
                    submission_id = sub.id,
                    error = %e,
                    "Archive commit failed; reversing file move"
                );
                revert_or_orphan(mv).await?;
                Ok(None)
            }
        },
        Err(e) => {
            let _ = txn.rollback().await;
            warn!(
                submission_id = sub.id,
                error = %e,
                "Archive row transition failed; reversing file move"
            );
            revert_or_orphan(mv).await?;
            Ok(None)
        }
    }
}

/// The store half of the per-item commit: insert the archived row, link or
/// create the artist, delete the pending row. All three succeed or the
/// caller rolls the transaction back.
async fn commit_item(
    txn: &DatabaseTransaction,
    sub: &pending_submission::Model,
    approver: i32,
    feature: bool,
    folder: String,
) -> std::result::Result<i32, DbErr> {
    let title = match &sub.declared_title {
        Some(declared) if !declared.trim().is_empty() => declared.clone(),
        _ => sub.filename.clone(),
    };

    let artist_id = if sub.is_own_work {
        artist_for_uploader(txn, sub).await?
    } else {
        None
    };

    let now = Utc::now();
    let item = archived_item::ActiveModel {
        hash: Set(sub.hash.clone()),
        filename: Set(sub.filename.clone()),
        folder: Set(folder),
        title: Set(title),
        declared_title: Set(sub.declared_title.clone()),
        format: Set(sub.format.clone()),
        channels: Set(sub.channels),
        size_bytes: Set(sub.size_bytes),
        uploader_id: Set(sub.uploader_id),
        artist_id: Set(artist_id),
        featured_by: Set(feature.then_some(approver)),
        featured_at: Set(feature.then_some(now)),
        approved_by: Set(approver),
        approved_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    // Ownership is re-checked at commit time: a claim lost to the reaper
    // and re-taken by someone else since validation makes this delete a
    // no-op and rolls the whole item back.
    let deleted = pending_submission::Entity::delete_many()
        .filter(pending_submission::Column::Id.eq(sub.id))
        .filter(
            Condition::any()
                .add(pending_submission::Column::ClaimedBy.eq(Some(approver)))
                .add(pending_submission::Column::ClaimedBy.is_null()),
        )
        .exec(txn)
        .await?;
    if deleted.rows_affected == 0 {
        return Err(DbErr::Custom(format!(
            "submission {} is no longer approvable by moderator {approver}",
            sub.id
        )));
    }

    Ok(item.id)
}

/// The artist to link an own-work submission to: an existing record for
/// the uploader, or a new one named after their handle. Anonymous uploads
/// have no account to attach, so nothing is linked.
async fn artist_for_uploader(
    txn: &DatabaseTransaction,
    sub: &pending_submission::Model,
) -> std::result::Result<Option<i32>, DbErr> {
    let Uploader::User(user_id) = sub.uploader() else {
        return Ok(None);
    };

    if let Some(existing) = artist::Entity::find()
        .filter(artist::Column::UserId.eq(Some(user_id)))
        .one(txn)
        .await?
    {
        return Ok(Some(existing.id));
    }

    let handle = sub
        .uploader_handle
        .clone()
        .unwrap_or_else(|| format!("uploader-{user_id}"));
    let name_taken = artist::Entity::find()
        .filter(artist::Column::Name.eq(&handle))
        .count(txn)
        .await?
        > 0;
    let name = if name_taken {
        format!("{handle} ({user_id})")
    } else {
        handle
    };

    let created = artist::ActiveModel {
        name: Set(name),
        user_id: Set(Some(user_id)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    Ok(Some(created.id))
}
