use common::policy;
use common::storage::{ScreeningFiles, StorageError};
use common::{ScreeningAction, ScreeningEventKind};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use tracing::warn;

use crate::audit;
use crate::entity::{archived_item, pending_submission, rejected_submission};
use crate::error::Result;
use crate::outcome::{ActionOutcome, QueueFilter, Redirect, Warning};
use crate::pipeline::revert_or_orphan;
use crate::utils::filename::validate_rename;

/// Rename a single claimed submission.
///
/// The staged file is renamed first and the row second; the file rename is
/// reversed if the row update cannot be committed.
pub async fn rename(
    db: &DatabaseConnection,
    files: &ScreeningFiles,
    id: i32,
    moderator: i32,
    proposed: &str,
) -> Result<ActionOutcome> {
    use pending_submission::{Column, Entity};

    let Some(sub) = Entity::find_by_id(id).one(db).await? else {
        return Ok(ActionOutcome::rejected(
            Redirect::Queue(QueueFilter::All),
            vec![Warning::new(id, "Submission no longer exists")],
        ));
    };

    let mut warnings = Vec::new();

    if !policy::is_permitted(sub.queue_state(moderator), ScreeningAction::Rename) {
        warnings.push(Warning::new(id, "You do not hold the claim on this submission"));
    }

    let new_filename = match validate_rename(&sub.filename, proposed) {
        Ok(name) => name.to_string(),
        Err(e) => {
            warnings.push(Warning::new(id, e.message()));
            String::new()
        }
    };

    if warnings.is_empty() && filename_in_use(db, &new_filename).await? {
        warnings.push(Warning::new(
            id,
            format!("The filename '{new_filename}' is already in use"),
        ));
    }

    if !warnings.is_empty() {
        return Ok(ActionOutcome::rejected(Redirect::Item(id), warnings));
    }

    let mv = match files.begin_rename(&sub.filename, &new_filename).await {
        Ok(mv) => mv,
        Err(e @ (StorageError::NotFound(_) | StorageError::AlreadyExists(_))) => {
            warn!(submission_id = id, error = %e, "Rename skipped: staged file unavailable");
            return Ok(ActionOutcome::rejected(
                Redirect::Item(id),
                vec![Warning::new(id, "The staged file could not be renamed")],
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(e) => {
            revert_or_orphan(mv).await?;
            return Err(e.into());
        }
    };

    let updated = Entity::update_many()
        .col_expr(Column::Filename, Expr::value(new_filename.clone()))
        .filter(Column::Id.eq(id))
        .filter(Column::ClaimedBy.eq(Some(moderator)))
        .exec(&txn)
        .await;

    let updated = match updated {
        Ok(result) => result,
        Err(e) => {
            let _ = txn.rollback().await;
            revert_or_orphan(mv).await?;
            return Err(e.into());
        }
    };

    if updated.rows_affected == 0 {
        let _ = txn.rollback().await;
        revert_or_orphan(mv).await?;
        return Ok(ActionOutcome::rejected(
            Redirect::Item(id),
            vec![Warning::new(id, "You no longer hold the claim on this submission")],
        ));
    }

    let recorded = audit::record(
        &txn,
        id,
        moderator,
        ScreeningEventKind::Rename,
        format!("renamed {} -> {new_filename}", sub.filename),
    )
    .await;
    if let Err(e) = recorded {
        let _ = txn.rollback().await;
        revert_or_orphan(mv).await?;
        return Err(e.into());
    }

    if let Err(e) = txn.commit().await {
        revert_or_orphan(mv).await?;
        return Err(e.into());
    }

    mv.commit();
    Ok(ActionOutcome::ok(Redirect::Item(id), 1))
}

/// Whether `name` is taken by any pending, archived, or rejected record.
async fn filename_in_use(db: &DatabaseConnection, name: &str) -> Result<bool> {
    let pending = pending_submission::Entity::find()
        .filter(pending_submission::Column::Filename.eq(name))
        .count(db)
        .await?;
    if pending > 0 {
        return Ok(true);
    }

    let archived = archived_item::Entity::find()
        .filter(archived_item::Column::Filename.eq(name))
        .count(db)
        .await?;
    if archived > 0 {
        return Ok(true);
    }

    let rejected = rejected_submission::Entity::find()
        .filter(rejected_submission::Column::Filename.eq(name))
        .count(db)
        .await?;
    Ok(rejected > 0)
}
