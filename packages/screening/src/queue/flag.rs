use chrono::Utc;
use common::policy;
use common::{ScreeningAction, ScreeningEventKind, ScreeningFlag};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};

use crate::audit;
use crate::entity::pending_submission::{Column, Entity};
use crate::error::Result;

/// Apply `flag` to the subset of `ids` currently claimed by `moderator`,
/// releasing each claim so the flagged item returns to the shared pool.
/// Returns the ids actually flagged.
pub async fn apply_flag(
    db: &DatabaseConnection,
    ids: &[i32],
    moderator: i32,
    flag: ScreeningFlag,
) -> Result<Vec<i32>> {
    let mut flagged = Vec::new();

    for &id in ids {
        let txn = db.begin().await?;

        let Some(sub) = Entity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            continue;
        };
        if !policy::is_permitted(sub.queue_state(moderator), flag.action()) {
            txn.rollback().await?;
            continue;
        }

        // Ownership is re-checked by the UPDATE itself; a claim lost since
        // the read above makes this a no-op.
        let result = Entity::update_many()
            .col_expr(Column::ClaimedBy, Expr::value(Option::<i32>::None))
            .col_expr(
                Column::ClaimTime,
                Expr::value(Option::<chrono::DateTime<Utc>>::None),
            )
            .col_expr(Column::Flag, Expr::value(Some(flag)))
            .col_expr(Column::FlaggedBy, Expr::value(Some(moderator)))
            .filter(Column::Id.eq(id))
            .filter(Column::ClaimedBy.eq(Some(moderator)))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            continue;
        }

        let previous = sub.flag.map(|f| f.as_str()).unwrap_or("none");
        audit::record(
            &txn,
            id,
            moderator,
            ScreeningEventKind::ApplyFlag,
            format!("flag: {previous} -> {}", flag.as_str()),
        )
        .await?;
        txn.commit().await?;
        flagged.push(id);
    }

    Ok(flagged)
}

/// Clear the flag on the subset of `ids` currently claimed by `moderator`.
/// A flagged item must be re-claimed like any unclaimed item before its
/// flag can be cleared. Clearing also releases the claim.
pub async fn clear_flag(db: &DatabaseConnection, ids: &[i32], moderator: i32) -> Result<Vec<i32>> {
    let mut cleared = Vec::new();

    for &id in ids {
        let txn = db.begin().await?;

        let Some(sub) = Entity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            continue;
        };
        if !policy::is_permitted(sub.queue_state(moderator), ScreeningAction::ClearFlag) {
            txn.rollback().await?;
            continue;
        }

        let result = Entity::update_many()
            .col_expr(Column::Flag, Expr::value(Option::<ScreeningFlag>::None))
            .col_expr(Column::FlaggedBy, Expr::value(Option::<i32>::None))
            .col_expr(Column::ClaimedBy, Expr::value(Option::<i32>::None))
            .col_expr(
                Column::ClaimTime,
                Expr::value(Option::<chrono::DateTime<Utc>>::None),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::ClaimedBy.eq(Some(moderator)))
            .filter(Column::Flag.is_not_null())
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            continue;
        }

        let previous = sub.flag.map(|f| f.as_str()).unwrap_or("none");
        audit::record(
            &txn,
            id,
            moderator,
            ScreeningEventKind::ClearFlag,
            format!("flag cleared: {previous}"),
        )
        .await?;
        txn.commit().await?;
        cleared.push(id);
    }

    Ok(cleared)
}
