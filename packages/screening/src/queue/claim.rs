use chrono::Utc;
use common::{ScreeningEventKind, ScreeningFlag};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};

use crate::audit;
use crate::entity::pending_submission::{Column, Entity};
use crate::error::Result;

/// Claim each of `ids` for `moderator`, returning the ids actually
/// claimed.
///
/// Items already claimed by anyone are silently skipped, as are items the
/// same moderator flagged with an escalation flag (they may not pick their
/// own flag back up without another screener's involvement). The whole
/// condition is part of the UPDATE, so of N concurrent claim attempts on
/// an unclaimed id exactly one succeeds.
pub async fn claim(db: &DatabaseConnection, ids: &[i32], moderator: i32) -> Result<Vec<i32>> {
    let mut claimed = Vec::new();

    for &id in ids {
        let txn = db.begin().await?;

        let self_escalated = Condition::all()
            .add(Column::FlaggedBy.eq(Some(moderator)))
            .add(Column::Flag.is_in(ScreeningFlag::ESCALATION.iter().copied()));

        let result = Entity::update_many()
            .col_expr(Column::ClaimedBy, Expr::value(Some(moderator)))
            .col_expr(Column::ClaimTime, Expr::value(Some(Utc::now())))
            .filter(Column::Id.eq(id))
            .filter(Column::ClaimedBy.is_null())
            .filter(self_escalated.not())
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            continue;
        }

        audit::record(
            &txn,
            id,
            moderator,
            ScreeningEventKind::Claim,
            "claim acquired".into(),
        )
        .await?;
        txn.commit().await?;
        claimed.push(id);
    }

    Ok(claimed)
}

/// Release the subset of `ids` currently claimed by `moderator`; other ids
/// are silently ignored.
pub async fn unclaim(db: &DatabaseConnection, ids: &[i32], moderator: i32) -> Result<Vec<i32>> {
    let mut released = Vec::new();

    for &id in ids {
        let txn = db.begin().await?;

        let result = Entity::update_many()
            .col_expr(Column::ClaimedBy, Expr::value(Option::<i32>::None))
            .col_expr(
                Column::ClaimTime,
                Expr::value(Option::<chrono::DateTime<Utc>>::None),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::ClaimedBy.eq(Some(moderator)))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            continue;
        }

        audit::record(
            &txn,
            id,
            moderator,
            ScreeningEventKind::Unclaim,
            "claim released".into(),
        )
        .await?;
        txn.commit().await?;
        released.push(id);
    }

    Ok(released)
}
