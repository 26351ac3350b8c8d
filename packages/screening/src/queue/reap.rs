use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::info;

use crate::entity::pending_submission::{Column, Entity};
use crate::error::Result;

/// Force-release every claim older than `ttl`.
///
/// Housekeeping, not a moderator action: no audit events are written. A
/// race with an in-flight moderator action is harmless — whichever commits
/// first wins, and the loser's conditional update affects zero rows.
pub async fn reap_stale(db: &DatabaseConnection, ttl: chrono::Duration) -> Result<u64> {
    let cutoff = Utc::now() - ttl;

    let result = Entity::update_many()
        .col_expr(Column::ClaimedBy, Expr::value(Option::<i32>::None))
        .col_expr(
            Column::ClaimTime,
            Expr::value(Option::<chrono::DateTime<Utc>>::None),
        )
        .filter(Column::ClaimTime.lt(cutoff))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        info!(released = result.rows_affected, "Force-released stale claims");
    }

    Ok(result.rows_affected)
}
