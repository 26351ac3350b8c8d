use std::sync::Arc;

use common::storage::ScreeningFiles;
use common::{RejectionReason, ScreeningFlag};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::pending_submission;
use crate::error::Result;
use crate::outcome::{ActionOutcome, QueueFilter, Redirect};
use crate::pipeline;

pub mod claim;
pub mod flag;
pub mod reap;
pub mod rename;

/// The inbound action surface of the screening engine.
///
/// The web layer authenticates the moderator and hands this service a batch
/// of submission ids plus an action; each method returns an
/// [`ActionOutcome`] the web layer turns into a redirect and warning list.
pub struct ScreeningQueue {
    db: DatabaseConnection,
    files: Arc<ScreeningFiles>,
    claim_ttl: chrono::Duration,
}

impl ScreeningQueue {
    pub fn new(db: DatabaseConnection, files: Arc<ScreeningFiles>, claim_ttl_hours: i64) -> Self {
        Self {
            db,
            files,
            claim_ttl: chrono::Duration::hours(claim_ttl_hours),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// One page of the queue under `filter`. Stale claims are reaped
    /// before every read a moderator acts on.
    pub async fn queue_page(
        &self,
        filter: QueueFilter,
    ) -> Result<Vec<pending_submission::Model>> {
        reap::reap_stale(&self.db, self.claim_ttl).await?;

        use pending_submission::{Column, Entity};
        let mut select = Entity::find();
        select = match filter {
            QueueFilter::All => select,
            QueueFilter::Unclaimed => select.filter(Column::ClaimedBy.is_null()),
            QueueFilter::ClaimedBy(moderator) => {
                select.filter(Column::ClaimedBy.eq(Some(moderator)))
            }
            QueueFilter::Flagged(flag) => select.filter(Column::Flag.eq(Some(flag))),
            QueueFilter::PreScreened => {
                select.filter(Column::Flag.is_in(ScreeningFlag::PRE_SCREEN.iter().copied()))
            }
        };

        Ok(select.order_by_asc(Column::Id).all(&self.db).await?)
    }

    pub async fn claim(&self, ids: &[i32], moderator: i32) -> Result<ActionOutcome> {
        let claimed = claim::claim(&self.db, ids, moderator).await?;
        Ok(ActionOutcome::ok(
            Redirect::Queue(QueueFilter::ClaimedBy(moderator)),
            claimed.len(),
        ))
    }

    pub async fn unclaim(&self, ids: &[i32], moderator: i32) -> Result<ActionOutcome> {
        let released = claim::unclaim(&self.db, ids, moderator).await?;
        Ok(ActionOutcome::ok(
            Redirect::Queue(QueueFilter::All),
            released.len(),
        ))
    }

    pub async fn apply_flag(
        &self,
        ids: &[i32],
        moderator: i32,
        flag: ScreeningFlag,
    ) -> Result<ActionOutcome> {
        let flagged = flag::apply_flag(&self.db, ids, moderator, flag).await?;
        Ok(ActionOutcome::ok(
            Redirect::Queue(QueueFilter::Flagged(flag)),
            flagged.len(),
        ))
    }

    pub async fn clear_flag(&self, ids: &[i32], moderator: i32) -> Result<ActionOutcome> {
        let cleared = flag::clear_flag(&self.db, ids, moderator).await?;
        Ok(ActionOutcome::ok(
            Redirect::Queue(QueueFilter::All),
            cleared.len(),
        ))
    }

    pub async fn rename(
        &self,
        id: i32,
        moderator: i32,
        new_filename: &str,
    ) -> Result<ActionOutcome> {
        rename::rename(&self.db, &self.files, id, moderator, new_filename).await
    }

    pub async fn approve(
        &self,
        ids: &[i32],
        approver: i32,
        feature: bool,
    ) -> Result<ActionOutcome> {
        pipeline::approve::approve(&self.db, &self.files, ids, approver, feature).await
    }

    pub async fn reject(
        &self,
        ids: &[i32],
        moderator: i32,
        reason: RejectionReason,
        message: Option<&str>,
        temporary: bool,
    ) -> Result<ActionOutcome> {
        pipeline::reject::reject(&self.db, &self.files, ids, moderator, reason, message, temporary)
            .await
    }

    /// Force-release claims older than the configured TTL.
    pub async fn reap_stale(&self) -> Result<u64> {
        reap::reap_stale(&self.db, self.claim_ttl).await
    }
}
