use common::storage::StagedMove;

use crate::error::ScreenError;

pub mod approve;
pub mod reject;

/// Compensate a file move after its paired store mutation failed.
///
/// If the reversal itself fails the file is orphaned at its destination
/// with no matching record; that is fatal and surfaced, never retried.
pub(crate) async fn revert_or_orphan(mv: StagedMove) -> Result<(), ScreenError> {
    let path = mv.destination().to_path_buf();
    mv.revert()
        .await
        .map_err(|source| ScreenError::OrphanedFile { path, source })
}
