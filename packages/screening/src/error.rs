use std::path::PathBuf;

use common::storage::StorageError;
use thiserror::Error;

/// Engine-level failures. Validation problems are not errors; they surface
/// as warnings on the action outcome and leave queue state unchanged.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    /// A file move could not be reverted after its paired store mutation
    /// failed. The file sits at `path` with no matching record; this is
    /// fatal and requires manual reconciliation.
    #[error("orphaned file at {path}: {source}")]
    OrphanedFile {
        path: PathBuf,
        source: StorageError,
    },
}

pub type Result<T> = std::result::Result<T, ScreenError>;
