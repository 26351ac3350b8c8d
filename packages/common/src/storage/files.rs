use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::fs;
use tracing::warn;

use super::error::StorageError;
use super::layout::ArchiveLayout;
use crate::hash::ContentHash;

/// Filesystem store for the three screening areas (staging, archive,
/// rejected items).
///
/// Every move is a plain rename: the roots are expected to live on the same
/// filesystem. A move that must be undone when the paired database write
/// fails is returned as a [`StagedMove`], the compensating half of the
/// cross-resource commit.
pub struct ScreeningFiles {
    layout: ArchiveLayout,
}

impl ScreeningFiles {
    /// Create the store, making sure all three roots exist.
    pub async fn new(layout: ArchiveLayout) -> Result<Self, StorageError> {
        fs::create_dir_all(layout.staging_root()).await?;
        fs::create_dir_all(layout.staging_root().join(".tmp")).await?;
        fs::create_dir_all(layout.archive_root()).await?;
        fs::create_dir_all(layout.rejected_root()).await?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    /// Write a staged file for `filename`, returning its content hash.
    /// Data lands in a temp file first and is renamed into place, so
    /// readers never observe partial writes. The ingestion step is the
    /// normal writer; tests use this directly.
    pub async fn stage(&self, filename: &str, data: &[u8]) -> Result<ContentHash, StorageError> {
        let temp_path = self
            .layout
            .staging_root()
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string());

        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        let staged = self.layout.staged_path(filename);
        if let Err(e) = fs::rename(&temp_path, &staged).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(ContentHash::compute(data))
    }

    /// Whether a staged file exists for `filename`.
    pub async fn staged_exists(&self, filename: &str) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.layout.staged_path(filename)).await?)
    }

    /// Move a staged file into the archive layout. Returns the performed
    /// move so the caller can revert it if the database half fails.
    pub async fn begin_archive_move(&self, filename: &str) -> Result<StagedMove, StorageError> {
        let from = self.layout.staged_path(filename);
        let to = self.layout.archive_path(filename);
        self.perform_move(from, to).await
    }

    /// Move a staged file into the dated rejected-items area.
    pub async fn begin_rejected_move(
        &self,
        filename: &str,
        date: NaiveDate,
    ) -> Result<StagedMove, StorageError> {
        let from = self.layout.staged_path(filename);
        let to = self.layout.rejected_path(filename, date);
        self.perform_move(from, to).await
    }

    /// Rename a staged file in place (same directory).
    pub async fn begin_rename(
        &self,
        old_filename: &str,
        new_filename: &str,
    ) -> Result<StagedMove, StorageError> {
        let from = self.layout.staged_path(old_filename);
        let to = self.layout.staged_path(new_filename);
        self.perform_move(from, to).await
    }

    async fn perform_move(&self, from: PathBuf, to: PathBuf) -> Result<StagedMove, StorageError> {
        if !fs::try_exists(&from).await? {
            return Err(StorageError::NotFound(from));
        }
        if fs::try_exists(&to).await? {
            return Err(StorageError::AlreadyExists(to));
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(&from, &to).await?;
        Ok(StagedMove { from, to })
    }
}

/// A completed filesystem move that may still need to be compensated.
///
/// The move has already happened when this value exists. Call [`commit`]
/// once the paired store mutation succeeded, or [`revert`] to put the file
/// back. Dropping without either leaves the file at its destination.
///
/// [`commit`]: StagedMove::commit
/// [`revert`]: StagedMove::revert
#[must_use = "a StagedMove must be committed or reverted"]
pub struct StagedMove {
    from: PathBuf,
    to: PathBuf,
}

impl StagedMove {
    pub fn source(&self) -> &Path {
        &self.from
    }

    pub fn destination(&self) -> &Path {
        &self.to
    }

    /// Keep the move. The file stays at its destination.
    pub fn commit(self) {}

    /// Undo the move, returning the file to its source path.
    ///
    /// A failure here means the file is orphaned at the destination with no
    /// matching record; the caller must surface it for manual reconciliation.
    pub async fn revert(self) -> Result<(), StorageError> {
        if let Err(e) = fs::rename(&self.to, &self.from).await {
            warn!(
                from = %self.to.display(),
                to = %self.from.display(),
                error = %e,
                "Failed to revert file move"
            );
            return Err(e.into());
        }
        Ok(())
    }
}
