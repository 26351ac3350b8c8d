use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Bucket token for filenames that do not start with a letter.
pub const NUMERIC_BUCKET: &str = "0_9";

/// Archive folder bucket for a filename: the first character upper-cased,
/// with digits (and any other non-alphabetic first character) collapsed
/// into [`NUMERIC_BUCKET`]. This rule is part of the on-disk contract and
/// must stay byte-compatible with the existing archive layout.
pub fn bucket_for(filename: &str) -> String {
    match filename.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string(),
        _ => NUMERIC_BUCKET.to_string(),
    }
}

/// On-disk layout of the three screening areas.
///
/// Staged files live flat under the staging root, keyed by filename.
/// Archived files live under `{archive_root}/{bucket}/{filename}.zip`;
/// rejected files under `{rejected_root}/{YYYYMMDD}-{filename}.zip`.
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    staging_root: PathBuf,
    archive_root: PathBuf,
    rejected_root: PathBuf,
}

impl ArchiveLayout {
    pub fn new(
        staging_root: impl Into<PathBuf>,
        archive_root: impl Into<PathBuf>,
        rejected_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            staging_root: staging_root.into(),
            archive_root: archive_root.into(),
            rejected_root: rejected_root.into(),
        }
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    pub fn archive_root(&self) -> &Path {
        &self.archive_root
    }

    pub fn rejected_root(&self) -> &Path {
        &self.rejected_root
    }

    /// Deterministic staging path for a submission, keyed by filename.
    pub fn staged_path(&self, filename: &str) -> PathBuf {
        self.staging_root.join(format!("{filename}.zip"))
    }

    /// Final archive path for a filename.
    pub fn archive_path(&self, filename: &str) -> PathBuf {
        self.archive_root
            .join(bucket_for(filename))
            .join(format!("{filename}.zip"))
    }

    /// Dated rejected-items path for a filename.
    pub fn rejected_path(&self, filename: &str, date: NaiveDate) -> PathBuf {
        self.rejected_root
            .join(format!("{}-{filename}.zip", date.format("%Y%m%d")))
    }
}
