pub mod error;
pub mod files;
pub mod layout;

pub use error::StorageError;
pub use files::{ScreeningFiles, StagedMove};
pub use layout::{ArchiveLayout, NUMERIC_BUCKET, bucket_for};
