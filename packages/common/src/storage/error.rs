use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while moving screening files around on disk.
#[derive(Debug)]
pub enum StorageError {
    /// The source file does not exist (missing or already moved).
    NotFound(PathBuf),
    /// The destination path is already occupied.
    AlreadyExists(PathBuf),
    /// An I/O error occurred.
    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::AlreadyExists(path) => {
                write!(f, "destination already exists: {}", path.display())
            }
            Self::Io(err) => write!(f, "storage IO error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
