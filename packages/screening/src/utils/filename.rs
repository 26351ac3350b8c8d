/// Result of validating a proposed rename target.
#[derive(Debug, PartialEq, Eq)]
pub enum RenameError {
    /// Proposed name is empty.
    Empty,
    /// Proposed name contains characters outside `[A-Za-z0-9._-]`.
    InvalidCharacters,
    /// Proposed name equals the current one (case-insensitively).
    SameName,
    /// Proposed name changes the file extension.
    ExtensionChanged,
}

impl RenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "New filename cannot be empty",
            Self::InvalidCharacters => {
                "Invalid filename: only letters, digits, '.', '_' and '-' are allowed"
            }
            Self::SameName => "New filename must differ from the current one",
            Self::ExtensionChanged => "New filename must keep the original file extension",
        }
    }
}

/// The extension part of a filename (after the last dot), if any.
fn extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Validates a proposed rename from `current` to `proposed`.
///
/// The proposed name must be non-empty, use only `[A-Za-z0-9._-]`, differ
/// from the current name case-insensitively, and keep the current
/// extension (compared case-insensitively). Uniqueness against existing
/// records is the caller's concern.
pub fn validate_rename<'a>(current: &str, proposed: &'a str) -> Result<&'a str, RenameError> {
    if proposed.is_empty() {
        return Err(RenameError::Empty);
    }

    if !proposed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(RenameError::InvalidCharacters);
    }

    if proposed.eq_ignore_ascii_case(current) {
        return Err(RenameError::SameName);
    }

    let same_extension = match (extension(current), extension(proposed)) {
        (Some(old), Some(new)) => old.eq_ignore_ascii_case(new),
        (None, None) => true,
        _ => false,
    };
    if !same_extension {
        return Err(RenameError::ExtensionChanged);
    }

    Ok(proposed)
}
