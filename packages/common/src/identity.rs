use serde::{Deserialize, Serialize};

/// Uploader identity attached to a submission.
///
/// Anonymous uploads are a first-class case rather than a sentinel user id,
/// so code can never accidentally treat the placeholder as a real account.
/// The database column stays a nullable id; conversion happens at the
/// entity boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Uploader {
    Anonymous,
    User(i32),
}

impl Uploader {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// The user id, if this is a registered uploader.
    pub fn user_id(&self) -> Option<i32> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }
}

impl From<Option<i32>> for Uploader {
    fn from(column: Option<i32>) -> Self {
        match column {
            None => Self::Anonymous,
            Some(id) => Self::User(id),
        }
    }
}

impl From<Uploader> for Option<i32> {
    fn from(uploader: Uploader) -> Self {
        uploader.user_id()
    }
}
