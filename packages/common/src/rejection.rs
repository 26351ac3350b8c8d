#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reason a submission was rejected. Closed set; every reason carries a
/// default message used when the rejecting moderator leaves theirs blank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum RejectionReason {
    /// Below the archive's quality bar.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PoorQuality"))]
    PoorQuality,
    /// The track is already in the archive.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "AlreadyArchived"))]
    AlreadyArchived,
    /// Ripped from another release without credit.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Ripped"))]
    Ripped,
    /// The file does not load or is damaged.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Corrupt"))]
    Corrupt,
    /// Content not allowed on the archive.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "DisallowedContent"))]
    DisallowedContent,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Other"))]
    Other,
}

impl RejectionReason {
    /// All reason values.
    pub const ALL: &'static [RejectionReason] = &[
        Self::PoorQuality,
        Self::AlreadyArchived,
        Self::Ripped,
        Self::Corrupt,
        Self::DisallowedContent,
        Self::Other,
    ];

    /// Message recorded when the moderator's message is blank.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::PoorQuality => "The track does not meet the archive's quality standard.",
            Self::AlreadyArchived => "This track is already present in the archive.",
            Self::Ripped => "The track appears to be ripped from another release without credit.",
            Self::Corrupt => "The file is corrupt or fails to load.",
            Self::DisallowedContent => "The content is not allowed on the archive.",
            Self::Other => "Rejected after screening.",
        }
    }

    /// Returns the string representation (PascalCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PoorQuality => "PoorQuality",
            Self::AlreadyArchived => "AlreadyArchived",
            Self::Ripped => "Ripped",
            Self::Corrupt => "Corrupt",
            Self::DisallowedContent => "DisallowedContent",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid reason string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReasonError {
    invalid: String,
}

impl fmt::Display for ParseReasonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid rejection reason '{}'. Valid values: {}",
            self.invalid,
            RejectionReason::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseReasonError {}

impl FromStr for RejectionReason {
    type Err = ParseReasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PoorQuality" => Ok(Self::PoorQuality),
            "AlreadyArchived" => Ok(Self::AlreadyArchived),
            "Ripped" => Ok(Self::Ripped),
            "Corrupt" => Ok(Self::Corrupt),
            "DisallowedContent" => Ok(Self::DisallowedContent),
            "Other" => Ok(Self::Other),
            _ => Err(ParseReasonError {
                invalid: s.to_string(),
            }),
        }
    }
}
