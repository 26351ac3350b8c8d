#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow flag a pending submission can carry while it sits in the
/// screening queue.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly as
/// an entity column type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum ScreeningFlag {
    /// The flagging screener wants another screener's verdict.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "NeedsSecondOpinion"))]
    NeedsSecondOpinion,
    /// Suspected duplicate of an already archived track.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PossibleDuplicate"))]
    PossibleDuplicate,
    /// Provenance or authorship is being looked into.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "UnderInvestigation"))]
    UnderInvestigation,
    /// Vetted and cleared for approval by any screener.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PreScreened"))]
    PreScreened,
    /// Vetted, cleared, and recommended for featuring.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PreScreenedPlus"))]
    PreScreenedPlus,
}

impl ScreeningFlag {
    /// All flag values.
    pub const ALL: &'static [ScreeningFlag] = &[
        Self::NeedsSecondOpinion,
        Self::PossibleDuplicate,
        Self::UnderInvestigation,
        Self::PreScreened,
        Self::PreScreenedPlus,
    ];

    /// Escalation flags. A moderator may not re-claim an item they flagged
    /// with one of these while the flag remains set.
    pub const ESCALATION: &'static [ScreeningFlag] = &[
        Self::NeedsSecondOpinion,
        Self::PossibleDuplicate,
        Self::UnderInvestigation,
    ];

    /// Flags that clear an item for approval without an active claim.
    pub const PRE_SCREEN: &'static [ScreeningFlag] = &[Self::PreScreened, Self::PreScreenedPlus];

    pub fn is_escalation(&self) -> bool {
        Self::ESCALATION.contains(self)
    }

    pub fn is_pre_screen(&self) -> bool {
        Self::PRE_SCREEN.contains(self)
    }

    /// The queue action that applies this flag.
    pub fn action(&self) -> ScreeningAction {
        match self {
            Self::NeedsSecondOpinion => ScreeningAction::NeedsSecondOpinion,
            Self::PossibleDuplicate => ScreeningAction::PossibleDuplicate,
            Self::UnderInvestigation => ScreeningAction::UnderInvestigation,
            Self::PreScreened => ScreeningAction::PreScreen,
            Self::PreScreenedPlus => ScreeningAction::PreScreenAndRecommend,
        }
    }

    /// Returns the string representation (PascalCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsSecondOpinion => "NeedsSecondOpinion",
            Self::PossibleDuplicate => "PossibleDuplicate",
            Self::UnderInvestigation => "UnderInvestigation",
            Self::PreScreened => "PreScreened",
            Self::PreScreenedPlus => "PreScreenedPlus",
        }
    }

    /// Human-readable queue label. Kept separate from `as_str` so the
    /// stored value and the display string can evolve independently.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NeedsSecondOpinion => "needs second opinion",
            Self::PossibleDuplicate => "possible duplicate",
            Self::UnderInvestigation => "under investigation",
            Self::PreScreened => "pre-screened",
            Self::PreScreenedPlus => "pre-screened (recommended)",
        }
    }
}

impl fmt::Display for ScreeningFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid flag string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFlagError {
    invalid: String,
}

impl fmt::Display for ParseFlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid flag '{}'. Valid values: {}",
            self.invalid,
            ScreeningFlag::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseFlagError {}

impl FromStr for ScreeningFlag {
    type Err = ParseFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NeedsSecondOpinion" => Ok(Self::NeedsSecondOpinion),
            "PossibleDuplicate" => Ok(Self::PossibleDuplicate),
            "UnderInvestigation" => Ok(Self::UnderInvestigation),
            "PreScreened" => Ok(Self::PreScreened),
            "PreScreenedPlus" => Ok(Self::PreScreenedPlus),
            _ => Err(ParseFlagError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// An action a moderator can take on a queue entry. The legality of each
/// action in each queue state is the `policy` module's table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreeningAction {
    Claim,
    PreScreen,
    PreScreenAndRecommend,
    NeedsSecondOpinion,
    PossibleDuplicate,
    UnderInvestigation,
    Approve,
    ApproveAndFeature,
    Reject,
    ClearFlag,
    Rename,
}

impl ScreeningAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::PreScreen => "pre-screen",
            Self::PreScreenAndRecommend => "pre-screen-and-recommend",
            Self::NeedsSecondOpinion => "needs-second-opinion",
            Self::PossibleDuplicate => "possible-duplicate",
            Self::UnderInvestigation => "under-investigation",
            Self::Approve => "approve",
            Self::ApproveAndFeature => "approve-and-feature",
            Self::Reject => "reject",
            Self::ClearFlag => "clear-flag",
            Self::Rename => "rename",
        }
    }
}

impl fmt::Display for ScreeningAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of an audit-log entry. One row is appended per state transition;
/// rows are never updated or deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum ScreeningEventKind {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Claim"))]
    Claim,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Unclaim"))]
    Unclaim,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ApplyFlag"))]
    ApplyFlag,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ClearFlag"))]
    ClearFlag,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Rename"))]
    Rename,
}

impl ScreeningEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claim => "Claim",
            Self::Unclaim => "Unclaim",
            Self::ApplyFlag => "ApplyFlag",
            Self::ClearFlag => "ClearFlag",
            Self::Rename => "Rename",
        }
    }
}

impl fmt::Display for ScreeningEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
