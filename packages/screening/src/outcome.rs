use common::ScreeningFlag;
use serde::Serialize;

/// User-facing validation warning attached to an action outcome. The web
/// layer renders these; the engine never raises them as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Submission the warning is about, when it concerns a single item.
    pub submission_id: Option<i32>,
    pub message: String,
}

impl Warning {
    pub fn new(submission_id: impl Into<Option<i32>>, message: impl Into<String>) -> Self {
        Self {
            submission_id: submission_id.into(),
            message: message.into(),
        }
    }
}

/// Filter token selecting a queue view. Returned to the caller as a
/// redirect target; also accepted by `queue_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueFilter {
    All,
    Unclaimed,
    ClaimedBy(i32),
    Flagged(ScreeningFlag),
    /// Both pre-screen flags.
    PreScreened,
}

/// Where the caller should send the moderator next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Redirect {
    Queue(QueueFilter),
    /// A pending submission's detail view.
    Item(i32),
    /// A newly archived item's page.
    Archived(i32),
}

/// Result of one inbound action.
#[derive(Debug)]
pub struct ActionOutcome {
    pub redirect: Redirect,
    pub warnings: Vec<Warning>,
    /// Items that reached their terminal state (for approve/reject) or
    /// were affected (for claim/unclaim/flag operations).
    pub committed: usize,
}

impl ActionOutcome {
    pub fn ok(redirect: Redirect, committed: usize) -> Self {
        Self {
            redirect,
            warnings: Vec::new(),
            committed,
        }
    }

    pub fn rejected(redirect: Redirect, warnings: Vec<Warning>) -> Self {
        Self {
            redirect,
            warnings,
            committed: 0,
        }
    }

    /// Whether validation rejected the action outright.
    pub fn is_rejected(&self) -> bool {
        !self.warnings.is_empty()
    }
}
