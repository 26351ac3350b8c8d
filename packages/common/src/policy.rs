//! Legality table for queue actions.
//!
//! A pure map from queue state to permitted actions, with no database or
//! framework involvement. The queue operations consult this table and then
//! re-validate ownership inside the transaction that performs the write.

use crate::flag::{ScreeningAction, ScreeningFlag};

/// A submission's queue state from the perspective of one caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueState {
    /// Nobody holds a claim. A flag may still be attached.
    Unclaimed,
    /// The caller holds the claim, with the item's current flag.
    ClaimedByCaller { flag: Option<ScreeningFlag> },
    /// Another moderator holds the claim.
    ClaimedByOther,
}

/// Actions permitted in the given state.
pub fn permitted(state: QueueState) -> &'static [ScreeningAction] {
    use ScreeningAction::*;

    match state {
        QueueState::Unclaimed => &[Claim],
        QueueState::ClaimedByOther => &[],
        QueueState::ClaimedByCaller { flag: None } => &[
            PreScreen,
            PreScreenAndRecommend,
            NeedsSecondOpinion,
            PossibleDuplicate,
            UnderInvestigation,
            Approve,
            ApproveAndFeature,
            Reject,
            Rename,
        ],
        QueueState::ClaimedByCaller {
            flag: Some(ScreeningFlag::PossibleDuplicate),
        } => &[
            PreScreen,
            PreScreenAndRecommend,
            NeedsSecondOpinion,
            UnderInvestigation,
            Reject,
            ClearFlag,
            Rename,
        ],
        QueueState::ClaimedByCaller {
            flag: Some(ScreeningFlag::UnderInvestigation),
        } => &[
            PreScreen,
            PreScreenAndRecommend,
            NeedsSecondOpinion,
            PossibleDuplicate,
            Reject,
            ClearFlag,
            Rename,
        ],
        QueueState::ClaimedByCaller {
            flag: Some(ScreeningFlag::NeedsSecondOpinion),
        } => &[
            PreScreen,
            PreScreenAndRecommend,
            PossibleDuplicate,
            UnderInvestigation,
            Approve,
            ApproveAndFeature,
            Reject,
            ClearFlag,
            Rename,
        ],
        QueueState::ClaimedByCaller {
            flag: Some(ScreeningFlag::PreScreened) | Some(ScreeningFlag::PreScreenedPlus),
        } => &[Approve, ApproveAndFeature, Reject, ClearFlag, Rename],
    }
}

/// Whether `action` is legal in `state`.
pub fn is_permitted(state: QueueState, action: ScreeningAction) -> bool {
    permitted(state).contains(&action)
}
