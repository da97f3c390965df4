//! Helpfulness vote toggling.
//!
//! Each user holds at most one vote per review. Clicking the same direction
//! again removes it; clicking the other direction switches it.

use serde::Serialize;

use crate::model::VoteKind;

/// What to do with a user's vote row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    /// No previous vote: insert one.
    Insert(VoteKind),
    /// Same direction as before: delete the vote.
    Remove(VoteKind),
    /// Opposite direction: update the existing vote.
    Switch { from: VoteKind, to: VoteKind },
}

/// Change to a review's (upvotes, downvotes) counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteDelta {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteDelta {
    fn of(kind: VoteKind, amount: i64) -> Self {
        match kind {
            VoteKind::Upvote => Self {
                upvotes: amount,
                downvotes: 0,
            },
            VoteKind::Downvote => Self {
                upvotes: 0,
                downvotes: amount,
            },
        }
    }

    fn plus(self, other: Self) -> Self {
        Self {
            upvotes: self.upvotes + other.upvotes,
            downvotes: self.downvotes + other.downvotes,
        }
    }
}

impl VoteAction {
    /// The user's vote after the action, if any.
    pub fn resulting_vote(self) -> Option<VoteKind> {
        match self {
            VoteAction::Insert(kind) => Some(kind),
            VoteAction::Remove(_) => None,
            VoteAction::Switch { to, .. } => Some(to),
        }
    }

    /// Counter change for optimistic display.
    pub fn delta(self) -> VoteDelta {
        match self {
            VoteAction::Insert(kind) => VoteDelta::of(kind, 1),
            VoteAction::Remove(kind) => VoteDelta::of(kind, -1),
            VoteAction::Switch { from, to } => VoteDelta::of(from, -1).plus(VoteDelta::of(to, 1)),
        }
    }
}

/// Decide how a click on `requested` changes the `existing` vote.
pub fn decide_vote(existing: Option<VoteKind>, requested: VoteKind) -> VoteAction {
    match existing {
        None => VoteAction::Insert(requested),
        Some(current) if current == requested => VoteAction::Remove(current),
        Some(current) => VoteAction::Switch {
            from: current,
            to: requested,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_vote_inserts() {
        let action = decide_vote(None, VoteKind::Upvote);
        assert_eq!(action, VoteAction::Insert(VoteKind::Upvote));
        assert_eq!(action.resulting_vote(), Some(VoteKind::Upvote));
        assert_eq!(
            action.delta(),
            VoteDelta {
                upvotes: 1,
                downvotes: 0
            }
        );
    }

    #[test]
    fn test_same_vote_toggles_off() {
        let action = decide_vote(Some(VoteKind::Downvote), VoteKind::Downvote);
        assert_eq!(action, VoteAction::Remove(VoteKind::Downvote));
        assert_eq!(action.resulting_vote(), None);
        assert_eq!(action.delta().downvotes, -1);
    }

    #[test]
    fn test_opposite_vote_switches() {
        let action = decide_vote(Some(VoteKind::Downvote), VoteKind::Upvote);
        assert_eq!(
            action,
            VoteAction::Switch {
                from: VoteKind::Downvote,
                to: VoteKind::Upvote
            }
        );
        assert_eq!(
            action.delta(),
            VoteDelta {
                upvotes: 1,
                downvotes: -1
            }
        );
    }
}
