//! Optimistic mutation bookkeeping.
//!
//! A mutation is applied to the loaded page before the remote store has
//! confirmed it. The [`PendingMutation`] keeps what is needed to undo it if the
//! remote call fails.

use crate::{MutationError, UserId, UserPatch, UserRecord};
use serde::{Deserialize, Serialize};

/// Kind of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Edit,
    Delete,
}

/// A mutation whose remote call has not settled yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMutation {
    /// User the mutation targets
    pub target_id: UserId,
    /// Edit or delete
    pub kind: MutationKind,
    /// The record as it was before the optimistic change
    pub snapshot: UserRecord,
    /// Index of the record in the page when the mutation began
    pub original_index: usize,
    /// Load epoch of the page the mutation was applied to
    pub page_epoch: u64,
    /// Patch sent to the remote (edits only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<UserPatch>,
}

/// Lifecycle state of a mutation for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationState {
    Pending,
    Committed,
    RolledBack,
}

/// Final result of a settled mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MutationOutcome {
    /// The remote accepted the change; local state already reflects it.
    Committed { target_id: UserId, kind: MutationKind },
    /// The remote rejected the change and local state was restored.
    RolledBack {
        target_id: UserId,
        kind: MutationKind,
        error: MutationError,
        /// False when the page was reloaded meanwhile and nothing was restored
        restored: bool,
    },
}

impl MutationOutcome {
    pub fn target_id(&self) -> UserId {
        match self {
            MutationOutcome::Committed { target_id, .. }
            | MutationOutcome::RolledBack { target_id, .. } => *target_id,
        }
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            MutationOutcome::Committed { kind, .. } | MutationOutcome::RolledBack { kind, .. } => {
                *kind
            }
        }
    }

    /// The state the mutation ended in.
    pub fn state(&self) -> MutationState {
        match self {
            MutationOutcome::Committed { .. } => MutationState::Committed,
            MutationOutcome::RolledBack { .. } => MutationState::RolledBack,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed { .. })
    }

    pub fn error(&self) -> Option<&MutationError> {
        match self {
            MutationOutcome::RolledBack { error, .. } => Some(error),
            MutationOutcome::Committed { .. } => None,
        }
    }
}
