//! Transient notifications for the presentation layer.

use crate::{FetchError, MutationKind, MutationOutcome};
use serde::{Deserialize, Serialize};

/// Whether a notification reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message the adapter can surface to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    /// Notification for a completed page load.
    pub fn page_loaded(page: crate::PageNumber, count: usize) -> Self {
        Self::success(format!("Loaded {} users from page {}", count, page))
    }

    /// Notification for a failed page load.
    pub fn page_failed(err: &FetchError) -> Self {
        Self::error(err.to_string())
    }

    /// Notification for a settled mutation.
    pub fn for_outcome(outcome: &MutationOutcome) -> Self {
        match outcome {
            MutationOutcome::Committed { kind, .. } => match kind {
                MutationKind::Edit => Self::success("User updated successfully"),
                MutationKind::Delete => Self::success("User deleted successfully"),
            },
            MutationOutcome::RolledBack { kind, error, .. } => {
                let action = match kind {
                    MutationKind::Edit => "update",
                    MutationKind::Delete => "delete",
                };
                Self::error(format!("Failed to {} user: {}", action, error))
            }
        }
    }
}
