//! Error types for the Roster engine.

use crate::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Local rejections returned directly from a mutation request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A mutation for this user is still waiting on the remote store.
    #[error("a mutation for user {0} is already pending")]
    Conflict(UserId),

    /// The user is not part of the currently loaded page.
    #[error("user not found in current page: {0}")]
    NotFound(UserId),

    /// A remote result arrived for a user with no pending mutation.
    ///
    /// Only reachable if a mutation is settled twice.
    #[error("no pending mutation for user {0}")]
    NotPending(UserId),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a page fetch against the remote store.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FetchError {
    #[error("failed to fetch users: {message}")]
    NetworkFailure { message: String },

    #[error("failed to fetch users: server responded with status {status}")]
    NonSuccessStatus { status: u16 },

    #[error("failed to fetch users: malformed response: {message}")]
    MalformedBody { message: String },
}

impl FetchError {
    /// Create a network failure from any displayable cause.
    pub fn network(cause: impl ToString) -> Self {
        FetchError::NetworkFailure {
            message: cause.to_string(),
        }
    }

    /// HTTP status carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::NonSuccessStatus { status } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of an update or delete against the remote store.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MutationError {
    #[error("request failed: {message}")]
    NetworkFailure { message: String },

    #[error("server responded with status {status}")]
    NonSuccessStatus { status: u16 },
}

impl MutationError {
    /// Create a network failure from any displayable cause.
    pub fn network(cause: impl ToString) -> Self {
        MutationError::NetworkFailure {
            message: cause.to_string(),
        }
    }

    /// HTTP status carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            MutationError::NonSuccessStatus { status } => Some(*status),
            MutationError::NetworkFailure { .. } => None,
        }
    }
}
