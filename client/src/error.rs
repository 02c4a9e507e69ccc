//! Unified error handling for the client.

use crate::config::ConfigError;

/// Client error type.
///
/// Remote failures never appear here: the controller turns them into state
/// transitions and notifications.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] roster_engine::Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
