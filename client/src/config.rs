//! Configuration management for the client.

use roster_engine::PageNumber;
use std::env;
use std::time::Duration;

/// Default user directory endpoint.
pub const DEFAULT_API_URL: &str = "https://reqres.in/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the user directory API
    pub api_url: String,
    /// Bearer token attached to mutating requests
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Page shown on start-up
    pub start_page: PageNumber,
    /// Search text applied on start-up
    pub search: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            start_page: 1,
            search: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("ROSTER_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if api_url.is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }

        let token = lookup("ROSTER_TOKEN").filter(|t| !t.is_empty());

        let timeout_secs: u64 = lookup("ROSTER_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidTimeout)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let start_page: PageNumber = lookup("ROSTER_START_PAGE")
            .unwrap_or_else(|| "1".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidStartPage)?;
        if start_page == 0 {
            return Err(ConfigError::InvalidStartPage);
        }

        let search = lookup("ROSTER_SEARCH").filter(|s| !s.is_empty());

        Ok(Self {
            api_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
            start_page,
            search,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ROSTER_API_URL must not be empty")]
    EmptyApiUrl,

    #[error("Invalid ROSTER_TIMEOUT_SECS value")]
    InvalidTimeout,

    #[error("Invalid ROSTER_START_PAGE value")]
    InvalidStartPage,
}
