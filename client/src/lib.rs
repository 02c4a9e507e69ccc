//! # Roster Client
//!
//! Browses a remote, paginated user directory with optimistic edits and
//! deletes.
//!
//! ## Components
//!
//! - **Remote store**: the [`UserStore`] trait with a reqwest-backed
//!   [`HttpUserStore`] and a [`MockUserStore`] for tests
//! - **Credentials**: a [`CredentialProvider`] injected into the HTTP store,
//!   forwarded as a bearer token on every mutating request
//! - **Controller**: [`SyncController`] owns the loaded page, applies changes
//!   locally before the remote confirms them and undoes them if it refuses
//!
//! ## Example
//!
//! ```ignore
//! use roster_client::{HttpUserStore, StaticToken, SyncController};
//! use roster_engine::UserPatch;
//! use std::time::Duration;
//!
//! let remote = HttpUserStore::new("https://reqres.in/api", StaticToken::new("token"), Duration::from_secs(10))?;
//! let controller = SyncController::new(remote);
//!
//! controller.refresh().await;
//! controller.set_search_query("emma");
//! controller.begin_edit(3, UserPatch::new().last_name("Wong-Smith")).await?;
//! ```

pub mod config;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod remote;

pub use config::{Config, ConfigError};
pub use controller::SyncController;
pub use credentials::{CredentialProvider, SharedToken, StaticToken};
pub use error::{Error, Result};
pub use remote::{Call, Gate, GateKey, HttpUserStore, MockUserStore, UserStore};
