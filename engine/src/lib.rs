//! # Roster Engine
//!
//! State engine for a client that browses a remote, paginated user directory.
//!
//! This crate holds the loaded page, derives the searchable view and keeps the
//! bookkeeping for optimistic edits and deletes. It never talks to the network;
//! the client crate drives it around each remote call.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of HTTP, tokens or timers
//! - **Deterministic**: the same sequence of calls always yields the same state
//! - **Testable**: pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Pages
//!
//! A [`PageState`] holds the records of exactly one page. Each request for a
//! page is identified by a [`FetchTicket`]; only the newest ticket may settle the
//! page, so a slow response for an older request is dropped.
//!
//! ### Optimistic mutations
//!
//! [`Store::begin_edit`] and [`Store::begin_delete`] change the page right away
//! and return a [`PendingMutation`] holding the record as it was. Once the remote
//! answers, [`Store::settle`] either keeps the change or restores the record (a
//! deleted record goes back to its original index).
//!
//! ### Search
//!
//! [`filter`] is a pure function of the records and a [`SearchQuery`].
//!
//! ## Quick Start
//!
//! ```rust
//! use roster_engine::{PageResponse, Store, UserPatch, UserRecord, MutationError};
//!
//! let mut store = Store::new();
//!
//! // 1. Load the first page
//! let ticket = store.begin_refresh();
//! let response = PageResponse::new(1, 3, vec![UserRecord::new(1, "ann@x.com", "Ann", "Lee")]);
//! store.complete_fetch(ticket, Ok(response));
//!
//! // 2. Edit optimistically
//! store.begin_edit(1, UserPatch::new().first_name("Anna")).unwrap();
//! assert_eq!(store.page().records[0].first_name, "Anna");
//!
//! // 3. The remote refuses: the edit is undone
//! store.settle(1, Err(MutationError::NonSuccessStatus { status: 500 }));
//! assert_eq!(store.page().records[0].first_name, "Ann");
//! ```

pub mod error;
pub mod filter;
pub mod mutation;
pub mod notification;
pub mod page;
pub mod record;
pub mod snapshot;
pub mod store;

// Re-export main types at crate root
pub use error::{Error, FetchError, MutationError};
pub use filter::{filter, SearchQuery};
pub use mutation::{MutationKind, MutationOutcome, MutationState, PendingMutation};
pub use notification::{Notification, NotificationKind};
pub use page::{ErrorInfo, PageResponse, PageState};
pub use record::{UserPatch, UserRecord};
pub use snapshot::StateSnapshot;
pub use store::{FetchOutcome, FetchTicket, LoadStatus, Store};

/// Type aliases for clarity
pub type UserId = u64;
pub type PageNumber = u32;
