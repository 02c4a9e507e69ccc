//! Remote user store abstraction.
//!
//! The [`UserStore`] trait is the seam between the controller and the network:
//! - `fetch_page()` lists one page of users
//! - `update_user()` writes the editable fields of one user
//! - `delete_user()` removes one user
//!
//! Implementations report failures as typed values and never touch local
//! state; reconciling is the caller's job.

mod http;
mod mock;

pub use http::HttpUserStore;
pub use mock::{Call, Gate, GateKey, MockUserStore};

use async_trait::async_trait;
use roster_engine::{FetchError, MutationError, PageNumber, PageResponse, UserId, UserPatch};
use std::sync::Arc;

/// A paginated user directory.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch page `page` (1-based).
    async fn fetch_page(&self, page: PageNumber) -> Result<PageResponse, FetchError>;

    /// Write `patch` to user `id`.
    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<(), MutationError>;

    /// Delete user `id`.
    async fn delete_user(&self, id: UserId) -> Result<(), MutationError>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn fetch_page(&self, page: PageNumber) -> Result<PageResponse, FetchError> {
        (**self).fetch_page(page).await
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<(), MutationError> {
        (**self).update_user(id, patch).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), MutationError> {
        (**self).delete_user(id).await
    }
}
