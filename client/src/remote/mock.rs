//! Mock user store for testing.
//!
//! Serves canned pages, records every call, can fail the next call of each
//! kind, and can hold a call open until the test releases it.

use super::UserStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use roster_engine::{FetchError, MutationError, PageNumber, PageResponse, UserId, UserPatch};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchPage(PageNumber),
    UpdateUser(UserId, UserPatch),
    DeleteUser(UserId),
}

/// Identifies a call that can be held open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKey {
    Fetch(PageNumber),
    Update(UserId),
    Delete(UserId),
}

/// Releases a held call when told to, or when dropped.
#[derive(Debug)]
pub struct Gate {
    sender: oneshot::Sender<()>,
}

impl Gate {
    /// Let the held call complete.
    pub fn release(self) {
        let _ = self.sender.send(());
    }
}

/// Mock user store.
///
/// Clones share the same state, so a test can keep one handle while the
/// controller owns another.
#[derive(Debug, Default, Clone)]
pub struct MockUserStore {
    inner: Arc<Mutex<MockUserStoreInner>>,
}

#[derive(Debug, Default)]
struct MockUserStoreInner {
    pages: HashMap<PageNumber, PageResponse>,
    calls: Vec<Call>,
    gates: HashMap<GateKey, oneshot::Receiver<()>>,
    fail_next_fetch: Option<FetchError>,
    fail_next_update: Option<MutationError>,
    fail_next_delete: Option<MutationError>,
}

impl MockUserStore {
    /// Create a new mock store with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for `page`.
    pub fn set_page(&self, page: PageNumber, response: PageResponse) {
        self.inner.lock().pages.insert(page, response);
    }

    /// Get all calls received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    /// Get the number of fetches received so far.
    pub fn fetch_count(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::FetchPage(_)))
            .count()
    }

    /// Cause the next `fetch_page()` to fail with `error`.
    pub fn fail_next_fetch(&self, error: FetchError) {
        self.inner.lock().fail_next_fetch = Some(error);
    }

    /// Cause the next `update_user()` to fail with `error`.
    pub fn fail_next_update(&self, error: MutationError) {
        self.inner.lock().fail_next_update = Some(error);
    }

    /// Cause the next `delete_user()` to fail with `error`.
    pub fn fail_next_delete(&self, error: MutationError) {
        self.inner.lock().fail_next_delete = Some(error);
    }

    /// Hold the next call matching `key` until the returned gate is released.
    pub fn hold(&self, key: GateKey) -> Gate {
        let (sender, receiver) = oneshot::channel();
        self.inner.lock().gates.insert(key, receiver);
        Gate { sender }
    }

    /// Clear all state (pages, calls, failures, gates).
    pub fn reset(&self) {
        *self.inner.lock() = MockUserStoreInner::default();
    }

    async fn pass_gate(gate: Option<oneshot::Receiver<()>>) {
        if let Some(gate) = gate {
            // A dropped gate releases the call as well
            let _ = gate.await;
        }
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn fetch_page(&self, page: PageNumber) -> Result<PageResponse, FetchError> {
        let (gate, result) = {
            let mut inner = self.inner.lock();
            inner.calls.push(Call::FetchPage(page));

            let gate = inner.gates.remove(&GateKey::Fetch(page));
            let result = match inner.fail_next_fetch.take() {
                Some(error) => Err(error),
                None => inner
                    .pages
                    .get(&page)
                    .cloned()
                    .ok_or(FetchError::NonSuccessStatus { status: 404 }),
            };
            (gate, result)
        };

        Self::pass_gate(gate).await;
        result
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<(), MutationError> {
        let (gate, result) = {
            let mut inner = self.inner.lock();
            inner.calls.push(Call::UpdateUser(id, patch.clone()));

            let gate = inner.gates.remove(&GateKey::Update(id));
            let result = match inner.fail_next_update.take() {
                Some(error) => Err(error),
                None => Ok(()),
            };
            (gate, result)
        };

        Self::pass_gate(gate).await;
        result
    }

    async fn delete_user(&self, id: UserId) -> Result<(), MutationError> {
        let (gate, result) = {
            let mut inner = self.inner.lock();
            inner.calls.push(Call::DeleteUser(id));

            let gate = inner.gates.remove(&GateKey::Delete(id));
            let result = match inner.fail_next_delete.take() {
                Some(error) => Err(error),
                None => Ok(()),
            };
            (gate, result)
        };

        Self::pass_gate(gate).await;
        result
    }
}
