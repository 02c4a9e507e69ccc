//! SyncController - drives the engine around remote calls.
//!
//! The controller owns the only [`Store`] and is the single writer of page
//! state. Adapters call its intent methods and read state through snapshots,
//! a `watch` subscription, and a stream of [`Notification`]s.
//!
//! # Flow
//!
//! ```text
//! intent → SyncController → Store (optimistic change / ticket)
//!                 ↓
//!            UserStore (await)
//!                 ↓
//!          Store (settle) → snapshot + notification
//! ```
//!
//! The store lock is never held across an await, so intents may be issued
//! concurrently from one task. Page requests are tagged with a generation
//! and only the newest may land; mutations on the same user are rejected
//! while one is pending.

use crate::remote::UserStore;
use parking_lot::Mutex;
use roster_engine::{
    Error, FetchOutcome, FetchTicket, MutationOutcome, Notification, PageNumber, PendingMutation,
    StateSnapshot, Store, UserId, UserPatch, UserRecord,
};
use tokio::sync::{broadcast, watch};

/// Capacity of the notification channel.
const NOTIFICATION_CAPACITY: usize = 64;

/// Owns the loaded page and coordinates it with a remote [`UserStore`].
#[derive(Debug)]
pub struct SyncController<S> {
    remote: S,
    store: Mutex<Store>,
    state_tx: watch::Sender<StateSnapshot>,
    notify_tx: broadcast::Sender<Notification>,
}

impl<S: UserStore> SyncController<S> {
    /// Create a controller with an empty first page.
    ///
    /// Call [`refresh`](Self::refresh) to perform the initial load.
    pub fn new(remote: S) -> Self {
        let store = Store::new();
        let (state_tx, _) = watch::channel(store.snapshot());
        let (notify_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Self {
            remote,
            store: Mutex::new(store),
            state_tx,
            notify_tx,
        }
    }

    /// Get the remote store.
    pub fn remote(&self) -> &S {
        &self.remote
    }

    /// Take a read-only copy of the current state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.store.lock().snapshot()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<StateSnapshot> {
        self.state_tx.subscribe()
    }

    /// Subscribe to notifications emitted after page loads and mutations.
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notify_tx.subscribe()
    }

    /// Records of the loaded page matching the search query.
    pub fn filtered_view(&self) -> Vec<UserRecord> {
        self.store.lock().filtered()
    }

    /// Get the pending mutation for `id`, if any.
    pub fn pending(&self, id: UserId) -> Option<PendingMutation> {
        self.store.lock().pending(id).cloned()
    }

    /// Load the current page again, without the range check.
    pub async fn refresh(&self) -> FetchOutcome {
        let ticket = self.store.lock().begin_refresh();
        self.run_fetch(ticket).await
    }

    /// Switch to page `page`.
    ///
    /// Pages outside `[1, total_pages]` are ignored.
    pub async fn set_page(&self, page: PageNumber) -> FetchOutcome {
        let ticket = self.store.lock().begin_fetch(page);
        match ticket {
            Some(ticket) => self.run_fetch(ticket).await,
            None => {
                tracing::debug!(page, "Ignoring out-of-range page request");
                FetchOutcome::Ignored { page }
            }
        }
    }

    /// Move one page forward, stopping at the last page.
    pub async fn next_page(&self) -> FetchOutcome {
        let (current, total) = self.page_bounds();
        let target = current.saturating_add(1).min(total);
        if target == current {
            return FetchOutcome::Ignored { page: target };
        }
        self.set_page(target).await
    }

    /// Move one page back, stopping at the first page.
    pub async fn previous_page(&self) -> FetchOutcome {
        let (current, _) = self.page_bounds();
        let target = current.saturating_sub(1).max(1);
        if target == current {
            return FetchOutcome::Ignored { page: target };
        }
        self.set_page(target).await
    }

    fn page_bounds(&self) -> (PageNumber, PageNumber) {
        let store = self.store.lock();
        (store.page().current_page, store.page().total_pages)
    }

    async fn run_fetch(&self, ticket: FetchTicket) -> FetchOutcome {
        self.publish();
        tracing::debug!(
            page = ticket.page,
            generation = ticket.generation,
            "Page fetch started"
        );

        let result = self.remote.fetch_page(ticket.page).await;
        let outcome = self.store.lock().complete_fetch(ticket, result);

        match &outcome {
            FetchOutcome::Loaded { page, count } => {
                tracing::info!(page, count, "Page loaded");
                self.publish();
                self.notify(Notification::page_loaded(*page, *count));
            }
            FetchOutcome::Failed { page, error } => {
                tracing::warn!(page, error = %error, "Page fetch failed, keeping previous records");
                self.publish();
                self.notify(Notification::page_failed(error));
            }
            FetchOutcome::Superseded { page, generation } => {
                tracing::debug!(page, generation, "Discarding superseded page response");
            }
            FetchOutcome::Ignored { .. } => {}
        }

        outcome
    }

    /// Replace the search text. Local only; the remote is never contacted.
    pub fn set_search_query(&self, text: impl Into<String>) {
        self.store.lock().set_query(text);
        self.publish();
    }

    /// Optimistically edit user `id`, then confirm with the remote.
    ///
    /// Returns `Err` without contacting the remote if the user is not loaded
    /// or already has a pending mutation. Otherwise the remote result is
    /// reported as a [`MutationOutcome`].
    pub async fn begin_edit(&self, id: UserId, patch: UserPatch) -> Result<MutationOutcome, Error> {
        let mutation = self.store.lock().begin_edit(id, patch)?;
        self.publish();
        tracing::debug!(user_id = id, "Edit applied locally");

        let body = mutation.patch.unwrap_or_default();
        let result = self.remote.update_user(id, &body).await;
        self.finish_mutation(id, result)
    }

    /// Optimistically delete user `id`, then confirm with the remote.
    ///
    /// Rejections and outcomes as for [`begin_edit`](Self::begin_edit).
    pub async fn begin_delete(&self, id: UserId) -> Result<MutationOutcome, Error> {
        let mutation = self.store.lock().begin_delete(id)?;
        self.publish();
        tracing::debug!(
            user_id = id,
            index = mutation.original_index,
            "Delete applied locally"
        );

        let result = self.remote.delete_user(id).await;
        self.finish_mutation(id, result)
    }

    fn finish_mutation(
        &self,
        id: UserId,
        result: Result<(), roster_engine::MutationError>,
    ) -> Result<MutationOutcome, Error> {
        let outcome = self.store.lock().settle(id, result).ok_or_else(|| {
            tracing::error!(user_id = id, "Remote result for a mutation that is not pending");
            Error::NotPending(id)
        })?;

        match &outcome {
            MutationOutcome::Committed { kind, .. } => {
                tracing::info!(user_id = id, ?kind, "Mutation committed");
            }
            MutationOutcome::RolledBack {
                kind,
                error,
                restored,
                ..
            } => {
                tracing::warn!(user_id = id, ?kind, error = %error, restored, "Mutation rolled back");
            }
        }

        self.publish();
        self.notify(Notification::for_outcome(&outcome));
        Ok(outcome)
    }

    fn publish(&self) {
        let snapshot = self.store.lock().snapshot();
        self.state_tx.send_replace(snapshot);
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine; notifications are transient
        let _ = self.notify_tx.send(notification);
    }
}
