//! Store - the in-memory state container.
//!
//! The Store holds the loaded page, the search query and the mutations that are
//! waiting on the remote. It performs no IO: callers obtain a ticket or a
//! [`PendingMutation`] from it, talk to the remote themselves, and hand the
//! result back to settle the state.

use crate::{
    error::Result, filter, Error, FetchError, MutationError, MutationKind, MutationOutcome,
    MutationState, PageNumber, PageResponse, PageState, PendingMutation, SearchQuery,
    StateSnapshot, UserId, UserPatch, UserRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Load state of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Identifies one page request.
///
/// Only the ticket with the newest generation may settle the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTicket {
    pub page: PageNumber,
    pub generation: u64,
}

/// What happened to a page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum FetchOutcome {
    /// The page number was out of range; nothing was requested.
    Ignored { page: PageNumber },
    /// The page replaced the loaded state.
    Loaded { page: PageNumber, count: usize },
    /// The request failed; the previous records were kept.
    Failed { page: PageNumber, error: FetchError },
    /// A newer request was issued meanwhile; the result was discarded.
    Superseded { page: PageNumber, generation: u64 },
}

/// The main store holding all state.
#[derive(Debug, Clone, Default)]
pub struct Store {
    /// Loaded page
    page: PageState,
    /// Page load state machine
    status: LoadStatus,
    /// Current search text
    query: SearchQuery,
    /// Generation of the newest fetch ticket issued
    generation: u64,
    /// Incremented whenever the page is replaced
    epoch: u64,
    /// Ids of the loaded page in server order
    order: Vec<UserId>,
    /// In-flight mutations by target
    pending: HashMap<UserId, PendingMutation>,
}

impl Store {
    /// Create an empty store on page 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the loaded page.
    pub fn page(&self) -> &PageState {
        &self.page
    }

    /// Get the load status.
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Get the search query.
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Generation of the newest fetch ticket.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of times the page has been replaced.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Request `page`, if it lies within `[1, total_pages]`.
    pub fn begin_fetch(&mut self, page: PageNumber) -> Option<FetchTicket> {
        if !self.page.contains_page(page) {
            return None;
        }
        Some(self.issue(page))
    }

    /// Request the current page again, skipping the range check.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        let page = self.page.current_page;
        self.issue(page)
    }

    fn issue(&mut self, page: PageNumber) -> FetchTicket {
        self.generation += 1;
        self.page.loading = true;
        self.status = LoadStatus::Loading;
        FetchTicket {
            page,
            generation: self.generation,
        }
    }

    /// Check whether `ticket` is the newest request.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Settle a page request.
    ///
    /// Results for superseded tickets leave the state untouched. A failure keeps
    /// the previously loaded records and only records the error.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<PageResponse, FetchError>,
    ) -> FetchOutcome {
        if !self.is_current(&ticket) {
            return FetchOutcome::Superseded {
                page: ticket.page,
                generation: ticket.generation,
            };
        }

        match result {
            Ok(response) => {
                self.page = PageState::from_response(ticket.page, response);
                self.order = self.page.records.iter().map(|r| r.id).collect();
                self.epoch += 1;
                self.status = LoadStatus::Loaded;
                FetchOutcome::Loaded {
                    page: ticket.page,
                    count: self.page.records.len(),
                }
            }
            Err(error) => {
                self.page.loading = false;
                self.page.last_error = Some((&error).into());
                self.status = LoadStatus::Failed;
                FetchOutcome::Failed {
                    page: ticket.page,
                    error,
                }
            }
        }
    }

    /// Replace the search text.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = SearchQuery::new(text);
    }

    /// Records of the loaded page matching the search query.
    pub fn filtered(&self) -> Vec<UserRecord> {
        filter(&self.page.records, &self.query)
    }

    /// Get the pending mutation for `id`.
    pub fn pending(&self, id: UserId) -> Option<&PendingMutation> {
        self.pending.get(&id)
    }

    /// Get count of pending mutations.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Mutation state for `id`, if a mutation is in flight.
    pub fn mutation_state(&self, id: UserId) -> Option<MutationState> {
        self.pending.get(&id).map(|_| MutationState::Pending)
    }

    fn claim(&self, id: UserId) -> Result<usize> {
        if self.pending.contains_key(&id) {
            return Err(Error::Conflict(id));
        }
        self.page.position(id).ok_or(Error::NotFound(id))
    }

    /// Optimistically apply `patch` to user `id`.
    ///
    /// The returned mutation carries the full editable triple to send to the
    /// remote.
    pub fn begin_edit(&mut self, id: UserId, patch: UserPatch) -> Result<PendingMutation> {
        let index = self.claim(id)?;
        let record = &mut self.page.records[index];
        let snapshot = record.clone();
        record.apply(&patch);

        let mutation = PendingMutation {
            target_id: id,
            kind: MutationKind::Edit,
            patch: Some(patch.completed_from(&snapshot)),
            snapshot,
            original_index: index,
            page_epoch: self.epoch,
        };
        self.pending.insert(id, mutation.clone());
        Ok(mutation)
    }

    /// Optimistically remove user `id` from the page.
    pub fn begin_delete(&mut self, id: UserId) -> Result<PendingMutation> {
        let index = self.claim(id)?;
        let snapshot = self.page.records.remove(index);

        let mutation = PendingMutation {
            target_id: id,
            kind: MutationKind::Delete,
            patch: None,
            snapshot,
            original_index: index,
            page_epoch: self.epoch,
        };
        self.pending.insert(id, mutation.clone());
        Ok(mutation)
    }

    /// Settle the pending mutation for `id` with the remote result.
    ///
    /// Returns `None` if no mutation is pending for `id`.
    pub fn settle(
        &mut self,
        id: UserId,
        result: std::result::Result<(), MutationError>,
    ) -> Option<MutationOutcome> {
        let mutation = self.pending.remove(&id)?;
        let kind = mutation.kind;

        let outcome = match result {
            Ok(()) => MutationOutcome::Committed {
                target_id: id,
                kind,
            },
            Err(error) => {
                let restored = self.roll_back(mutation);
                MutationOutcome::RolledBack {
                    target_id: id,
                    kind,
                    error,
                    restored,
                }
            }
        };
        Some(outcome)
    }

    fn roll_back(&mut self, mutation: PendingMutation) -> bool {
        // A newer page load is authoritative over the optimistic change
        if mutation.page_epoch != self.epoch {
            return false;
        }

        let records = &mut self.page.records;
        match mutation.kind {
            MutationKind::Edit => match records.iter_mut().find(|r| r.id == mutation.target_id) {
                Some(record) => {
                    *record = mutation.snapshot;
                    true
                }
                None => false,
            },
            MutationKind::Delete => {
                let order = &self.order;
                let rank = |id: UserId| order.iter().position(|&o| o == id);
                // Other deletes may have shifted the page since this one began
                let index = match rank(mutation.target_id) {
                    Some(own) => records
                        .iter()
                        .position(|r| rank(r.id).is_some_and(|other| other > own))
                        .unwrap_or(records.len()),
                    None => mutation.original_index.min(records.len()),
                };
                records.insert(index, mutation.snapshot);
                true
            }
        }
    }

    /// Take a read-only copy of the state for presentation.
    pub fn snapshot(&self) -> StateSnapshot {
        let mut pending: Vec<UserId> = self.pending.keys().copied().collect();
        pending.sort_unstable();

        StateSnapshot {
            page: self.page.clone(),
            status: self.status,
            query: self.query.clone(),
            filtered: self.filtered(),
            pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: UserId, first_name: &str) -> UserRecord {
        UserRecord::new(id, format!("{}@x.com", first_name.to_lowercase()), first_name, "Doe")
    }

    fn loaded_store(records: Vec<UserRecord>, total_pages: i64) -> Store {
        let mut store = Store::new();
        let ticket = store.begin_refresh();
        store.complete_fetch(ticket, Ok(PageResponse::new(1, total_pages, records)));
        store
    }

    fn ids(store: &Store) -> Vec<UserId> {
        store.page().records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn create_store() {
        let store = Store::new();
        assert_eq!(store.status(), LoadStatus::Idle);
        assert_eq!(store.page().current_page, 1);
        assert_eq!(store.page().total_pages, 1);
        assert!(store.page().records.is_empty());
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn fetch_marks_loading_then_loaded() {
        let mut store = Store::new();
        let ticket = store.begin_refresh();
        assert!(store.page().loading);
        assert_eq!(store.status(), LoadStatus::Loading);

        let outcome = store.complete_fetch(
            ticket,
            Ok(PageResponse::new(1, 3, vec![user(1, "A")])),
        );

        assert_eq!(outcome, FetchOutcome::Loaded { page: 1, count: 1 });
        assert_eq!(store.status(), LoadStatus::Loaded);
        assert!(!store.page().loading);
        assert_eq!(store.page().total_pages, 3);
        assert_eq!(store.epoch(), 1);
    }

    #[test]
    fn out_of_range_fetch_is_ignored() {
        let mut store = loaded_store(vec![user(1, "A")], 3);
        let before = store.page().clone();

        assert!(store.begin_fetch(0).is_none());
        assert!(store.begin_fetch(4).is_none());
        assert_eq!(store.page(), &before);
        assert_eq!(store.status(), LoadStatus::Loaded);
    }

    #[test]
    fn failed_fetch_keeps_last_good_records() {
        let mut store = loaded_store(vec![user(1, "A"), user(2, "B")], 3);
        let ticket = store.begin_fetch(2).unwrap();

        let outcome = store.complete_fetch(ticket, Err(FetchError::NonSuccessStatus { status: 502 }));

        assert!(matches!(outcome, FetchOutcome::Failed { page: 2, .. }));
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.page().current_page, 1);
        assert_eq!(store.status(), LoadStatus::Failed);
        assert_eq!(store.page().last_error.as_ref().unwrap().status, Some(502));
        assert!(!store.page().loading);
    }

    #[test]
    fn success_clears_last_error() {
        let mut store = loaded_store(vec![user(1, "A")], 3);
        let ticket = store.begin_fetch(2).unwrap();
        store.complete_fetch(ticket, Err(FetchError::network("down")));

        let ticket = store.begin_fetch(2).unwrap();
        store.complete_fetch(ticket, Ok(PageResponse::new(2, 3, vec![user(7, "G")])));

        assert!(store.page().last_error.is_none());
        assert_eq!(store.page().current_page, 2);
        assert_eq!(ids(&store), vec![7]);
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut store = loaded_store(vec![user(1, "A")], 3);
        let first = store.begin_fetch(1).unwrap();
        let second = store.begin_fetch(2).unwrap();

        let outcome = store.complete_fetch(second, Ok(PageResponse::new(2, 3, vec![user(7, "G")])));
        assert_eq!(outcome, FetchOutcome::Loaded { page: 2, count: 1 });

        let outcome = store.complete_fetch(first, Ok(PageResponse::new(1, 3, vec![user(1, "A")])));
        assert!(matches!(outcome, FetchOutcome::Superseded { page: 1, .. }));
        assert_eq!(store.page().current_page, 2);
        assert_eq!(ids(&store), vec![7]);
    }

    #[test]
    fn stale_failure_does_not_touch_state() {
        let mut store = loaded_store(vec![user(1, "A")], 3);
        let first = store.begin_fetch(2).unwrap();
        let second = store.begin_fetch(3).unwrap();

        store.complete_fetch(first, Err(FetchError::network("late")));
        assert!(store.page().loading);
        assert!(store.page().last_error.is_none());

        store.complete_fetch(second, Ok(PageResponse::new(3, 3, vec![])));
        assert!(!store.page().loading);
        assert_eq!(store.page().current_page, 3);
    }

    #[test]
    fn optimistic_edit_then_commit() {
        let mut store = loaded_store(vec![user(1, "Ann")], 1);

        let mutation = store.begin_edit(1, UserPatch::new().first_name("Anna")).unwrap();
        assert_eq!(store.page().records[0].first_name, "Anna");
        assert_eq!(mutation.snapshot.first_name, "Ann");
        assert_eq!(store.mutation_state(1), Some(MutationState::Pending));

        let outcome = store.settle(1, Ok(())).unwrap();
        assert_eq!(outcome.state(), MutationState::Committed);
        assert_eq!(store.page().records[0].first_name, "Anna");
        assert!(store.pending(1).is_none());
    }

    #[test]
    fn optimistic_edit_rolls_back() {
        let mut store = loaded_store(vec![user(1, "Ann")], 1);
        store.begin_edit(1, UserPatch::new().first_name("Anna")).unwrap();

        let outcome = store
            .settle(1, Err(MutationError::NonSuccessStatus { status: 500 }))
            .unwrap();

        assert_eq!(outcome.state(), MutationState::RolledBack);
        assert!(matches!(outcome, MutationOutcome::RolledBack { restored: true, .. }));
        assert_eq!(store.page().records[0].first_name, "Ann");
    }

    #[test]
    fn edit_carries_completed_patch() {
        let mut store = loaded_store(vec![user(1, "Ann")], 1);
        let mutation = store.begin_edit(1, UserPatch::new().last_name("Lee")).unwrap();

        let patch = mutation.patch.unwrap();
        assert_eq!(patch.first_name.as_deref(), Some("Ann"));
        assert_eq!(patch.last_name.as_deref(), Some("Lee"));
        assert_eq!(patch.email.as_deref(), Some("ann@x.com"));
    }

    #[test]
    fn optimistic_delete_restores_original_index() {
        let mut store = loaded_store(vec![user(1, "A"), user(2, "B"), user(3, "C")], 1);

        let mutation = store.begin_delete(2).unwrap();
        assert_eq!(mutation.original_index, 1);
        assert_eq!(ids(&store), vec![1, 3]);

        store.settle(2, Err(MutationError::network("reset")));
        assert_eq!(ids(&store), vec![1, 2, 3]);
    }

    #[test]
    fn committed_delete_stays_removed() {
        let mut store = loaded_store(vec![user(1, "A"), user(2, "B")], 1);
        store.begin_delete(1).unwrap();
        store.settle(1, Ok(()));
        assert_eq!(ids(&store), vec![2]);
    }

    #[test]
    fn delete_rollback_index_is_clamped() {
        let mut store = loaded_store(vec![user(1, "A"), user(2, "B"), user(3, "C")], 1);
        store.begin_delete(3).unwrap();
        store.begin_delete(2).unwrap();

        store.settle(2, Ok(()));
        store.settle(3, Err(MutationError::network("reset")));

        assert_eq!(ids(&store), vec![1, 3]);
    }

    #[test]
    fn overlapping_deletes_restore_server_order() {
        let mut store = loaded_store(vec![user(1, "A"), user(2, "B"), user(3, "C")], 1);
        store.begin_delete(1).unwrap();
        store.begin_delete(2).unwrap();

        store.settle(1, Err(MutationError::network("reset")));
        store.settle(2, Err(MutationError::network("reset")));

        assert_eq!(ids(&store), vec![1, 2, 3]);
    }

    #[test]
    fn overlapping_deletes_restore_in_any_settle_order() {
        let mut store = loaded_store(vec![user(1, "A"), user(2, "B"), user(3, "C"), user(4, "D")], 1);
        store.begin_delete(3).unwrap();
        store.begin_delete(1).unwrap();
        store.begin_delete(4).unwrap();

        store.settle(4, Err(MutationError::network("reset")));
        store.settle(1, Err(MutationError::network("reset")));
        store.settle(3, Err(MutationError::network("reset")));

        assert_eq!(ids(&store), vec![1, 2, 3, 4]);
    }

    #[test]
    fn second_mutation_on_same_id_conflicts() {
        let mut store = loaded_store(vec![user(1, "Ann")], 1);
        store.begin_edit(1, UserPatch::new().first_name("Anna")).unwrap();

        let err = store
            .begin_edit(1, UserPatch::new().first_name("Annie"))
            .unwrap_err();
        assert_eq!(err, Error::Conflict(1));
        assert_eq!(store.pending(1).unwrap().snapshot.first_name, "Ann");
        assert_eq!(store.page().records[0].first_name, "Anna");

        assert_eq!(store.begin_delete(1).unwrap_err(), Error::Conflict(1));
    }

    #[test]
    fn delete_pending_then_delete_again_conflicts() {
        let mut store = loaded_store(vec![user(1, "A")], 1);
        store.begin_delete(1).unwrap();
        assert_eq!(store.begin_delete(1).unwrap_err(), Error::Conflict(1));
    }

    #[test]
    fn mutations_on_different_ids_overlap() {
        let mut store = loaded_store(vec![user(1, "A"), user(2, "B")], 1);
        store.begin_edit(1, UserPatch::new().first_name("Z")).unwrap();
        store.begin_delete(2).unwrap();
        assert_eq!(store.pending_count(), 2);
    }

    #[test]
    fn absent_target_is_not_found() {
        let mut store = loaded_store(vec![user(1, "A")], 1);
        assert_eq!(
            store.begin_edit(42, UserPatch::new()).unwrap_err(),
            Error::NotFound(42)
        );
        assert_eq!(store.begin_delete(42).unwrap_err(), Error::NotFound(42));
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn settle_without_pending_is_none() {
        let mut store = Store::new();
        assert!(store.settle(5, Ok(())).is_none());
    }

    #[test]
    fn rollback_after_reload_leaves_fresh_page() {
        let mut store = loaded_store(vec![user(1, "A"), user(2, "B")], 2);
        store.begin_delete(1).unwrap();

        let ticket = store.begin_fetch(2).unwrap();
        store.complete_fetch(ticket, Ok(PageResponse::new(2, 2, vec![user(9, "I")])));

        let outcome = store.settle(1, Err(MutationError::network("reset"))).unwrap();
        assert!(matches!(outcome, MutationOutcome::RolledBack { restored: false, .. }));
        assert_eq!(ids(&store), vec![9]);
    }

    #[test]
    fn filtered_view_follows_records_and_query() {
        let mut store = loaded_store(vec![user(1, "Ann"), user(2, "Bob")], 1);
        store.set_query("ann");
        assert_eq!(store.filtered().len(), 1);

        store.begin_edit(2, UserPatch::new().first_name("Annabel")).unwrap();
        assert_eq!(store.filtered().len(), 2);

        let ticket = store.begin_refresh();
        store.complete_fetch(ticket, Ok(PageResponse::new(1, 1, vec![])));
        assert!(store.filtered().is_empty());
    }

    #[test]
    fn snapshot_lists_pending_sorted() {
        let mut store = loaded_store(vec![user(1, "A"), user(2, "B"), user(3, "C")], 1);
        store.begin_delete(3).unwrap();
        store.begin_edit(1, UserPatch::new()).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.pending, vec![1, 3]);
        assert_eq!(snapshot.filtered.len(), 2);
        assert_eq!(snapshot.status, LoadStatus::Loaded);
    }
}
