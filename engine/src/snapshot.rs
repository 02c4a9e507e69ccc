//! Read-only state snapshots for the presentation layer.
//!
//! Adapters never get a reference into the [`Store`](crate::Store); they get a
//! [`StateSnapshot`] copy which is serializable to JSON.

use crate::{LoadStatus, PageState, SearchQuery, UserId, UserRecord};
use serde::{Deserialize, Serialize};

/// A copy of everything an adapter needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// The loaded page
    pub page: PageState,
    /// Page load state
    pub status: LoadStatus,
    /// Active search text
    pub query: SearchQuery,
    /// Records of the page matching `query`
    pub filtered: Vec<UserRecord>,
    /// Users with a mutation in flight, ascending
    pub pending: Vec<UserId>,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        crate::Store::new().snapshot()
    }
}

impl StateSnapshot {
    /// Check whether a mutation for `id` is in flight.
    pub fn is_pending(&self, id: UserId) -> bool {
        self.pending.binary_search(&id).is_ok()
    }

    /// Check whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.page.current_page > 1
    }

    /// Check whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.page.current_page < self.page.total_pages
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
