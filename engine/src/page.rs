//! Page documents and the loaded page state.

use crate::{FetchError, PageNumber, UserRecord};
use serde::{Deserialize, Serialize};

/// A page of users as returned by `GET /users?page=n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Page number echoed by the server
    #[serde(default)]
    pub page: i64,
    /// Page size used by the server
    #[serde(default)]
    pub per_page: i64,
    /// Total number of users across all pages
    #[serde(default)]
    pub total: i64,
    /// Number of pages; may be zero or negative from a misbehaving server
    pub total_pages: i64,
    /// Users on this page, in server order
    pub data: Vec<UserRecord>,
}

impl PageResponse {
    /// Create a response for `page` out of `total_pages`.
    pub fn new(page: i64, total_pages: i64, data: Vec<UserRecord>) -> Self {
        let per_page = data.len() as i64;
        Self {
            page,
            per_page,
            total: per_page.saturating_mul(total_pages.max(0)),
            total_pages,
            data,
        }
    }
}

/// Error details kept on the page after a failed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&FetchError> for ErrorInfo {
    fn from(err: &FetchError) -> Self {
        Self {
            message: err.to_string(),
            status: err.status(),
        }
    }
}

/// The currently loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    /// Records of exactly one page, in server order
    pub records: Vec<UserRecord>,
    /// Page the records belong to (>= 1)
    pub current_page: PageNumber,
    /// Number of pages known to the remote (>= 1)
    pub total_pages: PageNumber,
    /// Page size reported by the remote
    pub per_page: u32,
    /// Total users reported by the remote
    pub total_records: u64,
    /// Whether a page fetch is in flight
    pub loading: bool,
    /// Error from the most recent failed fetch
    pub last_error: Option<ErrorInfo>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            current_page: 1,
            total_pages: 1,
            per_page: 0,
            total_records: 0,
            loading: false,
            last_error: None,
        }
    }
}

impl PageState {
    /// Build the state for `page` from a server response.
    ///
    /// A non-positive `total_pages` is treated as a single empty page.
    pub fn from_response(page: PageNumber, response: PageResponse) -> Self {
        let (total_pages, records) = if response.total_pages <= 0 {
            (1, Vec::new())
        } else {
            let total_pages = PageNumber::try_from(response.total_pages).unwrap_or(PageNumber::MAX);
            (total_pages, response.data)
        };

        Self {
            records,
            current_page: page.max(1),
            total_pages,
            per_page: u32::try_from(response.per_page).unwrap_or(0),
            total_records: u64::try_from(response.total).unwrap_or(0),
            loading: false,
            last_error: None,
        }
    }

    /// Check whether `page` is inside `[1, total_pages]`.
    pub fn contains_page(&self, page: PageNumber) -> bool {
        (1..=self.total_pages).contains(&page)
    }

    /// Index of the record with `id`, if loaded.
    pub fn position(&self, id: crate::UserId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}
