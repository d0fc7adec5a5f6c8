//! List-view state shared by every resource context.
//!
//! Each context owns a [`ResourceStore`]: the current page of items, the
//! server-authoritative pagination, a loading flag, and the last error.
//! A fetch replaces items and pagination wholesale on success and leaves
//! the previous items untouched on failure.
//!
//! Fetches are stamped with a generation so an older in-flight response
//! can never overwrite a newer one: `begin_fetch` hands out a ticket and
//! only the ticket matching the latest generation may commit.

use serde::{Deserialize, Serialize};

/// Default page size the console requests when none is configured.
pub const DEFAULT_LIMIT: u32 = 10;

/// Canonical pagination. The backend owns `total`; the client only does
/// display math on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            total: 0,
        }
    }
}

impl Pagination {
    /// 1-based inclusive "Showing X-Y of Z" range; (0, 0) when empty.
    pub fn showing(&self) -> (u64, u64) {
        if self.total == 0 || self.limit == 0 {
            return (0, 0);
        }
        let start = (self.page as u64 - 1) * self.limit as u64 + 1;
        if start > self.total {
            return (0, 0);
        }
        let end = (self.page as u64 * self.limit as u64).min(self.total);
        (start, end)
    }

    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit as u64) as u32
    }
}

/// Pagination metadata as the backend actually sends it. Two shapes are
/// in the wild depending on the endpoint; both normalize to
/// [`Pagination`] at the decode boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PageMeta {
    Plain {
        page: u32,
        limit: u32,
        total: u64,
    },
    Counted {
        #[serde(rename = "currentPage")]
        current_page: u32,
        #[serde(rename = "totalPages")]
        total_pages: u32,
        #[serde(rename = "totalRecords")]
        total_records: u64,
    },
}

impl PageMeta {
    /// The counted shape omits `limit`, so the limit the caller asked
    /// for stands in.
    pub fn normalize(self, requested_limit: u32) -> Pagination {
        match self {
            PageMeta::Plain { page, limit, total } => Pagination { page, limit, total },
            PageMeta::Counted {
                current_page,
                total_pages: _,
                total_records,
            } => Pagination {
                page: current_page,
                limit: requested_limit,
                total: total_records,
            },
        }
    }
}

/// Proof that a fetch was the latest one issued when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug)]
pub struct ResourceStore<T> {
    items: Vec<T>,
    pagination: Pagination,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl<T> ResourceStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a fetch: sets loading, clears the previous error, bumps the
    /// generation. The returned ticket must accompany the result.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.loading = true;
        self.error = None;
        self.generation += 1;
        FetchTicket(self.generation)
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Commit a successful fetch, replacing items and pagination
    /// wholesale. Returns false (and changes nothing) for a stale ticket.
    pub fn complete(&mut self, ticket: FetchTicket, items: Vec<T>, pagination: Pagination) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                stale = ticket.0,
                current = self.generation,
                "dropping stale fetch response"
            );
            return false;
        }
        self.items = items;
        self.pagination = pagination;
        self.error = None;
        self.loading = false;
        true
    }

    /// Record a failed fetch. The previous items stay as they were.
    pub fn fail(&mut self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.error = Some(message.into());
        self.loading = false;
        true
    }

    /// Record a mutation error. Mutations also propagate the error to the
    /// caller; this keeps it visible in the shared state as well.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_showing_range() {
        let p = Pagination {
            page: 2,
            limit: 10,
            total: 25,
        };
        assert_eq!(p.showing(), (11, 20));
        assert_eq!(p.total_pages(), 3);
    }

    #[test]
    fn test_showing_range_last_partial_page() {
        let p = Pagination {
            page: 3,
            limit: 10,
            total: 25,
        };
        assert_eq!(p.showing(), (21, 25));
    }

    #[test]
    fn test_showing_range_empty() {
        let p = Pagination {
            page: 1,
            limit: 10,
            total: 0,
        };
        assert_eq!(p.showing(), (0, 0));
    }

    #[test]
    fn test_page_meta_plain() {
        let meta: PageMeta =
            serde_json::from_str(r#"{"page": 2, "limit": 10, "total": 25}"#).unwrap();
        assert_eq!(
            meta.normalize(50),
            Pagination {
                page: 2,
                limit: 10,
                total: 25
            }
        );
    }

    #[test]
    fn test_page_meta_counted_takes_requested_limit() {
        let meta: PageMeta =
            serde_json::from_str(r#"{"currentPage": 3, "totalPages": 5, "totalRecords": 42}"#)
                .unwrap();
        assert_eq!(
            meta.normalize(10),
            Pagination {
                page: 3,
                limit: 10,
                total: 42
            }
        );
    }

    #[test]
    fn test_successful_fetch_replaces_state() {
        let mut store: ResourceStore<&str> = ResourceStore::new();
        store.record_error("old error");

        let ticket = store.begin_fetch();
        assert!(store.loading());
        assert!(store.error().is_none());

        let committed = store.complete(
            ticket,
            vec!["a", "b"],
            Pagination {
                page: 1,
                limit: 10,
                total: 2,
            },
        );
        assert!(committed);
        assert_eq!(store.items(), &["a", "b"]);
        assert_eq!(store.pagination().total, 2);
        assert!(!store.loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_items() {
        let mut store: ResourceStore<&str> = ResourceStore::new();
        let ticket = store.begin_fetch();
        store.complete(
            ticket,
            vec!["a", "b"],
            Pagination {
                page: 1,
                limit: 10,
                total: 2,
            },
        );

        let ticket = store.begin_fetch();
        assert!(store.fail(ticket, "backend down"));
        assert_eq!(store.items(), &["a", "b"]);
        assert_eq!(store.error(), Some("backend down"));
        assert!(!store.loading());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut store: ResourceStore<&str> = ResourceStore::new();
        let first = store.begin_fetch();
        let second = store.begin_fetch();

        // The newer fetch resolves first.
        assert!(store.complete(
            second,
            vec!["new"],
            Pagination {
                page: 2,
                limit: 10,
                total: 11,
            },
        ));

        // The older response arrives late and must not win.
        assert!(!store.complete(
            first,
            vec!["old"],
            Pagination {
                page: 1,
                limit: 10,
                total: 11,
            },
        ));
        assert_eq!(store.items(), &["new"]);
        assert_eq!(store.pagination().page, 2);
    }

    #[test]
    fn test_stale_failure_does_not_clobber_newer_success() {
        let mut store: ResourceStore<&str> = ResourceStore::new();
        let first = store.begin_fetch();
        let second = store.begin_fetch();

        store.complete(
            second,
            vec!["new"],
            Pagination {
                page: 1,
                limit: 10,
                total: 1,
            },
        );
        assert!(!store.fail(first, "timed out"));
        assert!(store.error().is_none());
    }
}
