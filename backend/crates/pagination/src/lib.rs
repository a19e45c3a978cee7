//! Limit/offset pagination primitives shared by backend endpoints.
//!
//! The record store lists rows by `limit`/`offset` with an exact total
//! count. [`PageRequest`] validates the bounds once at construction so HTTP
//! handlers and store adapters agree on what a legal page looks like, and
//! [`Page`] is the envelope every listing endpoint returns.

use serde::{Deserialize, Serialize};

/// Page size applied when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 50;

/// Upper bound on the page size a single request may ask for.
pub const MAX_LIMIT: u32 = 200;

/// Rejected [`PageRequest`] parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// A zero limit would return an empty page forever.
    #[error("page limit must be at least 1")]
    LimitZero,
    /// The requested limit exceeds [`MAX_LIMIT`].
    #[error("page limit {limit} exceeds the maximum of {MAX_LIMIT}")]
    LimitTooLarge {
        /// The limit the caller asked for.
        limit: u32,
    },
}

/// A validated limit/offset window over a listing.
///
/// Offsets past the end of the listing are legal; stores answer them with
/// an empty page rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    limit: u32,
    offset: u32,
}

impl PageRequest {
    /// Validates and builds a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `limit` is zero or exceeds
    /// [`MAX_LIMIT`].
    pub const fn new(limit: u32, offset: u32) -> Result<Self, PageRequestError> {
        if limit == 0 {
            return Err(PageRequestError::LimitZero);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge { limit });
        }
        Ok(Self { limit, offset })
    }

    /// The first page with the default limit.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows skipped before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// The window immediately after this one, saturating at `u32::MAX`.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of results plus the exact total across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The rows inside the requested window.
    pub items: Vec<T>,
    /// Exact number of rows in the whole listing.
    pub total: u64,
}

impl<T> Page<T> {
    /// Wraps items and the exact listing total.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// An empty page over a listing of known size.
    #[must_use]
    pub const fn empty(total: u64) -> Self {
        Self {
            items: Vec::new(),
            total,
        }
    }

    /// Number of items inside this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps the items while keeping the total intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// Whether rows remain beyond the window that produced this page.
    #[must_use]
    pub fn has_more(&self, request: &PageRequest) -> bool {
        let seen = u64::from(request.offset()).saturating_add(self.items.len() as u64);
        seen < self.total
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the pagination primitives.

    use rstest::rstest;

    use super::{MAX_LIMIT, Page, PageRequest, PageRequestError};

    #[rstest]
    #[case::minimum(1, 0)]
    #[case::typical(50, 100)]
    #[case::maximum(MAX_LIMIT, 0)]
    fn accepts_legal_windows(#[case] limit: u32, #[case] offset: u32) {
        let request = match PageRequest::new(limit, offset) {
            Ok(request) => request,
            Err(error) => panic!("window should be legal: {error}"),
        };
        assert_eq!(request.limit(), limit);
        assert_eq!(request.offset(), offset);
    }

    #[test]
    fn rejects_zero_limit() {
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(PageRequestError::LimitZero)
        ));
    }

    #[test]
    fn rejects_oversized_limit() {
        assert!(matches!(
            PageRequest::new(MAX_LIMIT + 1, 0),
            Err(PageRequestError::LimitTooLarge { limit }) if limit == MAX_LIMIT + 1
        ));
    }

    #[test]
    fn next_window_advances_by_limit() {
        let Ok(request) = PageRequest::new(2, 2) else {
            panic!("window should be legal");
        };
        let next = request.next();
        assert_eq!(next.limit(), 2);
        assert_eq!(next.offset(), 4);
    }

    #[test]
    fn next_window_saturates_instead_of_wrapping() {
        let Ok(request) = PageRequest::new(MAX_LIMIT, u32::MAX - 1) else {
            panic!("window should be legal");
        };
        assert_eq!(request.next().offset(), u32::MAX);
    }

    #[test]
    fn page_reports_remaining_rows() {
        let Ok(request) = PageRequest::new(2, 2) else {
            panic!("window should be legal");
        };
        let page = Page::new(vec!["c", "d"], 5);
        assert!(page.has_more(&request));
        let last = Page::new(vec!["e"], 5);
        assert!(!last.has_more(&request.next()));
    }

    #[test]
    fn empty_page_keeps_the_total() {
        let page: Page<u8> = Page::empty(7);
        assert!(page.is_empty());
        assert_eq!(page.len(), 0);
        assert_eq!(page.total, 7);
    }

    #[test]
    fn map_preserves_total_and_order() {
        let page = Page::new(vec![1_u8, 2, 3], 9).map(|n| n * 2);
        assert_eq!(page.items, vec![2, 4, 6]);
        assert_eq!(page.total, 9);
    }
}
