//! Page of search results.

use serde::{Deserialize, Serialize};

/// One page of an ordered result sequence.
///
/// `total` is the number of rows matching the filter across all pages. It is
/// either computed by a store-side count or, when the page is provably the
/// last one, derived locally from the content length. Content and count may
/// come from different store snapshots, so `offset + content.len() == total`
/// is not guaranteed in general.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows of this page, in query order.
    pub content: Vec<T>,
    /// Zero-based offset of the first row.
    pub offset: u64,
    /// Requested page size, always greater than zero.
    pub limit: u32,
    /// Total number of matching rows.
    pub total: u64,
}

impl<T> Page<T> {
    /// Create a page.
    pub fn new(content: Vec<T>, offset: u64, limit: u32, total: u64) -> Self {
        Self {
            content,
            offset,
            limit,
            total,
        }
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Zero-based page number, assuming pages are aligned on `limit`.
    pub fn page_number(&self) -> u64 {
        self.offset / u64::from(self.limit.max(1))
    }

    /// Number of pages needed to hold `total` rows.
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit.max(1)))
    }

    /// Whether rows exist beyond this page.
    pub fn has_next(&self) -> bool {
        self.offset + (self.content.len() as u64) < self.total
    }

    /// Whether rows exist before this page.
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// Whether this is the last page.
    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Convert the rows of this page, keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            offset: self.offset,
            limit: self.limit,
            total: self.total,
        }
    }
}
