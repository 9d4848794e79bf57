//! Page requests and total resolution.

use crate::config::SearchConfig;
use crate::error::Error;

use super::sort::SortSpec;

/// A window request: skip `offset` rows, return at most `limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    offset: u64,
    limit: u32,
    sort: SortSpec,
}

impl PageRequest {
    /// A request for `limit` rows starting at `offset`.
    ///
    /// A zero limit is rejected.
    pub fn new(offset: u64, limit: u32) -> Result<Self, Error> {
        if limit == 0 {
            return Err(Error::InvalidBound("page limit must be positive".to_string()));
        }
        Ok(Self {
            offset,
            limit,
            sort: SortSpec::unsorted(),
        })
    }

    /// A request for zero-based page `page` of `size` rows.
    pub fn of_page(page: u64, size: u32) -> Result<Self, Error> {
        let offset = page
            .checked_mul(u64::from(size))
            .ok_or_else(|| Error::InvalidBound(format!("page {page} of size {size} overflows")))?;
        Self::new(offset, size)
    }

    /// A request at `offset` for `limit` rows, falling back to the configured
    /// default size when the caller did not pick one.
    pub fn or_default(
        offset: u64,
        limit: Option<u32>,
        config: &SearchConfig,
    ) -> Result<Self, Error> {
        Self::new(offset, limit.unwrap_or(config.default_limit.max(1)))
    }

    /// Attach a sort specification.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }
}

/// How a paged search learns the total match count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingMode {
    /// Always issue a count query.
    Naive,
    /// Skip the count when the first page is already short.
    #[default]
    Optimized,
}

impl PagingMode {
    /// Whether a count query is needed after fetching `fetched` rows.
    ///
    /// Only a short first page proves the total by itself. A short page at a
    /// later offset says nothing about rows before it that no longer exist,
    /// so it is counted like any other.
    pub fn needs_count(self, offset: u64, limit: u32, fetched: usize) -> bool {
        match self {
            PagingMode::Naive => true,
            PagingMode::Optimized => !(offset == 0 && (fetched as u64) < u64::from(limit)),
        }
    }
}

/// Where a page total came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalSource {
    /// A count query ran.
    Counted,
    /// Derived from the fetched content.
    Derived,
}

/// Resolve the page total, running `count` only when `mode` requires it.
///
/// Count errors propagate; a page is never returned with a guessed total.
pub fn resolve_total<F>(
    mode: PagingMode,
    offset: u64,
    limit: u32,
    fetched: usize,
    count: F,
) -> Result<(u64, TotalSource), Error>
where
    F: FnOnce() -> Result<u64, Error>,
{
    if mode.needs_count(offset, limit, fetched) {
        Ok((count()?, TotalSource::Counted))
    } else {
        Ok((fetched as u64, TotalSource::Derived))
    }
}
