//! Search engine and store configuration.

use std::path::PathBuf;

/// Default page size when a caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest page size a single request may fetch.
pub const DEFAULT_MAX_LIMIT: u32 = 2000;

/// How criteria fragments are folded into one filter.
///
/// Both strategies produce the same filter for the same criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeStrategy {
    /// Accumulate present fragments one by one into a running builder.
    Incremental,
    /// Collect all fragments, drop absent ones, then AND-reduce.
    #[default]
    Batch,
}

/// Configuration for the search executor.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Page size used by [`PageRequest::or_default`](crate::search::PageRequest::or_default)
    /// when the caller does not pick one.
    pub default_limit: u32,

    /// Requested limits above this value are clamped to it.
    pub max_limit: u32,

    /// Predicate composition strategy.
    pub compose_strategy: ComposeStrategy,

    /// Reject criteria whose lower age bound exceeds the upper bound.
    pub reject_inverted_age_range: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            compose_strategy: ComposeStrategy::default(),
            reject_inverted_age_range: true,
        }
    }
}

impl SearchConfig {
    /// Set the default page size.
    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    /// Set the maximum page size.
    pub fn with_max_limit(mut self, limit: u32) -> Self {
        self.max_limit = limit.max(1);
        self
    }

    /// Set the composition strategy.
    pub fn with_compose_strategy(mut self, strategy: ComposeStrategy) -> Self {
        self.compose_strategy = strategy;
        self
    }

    /// Accept inverted age ranges; they simply match nothing.
    pub fn allow_inverted_age_range(mut self) -> Self {
        self.reject_inverted_age_range = false;
        self
    }
}

/// Configuration for the sled-backed store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the database directory.
    pub path: PathBuf,

    /// Page cache capacity in bytes.
    pub cache_capacity: u64,

    /// Flush interval in milliseconds. None means flush on every write.
    pub flush_every_ms: Option<u64>,

    /// Enable zstd compression.
    pub compression: bool,

    /// Temporary database (deleted on drop).
    pub temporary: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./roster_data"),
            cache_capacity: 64 * 1024 * 1024, // 64MB
            flush_every_ms: Some(500),
            compression: true,
            temporary: false,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a temporary in-memory configuration for testing.
    pub fn temporary() -> Self {
        Self {
            path: PathBuf::from(""),
            temporary: true,
            ..Default::default()
        }
    }

    /// Set the page cache capacity.
    pub fn with_cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Set the flush interval.
    pub fn with_flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }

    /// Convert to sled configuration.
    pub(crate) fn to_sled_config(&self) -> sled::Config {
        let mut config = sled::Config::new()
            .cache_capacity(self.cache_capacity)
            .use_compression(self.compression)
            .flush_every_ms(self.flush_every_ms);

        if self.temporary {
            config = config.temporary(true);
        } else {
            config = config.path(&self.path);
        }

        config
    }
}
