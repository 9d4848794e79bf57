//! Core error types.

use thiserror::Error;

/// Search engine and store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A page bound or filter range is unusable.
    #[error("invalid bound: {0}")]
    InvalidBound(String),

    /// A sort term names a property with no sortable column.
    #[error("unresolved sort field: {0}")]
    UnresolvedSortField(String),

    /// A textual sort specification could not be parsed.
    #[error("invalid sort specification: {0}")]
    InvalidSortSpec(String),

    /// The store could not serve the read.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}
