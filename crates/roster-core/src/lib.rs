//! Roster Core - member/team search, predicate composition and pagination.
//!
//! This crate provides the search engine and the stores it reads from.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod config;
pub mod error;
pub mod search;
pub mod store;

pub use config::{ComposeStrategy, SearchConfig, StoreConfig, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT};
pub use error::Error;
pub use search::{
    Criteria, PageRequest, PagingMode, PredicateComposer, ProjectedRow, SearchExecutor,
    SortResolver, SortSpec,
};
pub use store::{JoinedRow, MemberRecord, MemberStore, MemoryStore, SledStore, TeamRecord};

/// Re-export protocol types.
pub use roster_proto as proto;
