//! Roster protocol types.
//!
//! This crate defines the data exchanged between the roster search engine and
//! the stores it reads from.
//!
//! # Modules
//!
//! - [`value`] - Runtime values used in filter clauses and joined rows
//! - [`query`] - Read query IR: columns, filters, ordering and windows
//! - [`result`] - Paged results

pub mod query;
pub mod result;
pub mod value;

// Re-export commonly used types at crate root
pub use query::{
    Column, Filter, FilterExpr, NullOrdering, OrderDirection, OrderSpec, ReadQuery, Window,
};
pub use result::Page;
pub use value::Value;
