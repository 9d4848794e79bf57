//! Dynamic member search.
//!
//! A search starts from [`Criteria`], whose present axes become one
//! conjunctive filter through the [`PredicateComposer`]. Caller-named sort
//! properties go through the [`SortResolver`]. The [`SearchExecutor`] runs
//! the result against a [`MemberStore`](crate::store::MemberStore) and
//! projects rows into [`ProjectedRow`]s, either as a plain list or as a
//! [`Page`](roster_proto::Page) with a total.

mod criteria;
mod executor;
mod pagination;
mod predicate;
mod projection;
mod sort;

pub use criteria::{Axis, Criteria, CriteriaBuilder, Fragment};
pub use executor::SearchExecutor;
pub use pagination::{resolve_total, PageRequest, PagingMode, TotalSource};
pub use predicate::{FilterBuilder, PredicateComposer};
pub use projection::ProjectedRow;
pub use sort::{SortResolver, SortSpec, SortTerm};
