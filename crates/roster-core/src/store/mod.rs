//! Store access for the search engine.
//!
//! The engine never touches storage directly. It hands a [`ReadQuery`] or a
//! [`Filter`] to a [`MemberStore`] and receives raw [`JoinedRow`]s or a count.
//! Two stores ship with the crate: [`MemoryStore`] for embedding and tests and
//! [`SledStore`] for on-disk data.

mod filter;
mod memory;
mod record;
mod scan;
mod sled_store;

pub use filter::FilterEvaluator;
pub use memory::MemoryStore;
pub use record::{MemberRecord, TeamRecord};
pub use scan::{count_matching, execute_read};
pub use sled_store::SledStore;

use roster_proto::{Column, Filter, ReadQuery, Value};

use crate::error::Error;

/// Sortable property names and the join columns they resolve to.
///
/// Member properties use their entity names; team properties are reached
/// through the `team.` association path. The projected field names are
/// accepted as aliases.
pub const SORTABLE_PROPERTIES: &[(&str, Column)] = &[
    ("id", Column::MemberId),
    ("name", Column::MemberName),
    ("age", Column::MemberAge),
    ("team.id", Column::TeamId),
    ("team.name", Column::TeamName),
    ("memberId", Column::MemberId),
    ("memberName", Column::MemberName),
    ("teamId", Column::TeamId),
    ("teamName", Column::TeamName),
];

/// A raw row of the member/team left join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    /// The member side, always present.
    pub member: MemberRecord,
    /// The team side, `None` for members without a team.
    pub team: Option<TeamRecord>,
}

impl JoinedRow {
    /// Read a join column. Team columns are null when the member has no team.
    pub fn value(&self, column: Column) -> Value {
        match column {
            Column::MemberId => Value::from(self.member.id),
            Column::MemberName => Value::String(self.member.name.clone()),
            Column::MemberAge => Value::Int32(self.member.age),
            Column::TeamId => self
                .team
                .as_ref()
                .map_or(Value::Null, |t| Value::from(t.id)),
            Column::TeamName => self
                .team
                .as_ref()
                .map_or(Value::Null, |t| Value::String(t.name.clone())),
        }
    }
}

/// Read access to the member/team join.
///
/// Implementations own consistency and retry policy. The engine issues each
/// call at most once per request and treats any error as fatal for that
/// request.
pub trait MemberStore {
    /// Run a filtered, ordered, windowed read of the join.
    fn fetch(&self, query: &ReadQuery) -> Result<Vec<JoinedRow>, Error>;

    /// Count the join rows matching `filter`.
    fn count(&self, filter: &Filter) -> Result<u64, Error>;

    /// Property names this store can sort by, with their join columns.
    fn sortable_columns(&self) -> Vec<(String, Column)> {
        SORTABLE_PROPERTIES
            .iter()
            .map(|(name, column)| (name.to_string(), *column))
            .collect()
    }
}

impl<S: MemberStore + ?Sized> MemberStore for &S {
    fn fetch(&self, query: &ReadQuery) -> Result<Vec<JoinedRow>, Error> {
        (**self).fetch(query)
    }

    fn count(&self, filter: &Filter) -> Result<u64, Error> {
        (**self).count(filter)
    }

    fn sortable_columns(&self) -> Vec<(String, Column)> {
        (**self).sortable_columns()
    }
}

impl<S: MemberStore + ?Sized> MemberStore for std::sync::Arc<S> {
    fn fetch(&self, query: &ReadQuery) -> Result<Vec<JoinedRow>, Error> {
        (**self).fetch(query)
    }

    fn count(&self, filter: &Filter) -> Result<u64, Error> {
        (**self).count(filter)
    }

    fn sortable_columns(&self) -> Vec<(String, Column)> {
        (**self).sortable_columns()
    }
}
