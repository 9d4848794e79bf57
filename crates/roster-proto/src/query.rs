//! Read query IR handed from the search engine to a store.
//!
//! A [`ReadQuery`] always targets the left join of members and teams. It
//! carries a conjunctive [`Filter`], an ordered list of [`OrderSpec`]s and an
//! optional offset/limit [`Window`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A column of the member/team join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    /// Member primary key.
    MemberId,
    /// Member display name.
    MemberName,
    /// Member age.
    MemberAge,
    /// Team primary key, null for members without a team.
    TeamId,
    /// Team name, null for members without a team.
    TeamName,
}

impl Column {
    /// All join columns in projection order.
    pub const ALL: [Column; 5] = [
        Column::MemberId,
        Column::MemberName,
        Column::MemberAge,
        Column::TeamId,
        Column::TeamName,
    ];

    /// Qualified column name (`member.name`, `team.id`, ...).
    pub fn qualified_name(self) -> &'static str {
        match self {
            Column::MemberId => "member.id",
            Column::MemberName => "member.name",
            Column::MemberAge => "member.age",
            Column::TeamId => "team.id",
            Column::TeamName => "team.name",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

/// A single-column comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// Column equals value.
    Eq { column: Column, value: Value },
    /// Column not equals value.
    Ne { column: Column, value: Value },
    /// Column less than value.
    Lt { column: Column, value: Value },
    /// Column less than or equal to value.
    Le { column: Column, value: Value },
    /// Column greater than value.
    Gt { column: Column, value: Value },
    /// Column greater than or equal to value.
    Ge { column: Column, value: Value },
    /// Column is null.
    IsNull { column: Column },
    /// Column is not null.
    IsNotNull { column: Column },
}

impl FilterExpr {
    /// Create an equality filter.
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        FilterExpr::Eq {
            column,
            value: value.into(),
        }
    }

    /// Create a not-equal filter.
    pub fn ne(column: Column, value: impl Into<Value>) -> Self {
        FilterExpr::Ne {
            column,
            value: value.into(),
        }
    }

    /// Create a less-than filter.
    pub fn lt(column: Column, value: impl Into<Value>) -> Self {
        FilterExpr::Lt {
            column,
            value: value.into(),
        }
    }

    /// Create a less-than-or-equal filter.
    pub fn le(column: Column, value: impl Into<Value>) -> Self {
        FilterExpr::Le {
            column,
            value: value.into(),
        }
    }

    /// Create a greater-than filter.
    pub fn gt(column: Column, value: impl Into<Value>) -> Self {
        FilterExpr::Gt {
            column,
            value: value.into(),
        }
    }

    /// Create a greater-than-or-equal filter.
    pub fn ge(column: Column, value: impl Into<Value>) -> Self {
        FilterExpr::Ge {
            column,
            value: value.into(),
        }
    }

    /// Create an IS NULL filter.
    pub fn is_null(column: Column) -> Self {
        FilterExpr::IsNull { column }
    }

    /// Create an IS NOT NULL filter.
    pub fn is_not_null(column: Column) -> Self {
        FilterExpr::IsNotNull { column }
    }

    /// The column this clause constrains.
    pub fn column(&self) -> Column {
        match self {
            FilterExpr::Eq { column, .. }
            | FilterExpr::Ne { column, .. }
            | FilterExpr::Lt { column, .. }
            | FilterExpr::Le { column, .. }
            | FilterExpr::Gt { column, .. }
            | FilterExpr::Ge { column, .. }
            | FilterExpr::IsNull { column }
            | FilterExpr::IsNotNull { column } => *column,
        }
    }
}

/// A conjunction of filter clauses.
///
/// The empty filter selects every row. Clauses are never vacuous: an axis
/// without a constraint contributes no clause at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    clauses: Vec<FilterExpr>,
}

impl Filter {
    /// The universal filter.
    pub fn all() -> Self {
        Self::default()
    }

    /// AND a clause into this filter.
    pub fn and(mut self, clause: FilterExpr) -> Self {
        self.clauses.push(clause);
        self
    }

    /// AND an inclusive range on `column` into this filter.
    pub fn between(self, column: Column, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.and(FilterExpr::ge(column, low))
            .and(FilterExpr::le(column, high))
    }

    /// The clauses of this conjunction.
    pub fn clauses(&self) -> &[FilterExpr] {
        &self.clauses
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// True when this filter selects every row.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl FromIterator<FilterExpr> for Filter {
    fn from_iter<I: IntoIterator<Item = FilterExpr>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl From<FilterExpr> for Filter {
    fn from(clause: FilterExpr) -> Self {
        Self {
            clauses: vec![clause],
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// Where null values go, regardless of direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullOrdering {
    /// Nulls before every value.
    First,
    /// Nulls after every value.
    Last,
}

/// Order specification against a join column.
///
/// Without an explicit [`NullOrdering`], null sorts as the smallest value:
/// first when ascending, last when descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    /// Column to order by.
    pub column: Column,
    /// Sort direction.
    pub direction: OrderDirection,
    /// Explicit null placement.
    #[serde(default)]
    pub nulls: Option<NullOrdering>,
}

impl OrderSpec {
    /// Create an ascending order spec.
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            direction: OrderDirection::Asc,
            nulls: None,
        }
    }

    /// Create a descending order spec.
    pub fn desc(column: Column) -> Self {
        Self {
            column,
            direction: OrderDirection::Desc,
            nulls: None,
        }
    }

    /// Place nulls explicitly.
    pub fn with_nulls(mut self, nulls: NullOrdering) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        };
        write!(f, "{} {direction}", self.column)?;
        match self.nulls {
            Some(NullOrdering::First) => f.write_str(" nulls first"),
            Some(NullOrdering::Last) => f.write_str(" nulls last"),
            None => Ok(()),
        }
    }
}

/// Zero-based offset/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Number of rows to skip.
    pub offset: u64,
    /// Maximum number of rows to return.
    pub limit: u32,
}

impl Window {
    /// Create a window.
    pub fn new(offset: u64, limit: u32) -> Self {
        Self { offset, limit }
    }
}

/// A filtered, optionally ordered and windowed read of the member/team join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadQuery {
    /// Conjunctive filter.
    pub filter: Filter,
    /// Ordering; the first entry is the primary key.
    pub order_by: Vec<OrderSpec>,
    /// Offset/limit window, `None` for an unbounded read.
    pub window: Option<Window>,
}

impl ReadQuery {
    /// Create an unbounded, unordered read with the given filter.
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            order_by: vec![],
            window: None,
        }
    }

    /// Add ordering for this query.
    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.order_by.push(order);
        self
    }

    /// Replace the ordering for this query.
    pub fn with_orders(mut self, orders: Vec<OrderSpec>) -> Self {
        self.order_by = orders;
        self
    }

    /// Set the offset/limit window.
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }
}
