//! Search criteria and their per-axis predicate fragments.

use roster_proto::{Column, FilterExpr};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One independently optional filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Exact member name.
    MemberName,
    /// Exact team name.
    TeamName,
    /// Inclusive lower bound on age.
    AgeLowerBound,
    /// Inclusive upper bound on age.
    AgeUpperBound,
}

impl Axis {
    /// Every axis, in composition order.
    pub const ALL: [Axis; 4] = [
        Axis::MemberName,
        Axis::TeamName,
        Axis::AgeLowerBound,
        Axis::AgeUpperBound,
    ];
}

/// The condition contributed by one axis, or its explicit absence.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    axis: Axis,
    clause: Option<FilterExpr>,
}

impl Fragment {
    /// The axis this fragment belongs to.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The clause, if the axis is constrained.
    pub fn clause(&self) -> Option<&FilterExpr> {
        self.clause.as_ref()
    }

    /// Whether the axis is constrained.
    pub fn is_present(&self) -> bool {
        self.clause.is_some()
    }

    /// Take the clause out of the fragment.
    pub fn into_clause(self) -> Option<FilterExpr> {
        self.clause
    }
}

/// Filter inputs for a member search.
///
/// Every field is optional. Blank strings count as absent. Criteria are
/// immutable once built; use [`Criteria::builder`] to construct them. The
/// serde form uses the request parameter names `memberName`, `teamName`,
/// `ageGoe` and `ageLoe`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    member_name: Option<String>,
    team_name: Option<String>,
    age_goe: Option<i32>,
    age_loe: Option<i32>,
}

impl Criteria {
    /// Criteria with no constraint on any axis.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Start building criteria.
    pub fn builder() -> CriteriaBuilder {
        CriteriaBuilder::default()
    }

    /// Member name, unless absent or blank.
    pub fn member_name(&self) -> Option<&str> {
        non_blank(self.member_name.as_deref())
    }

    /// Team name, unless absent or blank.
    pub fn team_name(&self) -> Option<&str> {
        non_blank(self.team_name.as_deref())
    }

    /// Inclusive lower age bound.
    pub fn age_goe(&self) -> Option<i32> {
        self.age_goe
    }

    /// Inclusive upper age bound.
    pub fn age_loe(&self) -> Option<i32> {
        self.age_loe
    }

    /// Whether no axis is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.fragments().iter().all(|f| !f.is_present())
    }

    /// The fragment contributed by a single axis.
    pub fn fragment(&self, axis: Axis) -> Fragment {
        let clause = match axis {
            Axis::MemberName => self
                .member_name()
                .map(|name| FilterExpr::eq(Column::MemberName, name)),
            Axis::TeamName => self
                .team_name()
                .map(|name| FilterExpr::eq(Column::TeamName, name)),
            Axis::AgeLowerBound => self.age_goe.map(|age| FilterExpr::ge(Column::MemberAge, age)),
            Axis::AgeUpperBound => self.age_loe.map(|age| FilterExpr::le(Column::MemberAge, age)),
        };
        Fragment { axis, clause }
    }

    /// One fragment per axis, in [`Axis::ALL`] order.
    pub fn fragments(&self) -> [Fragment; 4] {
        Axis::ALL.map(|axis| self.fragment(axis))
    }

    /// Reject a lower age bound greater than the upper bound.
    pub fn check_age_range(&self) -> Result<(), Error> {
        match (self.age_goe, self.age_loe) {
            (Some(low), Some(high)) if low > high => Err(Error::InvalidBound(format!(
                "age lower bound {low} exceeds upper bound {high}"
            ))),
            _ => Ok(()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Builder for [`Criteria`]. Setter order does not matter.
#[derive(Debug, Clone, Default)]
pub struct CriteriaBuilder {
    criteria: Criteria,
}

impl CriteriaBuilder {
    /// Constrain the member name.
    pub fn member_name(mut self, name: impl Into<String>) -> Self {
        self.criteria.member_name = Some(name.into());
        self
    }

    /// Constrain the team name.
    pub fn team_name(mut self, name: impl Into<String>) -> Self {
        self.criteria.team_name = Some(name.into());
        self
    }

    /// Set the inclusive lower age bound.
    pub fn age_goe(mut self, age: i32) -> Self {
        self.criteria.age_goe = Some(age);
        self
    }

    /// Set the inclusive upper age bound.
    pub fn age_loe(mut self, age: i32) -> Self {
        self.criteria.age_loe = Some(age);
        self
    }

    /// Finish building.
    pub fn build(self) -> Criteria {
        self.criteria
    }
}
