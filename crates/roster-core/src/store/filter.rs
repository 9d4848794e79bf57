//! Filter evaluation for store scans.
//!
//! This module provides the `FilterEvaluator` that evaluates filter clauses
//! against joined rows.

use roster_proto::{Filter, FilterExpr, Value};

use super::JoinedRow;

/// Evaluates filters against joined rows.
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Evaluate a conjunctive filter. The empty filter matches every row.
    pub fn matches(filter: &Filter, row: &JoinedRow) -> bool {
        filter.clauses().iter().all(|clause| Self::evaluate(clause, row))
    }

    /// Evaluate a single clause against a row.
    ///
    /// Comparisons against a null column never match, so a member without a
    /// team fails every comparison on team columns.
    pub fn evaluate(clause: &FilterExpr, row: &JoinedRow) -> bool {
        let field = row.value(clause.column());
        match clause {
            FilterExpr::Eq { value, .. } => field.sql_eq(value),
            FilterExpr::Ne { value, .. } => Self::compare(&field, value, |ord| ord.is_ne()),
            FilterExpr::Lt { value, .. } => Self::compare(&field, value, |ord| ord.is_lt()),
            FilterExpr::Le { value, .. } => Self::compare(&field, value, |ord| ord.is_le()),
            FilterExpr::Gt { value, .. } => Self::compare(&field, value, |ord| ord.is_gt()),
            FilterExpr::Ge { value, .. } => Self::compare(&field, value, |ord| ord.is_ge()),
            FilterExpr::IsNull { .. } => field.is_null(),
            FilterExpr::IsNotNull { .. } => !field.is_null(),
        }
    }

    fn compare<F>(field: &Value, value: &Value, accept: F) -> bool
    where
        F: FnOnce(std::cmp::Ordering) -> bool,
    {
        field.sql_cmp(value).map(accept).unwrap_or(false)
    }
}
