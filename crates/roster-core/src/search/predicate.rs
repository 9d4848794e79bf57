//! Predicate composition.
//!
//! Folds the fragments of a [`Criteria`] into one conjunctive [`Filter`].
//! Absent axes contribute nothing; no vacuous clause ever reaches a store.

use roster_proto::{Column, Filter, FilterExpr};

use super::criteria::Criteria;
use crate::config::ComposeStrategy;

/// A running conjunction that ignores absent clauses.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    filter: Filter,
}

impl FilterBuilder {
    /// Start from the universal filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// AND `clause` into the running filter if it is present.
    pub fn and(&mut self, clause: Option<FilterExpr>) -> &mut Self {
        if let Some(clause) = clause {
            self.filter = std::mem::take(&mut self.filter).and(clause);
        }
        self
    }

    /// Number of clauses accumulated so far.
    pub fn len(&self) -> usize {
        self.filter.len()
    }

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
    }

    /// Finish the conjunction.
    pub fn build(self) -> Filter {
        self.filter
    }
}

/// Turns criteria into filters.
pub struct PredicateComposer;

impl PredicateComposer {
    /// Compose with the given strategy.
    pub fn compose(criteria: &Criteria, strategy: ComposeStrategy) -> Filter {
        match strategy {
            ComposeStrategy::Incremental => Self::incremental(criteria),
            ComposeStrategy::Batch => Self::batch(criteria),
        }
    }

    /// Check each axis in turn and AND the present ones into a builder.
    pub fn incremental(criteria: &Criteria) -> Filter {
        let mut builder = FilterBuilder::new();
        builder
            .and(criteria.member_name().map(|n| FilterExpr::eq(Column::MemberName, n)))
            .and(criteria.team_name().map(|n| FilterExpr::eq(Column::TeamName, n)))
            .and(criteria.age_goe().map(|a| FilterExpr::ge(Column::MemberAge, a)))
            .and(criteria.age_loe().map(|a| FilterExpr::le(Column::MemberAge, a)));
        builder.build()
    }

    /// Materialize every fragment, drop the absent ones and AND-reduce.
    pub fn batch(criteria: &Criteria) -> Filter {
        criteria
            .fragments()
            .into_iter()
            .filter_map(|fragment| fragment.into_clause())
            .fold(Filter::all(), Filter::and)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_shapes() -> Vec<Criteria> {
        let mut shapes = Vec::new();
        for mask in 0u8..16 {
            let mut builder = Criteria::builder();
            if mask & 1 != 0 {
                builder = builder.member_name("member4");
            }
            if mask & 2 != 0 {
                builder = builder.team_name("teamB");
            }
            if mask & 4 != 0 {
                builder = builder.age_goe(35);
            }
            if mask & 8 != 0 {
                builder = builder.age_loe(40);
            }
            shapes.push(builder.build());
        }
        shapes
    }

    #[test]
    fn test_strategies_agree_on_every_shape() {
        for criteria in all_shapes() {
            assert_eq!(
                PredicateComposer::incremental(&criteria),
                PredicateComposer::batch(&criteria),
                "{criteria:?}"
            );
        }
    }

    #[test]
    fn test_clause_count_matches_present_axes() {
        for criteria in all_shapes() {
            let present = criteria.fragments().iter().filter(|f| f.is_present()).count();
            assert_eq!(PredicateComposer::batch(&criteria).len(), present);
        }
    }

    #[test]
    fn test_unconstrained_is_universal() {
        let filter = PredicateComposer::compose(&Criteria::unconstrained(), ComposeStrategy::Batch);
        assert!(filter.is_empty());

        let filter =
            PredicateComposer::compose(&Criteria::unconstrained(), ComposeStrategy::Incremental);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_blank_name_omitted() {
        let criteria = Criteria::builder().member_name("  ").age_loe(20).build();
        assert_eq!(
            PredicateComposer::batch(&criteria),
            Filter::from(FilterExpr::le(Column::MemberAge, 20))
        );
    }

    #[test]
    fn test_builder_skips_absent() {
        let mut builder = FilterBuilder::new();
        builder.and(None).and(Some(FilterExpr::eq(Column::TeamName, "teamA"))).and(None);
        assert_eq!(builder.len(), 1);
    }
}
