//! Dynamic sort resolution.
//!
//! Callers name sort properties as strings. The [`SortResolver`] maps them to
//! join columns through a lookup table built once per executor, and refuses
//! the whole request when any name is unknown.

use std::collections::HashMap;

use roster_proto::{Column, NullOrdering, OrderSpec};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::store::{MemberStore, SORTABLE_PROPERTIES};

/// One requested sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortTerm {
    /// Property name as supplied by the caller.
    pub property: String,
    /// Ascending when true.
    pub ascending: bool,
    /// Where rows with a null value go; `None` keeps the store default.
    #[serde(default)]
    pub nulls: Option<NullOrdering>,
}

/// Ordered sort keys; the first term is the primary key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    terms: Vec<SortTerm>,
}

impl SortSpec {
    /// An empty specification (store-native order).
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Append an ascending term.
    pub fn asc(mut self, property: impl Into<String>) -> Self {
        self.terms.push(SortTerm {
            property: property.into(),
            ascending: true,
            nulls: None,
        });
        self
    }

    /// Append a descending term.
    pub fn desc(mut self, property: impl Into<String>) -> Self {
        self.terms.push(SortTerm {
            property: property.into(),
            ascending: false,
            nulls: None,
        });
        self
    }

    /// Place nulls before non-null values for the last appended term.
    pub fn nulls_first(self) -> Self {
        self.with_nulls(NullOrdering::First)
    }

    /// Place nulls after non-null values for the last appended term.
    pub fn nulls_last(self) -> Self {
        self.with_nulls(NullOrdering::Last)
    }

    fn with_nulls(mut self, nulls: NullOrdering) -> Self {
        if let Some(term) = self.terms.last_mut() {
            term.nulls = Some(nulls);
        }
        self
    }

    /// Parse `property[,asc|desc][,nullsfirst|nullslast]` terms separated by `;`.
    ///
    /// The direction defaults to ascending. Modifiers are case-insensitive and
    /// may appear in either order. Empty terms are skipped, so `""` parses to
    /// the unsorted spec.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut spec = Self::unsorted();
        for raw in input.split(';') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let mut parts = raw.split(',').map(str::trim);
            let property = parts.next().unwrap_or_default();
            if property.is_empty() {
                return Err(Error::InvalidSortSpec(format!("missing property in '{raw}'")));
            }

            let mut ascending = None;
            let mut nulls = None;
            for modifier in parts {
                match modifier.to_ascii_lowercase().as_str() {
                    "asc" if ascending.is_none() => ascending = Some(true),
                    "desc" if ascending.is_none() => ascending = Some(false),
                    "nullsfirst" if nulls.is_none() => nulls = Some(NullOrdering::First),
                    "nullslast" if nulls.is_none() => nulls = Some(NullOrdering::Last),
                    other => {
                        return Err(Error::InvalidSortSpec(format!(
                            "unexpected modifier '{other}' for '{property}'"
                        )))
                    }
                }
            }

            spec.terms.push(SortTerm {
                property: property.to_string(),
                ascending: ascending.unwrap_or(true),
                nulls,
            });
        }
        Ok(spec)
    }

    /// The terms in priority order.
    pub fn terms(&self) -> &[SortTerm] {
        &self.terms
    }

    /// Whether no term was requested.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Name to column lookup for sortable properties.
#[derive(Debug, Clone)]
pub struct SortResolver {
    columns: HashMap<String, Column>,
}

impl Default for SortResolver {
    fn default() -> Self {
        Self::new(
            SORTABLE_PROPERTIES
                .iter()
                .map(|(name, column)| (name.to_string(), *column)),
        )
    }
}

impl SortResolver {
    /// Build a resolver from `(property, column)` pairs.
    pub fn new(table: impl IntoIterator<Item = (String, Column)>) -> Self {
        Self {
            columns: table.into_iter().collect(),
        }
    }

    /// Build a resolver from the properties a store declares sortable.
    pub fn for_store<S: MemberStore + ?Sized>(store: &S) -> Self {
        Self::new(store.sortable_columns())
    }

    /// Look up one property.
    pub fn column(&self, property: &str) -> Option<Column> {
        self.columns.get(property).copied()
    }

    /// Sortable property names, sorted.
    pub fn properties(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve every term, preserving order, or fail on the first unknown name.
    pub fn resolve(&self, spec: &SortSpec) -> Result<Vec<OrderSpec>, Error> {
        spec.terms()
            .iter()
            .map(|term| {
                let column = self
                    .column(&term.property)
                    .ok_or_else(|| Error::UnresolvedSortField(term.property.clone()))?;
                let order = if term.ascending {
                    OrderSpec::asc(column)
                } else {
                    OrderSpec::desc(column)
                };
                Ok(match term.nulls {
                    Some(nulls) => order.with_nulls(nulls),
                    None => order,
                })
            })
            .collect()
    }
}
