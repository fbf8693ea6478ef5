//! Filter predicates

use serde::{Deserialize, Serialize};

/// One filter rule applied to narrow the current view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum FilterPredicate {
    /// Keep rows whose numeric value lies within the inclusive bounds
    Range {
        column: String,
        min: Option<f64>,
        max: Option<f64>,
    },

    /// Keep rows whose value label is one of `allowed`
    CategoryMembership { column: String, allowed: Vec<String> },

    /// Keep rows whose value label contains `query`, case-insensitively
    Substring { column: String, query: String },
}

impl FilterPredicate {
    /// Column the predicate refers to
    pub fn column(&self) -> &str {
        match self {
            FilterPredicate::Range { column, .. }
            | FilterPredicate::CategoryMembership { column, .. }
            | FilterPredicate::Substring { column, .. } => column,
        }
    }

    /// Whether applying the predicate leaves the table unchanged
    pub fn is_noop(&self) -> bool {
        match self {
            FilterPredicate::Range { min, max, .. } => min.is_none() && max.is_none(),
            FilterPredicate::CategoryMembership { allowed, .. } => allowed.is_empty(),
            FilterPredicate::Substring { query, .. } => query.is_empty(),
        }
    }
}

impl std::fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterPredicate::Range { column, min, max } => {
                write!(f, "range({column}, min={min:?}, max={max:?})")
            }
            FilterPredicate::CategoryMembership { column, allowed } => {
                write!(f, "category({column}, {} values)", allowed.len())
            }
            FilterPredicate::Substring { column, query } => {
                write!(f, "search({column}, {query:?})")
            }
        }
    }
}
