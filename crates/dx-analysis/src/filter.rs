//! Predicate evaluation over tables

use ahash::AHashSet;
use dx_core::{Cell, FilterPredicate, Table};
use tracing::debug;

use crate::AnalysisError;

/// Apply a predicate, returning a new table with the matching rows
///
/// The input is never modified. An unknown column fails before any rows
/// are evaluated.
pub fn apply(table: &Table, predicate: &FilterPredicate) -> Result<Table, AnalysisError> {
    let column = table
        .column(predicate.column())
        .ok_or_else(|| AnalysisError::InvalidColumnReference(predicate.column().to_string()))?;

    if predicate.is_noop() {
        return Ok(table.clone());
    }

    let matcher = Matcher::new(predicate);
    let keep: Vec<usize> = column
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| matcher.matches(cell))
        .map(|(idx, _)| idx)
        .collect();

    debug!(
        column = predicate.column(),
        kept = keep.len(),
        total = table.num_rows(),
        "evaluated predicate"
    );
    Ok(table.take_rows(&keep))
}

/// Predicate prepared for evaluation against single cells
enum Matcher<'a> {
    Range { min: Option<f64>, max: Option<f64> },
    Members(AHashSet<&'a str>),
    Contains(String),
}

impl<'a> Matcher<'a> {
    fn new(predicate: &'a FilterPredicate) -> Self {
        match predicate {
            FilterPredicate::Range { min, max, .. } => Matcher::Range {
                min: *min,
                max: *max,
            },
            FilterPredicate::CategoryMembership { allowed, .. } => {
                Matcher::Members(allowed.iter().map(String::as_str).collect())
            }
            FilterPredicate::Substring { query, .. } => Matcher::Contains(query.to_lowercase()),
        }
    }

    fn matches(&self, cell: &Cell) -> bool {
        match self {
            Matcher::Range { min, max } => match cell.as_number() {
                Some(value) => {
                    min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
                }
                None => false,
            },
            Matcher::Members(allowed) => cell
                .label()
                .map_or(false, |label| allowed.contains(label.as_str())),
            Matcher::Contains(query) => cell
                .label()
                .map_or(false, |label| label.to_lowercase().contains(query.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dx_core::Column;

    fn people() -> Table {
        Table::new(vec![
            Column::new(
                "age",
                vec![Cell::Number(25.0), Cell::Number(30.0), Cell::Missing, Cell::Number(40.0)],
            ),
            Column::new(
                "city",
                vec![
                    Cell::Text("NY".into()),
                    Cell::Text("LA".into()),
                    Cell::Text("NY".into()),
                    Cell::Text("San Francisco".into()),
                ],
            ),
        ])
        .unwrap()
    }

    fn range(min: Option<f64>, max: Option<f64>) -> FilterPredicate {
        FilterPredicate::Range {
            column: "age".into(),
            min,
            max,
        }
    }

    #[test]
    fn test_range_min_only() {
        let filtered = apply(&people(), &range(Some(30.0), None)).unwrap();
        assert_eq!(filtered.num_rows(), 2);
        assert_eq!(
            filtered.column("age").unwrap().cells,
            vec![Cell::Number(30.0), Cell::Number(40.0)]
        );
    }

    #[test]
    fn test_range_is_inclusive_and_idempotent() {
        let predicate = range(Some(25.0), Some(30.0));
        let once = apply(&people(), &predicate).unwrap();
        assert_eq!(once.num_rows(), 2);

        let twice = apply(&once, &predicate).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_range_excludes_non_numeric() {
        let predicate = FilterPredicate::Range {
            column: "city".into(),
            min: Some(0.0),
            max: None,
        };
        assert_eq!(apply(&people(), &predicate).unwrap().num_rows(), 0);
    }

    #[test]
    fn test_category_membership() {
        let predicate = FilterPredicate::CategoryMembership {
            column: "city".into(),
            allowed: vec!["NY".into(), "la".into()],
        };
        let filtered = apply(&people(), &predicate).unwrap();
        assert_eq!(filtered.num_rows(), 2);
        assert_eq!(filtered.column("age").unwrap().cells[1], Cell::Missing);
    }

    #[test]
    fn test_category_matches_stringified_numbers() {
        let predicate = FilterPredicate::CategoryMembership {
            column: "age".into(),
            allowed: vec!["40".into()],
        };
        assert_eq!(apply(&people(), &predicate).unwrap().num_rows(), 1);
    }

    #[test]
    fn test_empty_category_set_is_noop() {
        let predicate = FilterPredicate::CategoryMembership {
            column: "city".into(),
            allowed: vec![],
        };
        assert_eq!(apply(&people(), &predicate).unwrap(), people());
    }

    #[test]
    fn test_substring_search() {
        let predicate = FilterPredicate::Substring {
            column: "city".into(),
            query: "FRAN".into(),
        };
        let filtered = apply(&people(), &predicate).unwrap();
        assert_eq!(filtered.num_rows(), 1);

        let missing_never_match = FilterPredicate::Substring {
            column: "age".into(),
            query: "2".into(),
        };
        assert_eq!(apply(&people(), &missing_never_match).unwrap().num_rows(), 1);
    }

    #[test]
    fn test_no_matches_gives_zero_row_table() {
        let filtered = apply(&people(), &range(Some(100.0), None)).unwrap();
        assert_eq!(filtered.num_rows(), 0);
        assert_eq!(filtered.num_columns(), 2);
    }

    #[test]
    fn test_unknown_column() {
        let predicate = FilterPredicate::Substring {
            column: "nope".into(),
            query: "x".into(),
        };
        assert!(matches!(
            apply(&people(), &predicate),
            Err(AnalysisError::InvalidColumnReference(name)) if name == "nope"
        ));
    }
}
