//! Column type inference

mod timestamp;

use dx_core::{Cell, Column, ColumnKind, Table};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::debug;

pub use timestamp::parse_timestamp;

/// Share of a column's cells that must parse as timestamps for the column
/// to be temporal. The comparison is strict.
pub const TEMPORAL_THRESHOLD: f64 = 0.8;

/// Classifier assigning each column a semantic kind
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    temporal_threshold: f64,
}

impl TypeClassifier {
    /// Create a new classifier
    pub fn new() -> Self {
        Self {
            temporal_threshold: TEMPORAL_THRESHOLD,
        }
    }

    /// Set the timestamp share required for a temporal column
    pub fn with_temporal_threshold(mut self, threshold: f64) -> Self {
        self.temporal_threshold = threshold;
        self
    }

    /// Classify every column of the table, keeping column order
    pub fn classify(&self, table: &Table) -> IndexMap<String, ColumnKind> {
        let kinds: Vec<(String, ColumnKind)> = table
            .columns()
            .par_iter()
            .map(|column| (column.name.clone(), self.classify_column(column)))
            .collect();

        debug!(columns = kinds.len(), "classified columns");
        kinds.into_iter().collect()
    }

    /// Classify a single column
    pub fn classify_column(&self, column: &Column) -> ColumnKind {
        let mut present = column.cells.iter().filter(|c| !c.is_missing()).peekable();

        // Nothing to sample
        if present.peek().is_none() {
            return ColumnKind::Categorical;
        }

        let (mut all_numeric, mut all_timestamps) = (true, true);
        for cell in present {
            all_numeric &= cell.as_number().is_some();
            all_timestamps &= matches!(cell, Cell::Timestamp(_));
        }

        if all_numeric {
            return ColumnKind::Numeric;
        }
        if all_timestamps {
            return ColumnKind::Temporal;
        }

        let parsed = column.cells.iter().filter(|c| coerce_timestamp(c).is_some()).count();
        if parsed as f64 > column.len() as f64 * self.temporal_threshold {
            ColumnKind::Temporal
        } else {
            ColumnKind::Categorical
        }
    }
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a table with the default threshold
pub fn classify(table: &Table) -> IndexMap<String, ColumnKind> {
    TypeClassifier::new().classify(table)
}

/// Timestamp value of a cell, parsing text when needed
pub fn coerce_timestamp(cell: &Cell) -> Option<chrono::NaiveDateTime> {
    match cell {
        Cell::Timestamp(ts) => Some(*ts),
        Cell::Text(text) => parse_timestamp(text),
        Cell::Number(_) | Cell::Missing => None,
    }
}
