//! Column-oriented in-memory table

use std::collections::HashSet;

use indexmap::IndexMap;
use thiserror::Error;

use crate::cell::Cell;

/// A row serialized as an ordered column-name -> value object
pub type Row = IndexMap<String, Cell>;

/// Errors raised while assembling a table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("column '{column}' has {found} cells, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }
}

/// An ordered set of equal-length columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Build a table, validating equal column lengths and unique names
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let num_rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != num_rows {
                return Err(TableError::RaggedColumns {
                    column: column.name.clone(),
                    expected: num_rows,
                    found: column.len(),
                });
            }
        }

        Ok(Self { columns, num_rows })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Select rows by index, in the given order
    ///
    /// Indices out of range are skipped.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let indices: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&idx| idx < self.num_rows)
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                cells: indices.iter().map(|&idx| column.cells[idx].clone()).collect(),
            })
            .collect();

        Table {
            columns,
            num_rows: indices.len(),
        }
    }

    /// First `n` rows as ordered row objects
    pub fn head(&self, n: usize) -> Vec<Row> {
        (0..self.num_rows.min(n))
            .map(|idx| {
                self.columns
                    .iter()
                    .map(|column| (column.name.clone(), column.cells[idx].clone()))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::new("age", vec![Cell::Number(25.0), Cell::Number(30.0), Cell::Missing]),
            Column::new(
                "city",
                vec![
                    Cell::Text("NY".into()),
                    Cell::Text("LA".into()),
                    Cell::Text("SF".into()),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::new("a", vec![Cell::Missing]),
            Column::new("b", vec![]),
        ]);
        assert!(matches!(result, Err(TableError::RaggedColumns { .. })));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Table::new(vec![Column::new("a", vec![]), Column::new("a", vec![])]);
        assert_eq!(result, Err(TableError::DuplicateColumn("a".into())));
    }

    #[test]
    fn test_take_rows() {
        let table = sample();
        let taken = table.take_rows(&[2, 0, 9]);
        assert_eq!(taken.num_rows(), 2);
        assert_eq!(taken.column("city").unwrap().cells[0], Cell::Text("SF".into()));
        assert_eq!(taken.column("age").unwrap().cells[1], Cell::Number(25.0));

        let none = table.take_rows(&[]);
        assert_eq!(none.num_rows(), 0);
        assert_eq!(none.num_columns(), 2);
    }

    #[test]
    fn test_head_rows_keep_column_order() {
        let rows = sample().head(10);
        assert_eq!(rows.len(), 3);
        let keys: Vec<_> = rows[0].keys().cloned().collect();
        assert_eq!(keys, vec!["age", "city"]);
        assert_eq!(serde_json::to_string(&rows[2]).unwrap(), r#"{"age":null,"city":"SF"}"#);
    }
}
