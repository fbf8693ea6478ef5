use dx_core::{Cell, Column, Table};
use indexmap::IndexMap;
use serde_json::Value;

use super::TableReader;
use crate::DataError;

/// JSON reader
///
/// Accepts either an array of records or an object mapping column names to
/// equal-length arrays.
#[derive(Default)]
pub struct JsonSource;

impl JsonSource {
    pub fn new() -> Self {
        Self
    }

    fn from_records(records: Vec<Value>) -> Result<Table, DataError> {
        let mut columns: IndexMap<String, Vec<Cell>> = IndexMap::new();

        for (row_idx, record) in records.into_iter().enumerate() {
            let Value::Object(fields) = record else {
                return Err(DataError::ParseFailure(format!(
                    "record {} is not a JSON object",
                    row_idx + 1
                )));
            };

            for (key, value) in fields {
                // Columns first seen on a later record are backfilled
                let cells = columns
                    .entry(key)
                    .or_insert_with(|| vec![Cell::Missing; row_idx]);
                cells.push(json_cell(value));
            }

            for cells in columns.values_mut() {
                cells.resize(row_idx + 1, Cell::Missing);
            }
        }

        let columns = columns
            .into_iter()
            .map(|(name, cells)| Column::new(name, cells))
            .collect();
        Ok(Table::new(columns)?)
    }

    fn from_column_arrays(fields: serde_json::Map<String, Value>) -> Result<Table, DataError> {
        let mut columns = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            let Value::Array(values) = value else {
                return Err(DataError::ParseFailure(format!(
                    "column '{name}' is not a JSON array"
                )));
            };
            columns.push(Column::new(name, values.into_iter().map(json_cell).collect()));
        }
        Ok(Table::new(columns)?)
    }
}

impl TableReader for JsonSource {
    fn read(&self, bytes: &[u8]) -> Result<Table, DataError> {
        let text = std::str::from_utf8(bytes)?;
        match serde_json::from_str::<Value>(text)? {
            Value::Array(records) => Self::from_records(records),
            Value::Object(fields) => Self::from_column_arrays(fields),
            _ => Err(DataError::ParseFailure(
                "expected an array of records or an object of columns".to_string(),
            )),
        }
    }

    fn format_name(&self) -> &str {
        "json"
    }
}

fn json_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Missing,
        Value::Number(number) => match number.as_f64() {
            Some(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(number.to_string()),
        },
        Value::String(text) => Cell::Text(text),
        Value::Bool(flag) => Cell::Text(flag.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Cell::Text(nested.to_string()),
    }
}
