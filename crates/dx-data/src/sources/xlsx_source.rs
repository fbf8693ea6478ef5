use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, DataType, Reader, Xlsx};
use dx_core::{Cell, Column, Table};

use super::{normalize_headers, TableReader};
use crate::config::NullConfig;
use crate::schema::parse_timestamp;
use crate::DataError;

/// Excel workbook reader; only the first worksheet is loaded
pub struct XlsxSource {
    null_config: NullConfig,
}

impl XlsxSource {
    pub fn new(null_config: NullConfig) -> Self {
        Self { null_config }
    }

    fn cell(&self, value: &Data) -> Cell {
        match value {
            Data::Int(v) => Cell::Number(*v as f64),
            Data::Float(v) if v.is_finite() => Cell::Number(*v),
            Data::Float(v) => Cell::Text(v.to_string()),
            Data::String(text) if self.null_config.is_null(text) => Cell::Missing,
            Data::String(text) => Cell::Text(text.clone()),
            Data::Bool(flag) => Cell::Text(flag.to_string()),
            Data::DateTime(_) => value.as_datetime().map(Cell::Timestamp).unwrap_or(Cell::Missing),
            Data::DateTimeIso(text) => parse_timestamp(text)
                .map(Cell::Timestamp)
                .unwrap_or_else(|| Cell::Text(text.clone())),
            Data::DurationIso(text) => Cell::Text(text.clone()),
            Data::Error(_) | Data::Empty => Cell::Missing,
        }
    }
}

impl TableReader for XlsxSource {
    fn read(&self, bytes: &[u8]) -> Result<Table, DataError> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DataError::ParseFailure("workbook has no worksheets".to_string()))??;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Table::default());
        };

        let names = normalize_headers(header.iter().map(|h| h.to_string()));
        let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];

        for row in rows {
            for (col_idx, cells) in columns.iter_mut().enumerate() {
                cells.push(row.get(col_idx).map(|v| self.cell(v)).unwrap_or(Cell::Missing));
            }
        }

        let columns = names
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();
        Ok(Table::new(columns)?)
    }

    fn format_name(&self) -> &str {
        "xlsx"
    }
}
