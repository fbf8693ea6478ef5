use csv::ReaderBuilder;
use dx_core::{Cell, Column, Table};

use super::{normalize_headers, TableReader};
use crate::config::NullConfig;
use crate::DataError;

/// Delimited text reader for CSV and TSV uploads
pub struct CsvSource {
    delimiter: u8,
    null_config: NullConfig,
}

impl CsvSource {
    /// Create a new delimited reader
    pub fn new(delimiter: u8, null_config: NullConfig) -> Self {
        Self {
            delimiter,
            null_config,
        }
    }

    fn cell(&self, value: &str) -> Cell {
        if self.null_config.is_null(value) {
            Cell::Missing
        } else {
            Cell::from_token(value)
        }
    }
}

impl TableReader for CsvSource {
    fn read(&self, bytes: &[u8]) -> Result<Table, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let names = normalize_headers(csv_reader.headers()?.iter());
        let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            if record.len() > names.len() {
                return Err(DataError::ParseFailure(format!(
                    "row {} has {} fields, expected {}",
                    idx + 1,
                    record.len(),
                    names.len()
                )));
            }

            // Short rows are padded with missing values
            for (col_idx, cells) in columns.iter_mut().enumerate() {
                let cell = record.get(col_idx).map(|v| self.cell(v)).unwrap_or(Cell::Missing);
                cells.push(cell);
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
        if self.delimiter == b'\t' {
            "tsv"
        } else {
            "csv"
        }
    }
}
