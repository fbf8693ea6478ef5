use dx_core::{Cell, Column, Table};

use super::TableReader;
use crate::DataError;

/// Name of the single column produced for plain text uploads
pub const TEXT_COLUMN: &str = "text";

/// Plain text reader: one row per non-blank line
#[derive(Default)]
pub struct TextSource;

impl TextSource {
    pub fn new() -> Self {
        Self
    }
}

impl TableReader for TextSource {
    fn read(&self, bytes: &[u8]) -> Result<Table, DataError> {
        let text = std::str::from_utf8(bytes)?;
        let cells = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Cell::Text(line.to_string()))
            .collect();

        Ok(Table::new(vec![Column::new(TEXT_COLUMN, cells)])?)
    }

    fn format_name(&self) -> &str {
        "txt"
    }
}
