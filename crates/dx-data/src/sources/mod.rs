//! Readers turning uploaded bytes into tables

pub mod csv_source;
pub mod json_source;
pub mod text_source;
pub mod xlsx_source;

use std::collections::HashSet;

use dx_core::{FileType, Table};
use tracing::info;

use crate::config::NullConfig;
use crate::DataError;

pub use csv_source::CsvSource;
pub use json_source::JsonSource;
pub use text_source::{TextSource, TEXT_COLUMN};
pub use xlsx_source::XlsxSource;

/// A reader for one upload format
pub trait TableReader: Send + Sync {
    /// Read the raw bytes of an upload into a table
    fn read(&self, bytes: &[u8]) -> Result<Table, DataError>;

    /// Format name for logging
    fn format_name(&self) -> &str;
}

/// Pick the reader for a file type
pub fn reader_for(file_type: FileType, null_config: &NullConfig) -> Box<dyn TableReader> {
    match file_type {
        FileType::Csv => Box::new(CsvSource::new(b',', null_config.clone())),
        FileType::Tsv => Box::new(CsvSource::new(b'\t', null_config.clone())),
        FileType::Json => Box::new(JsonSource::new()),
        FileType::Txt => Box::new(TextSource::new()),
        FileType::Xlsx => Box::new(XlsxSource::new(null_config.clone())),
    }
}

/// Parse an upload, rejecting tables without rows
pub fn parse(
    bytes: &[u8],
    file_type: FileType,
    null_config: &NullConfig,
) -> Result<Table, DataError> {
    let reader = reader_for(file_type, null_config);
    let table = reader.read(bytes)?;

    if table.is_empty() {
        return Err(DataError::EmptyDataset);
    }

    info!(
        format = reader.format_name(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "parsed upload"
    );
    Ok(table)
}

/// Make header names usable as unique column names
///
/// Blank names become `Unnamed: {idx}` and repeats get a `.N` suffix.
pub(crate) fn normalize_headers<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for (idx, header) in headers.into_iter().enumerate() {
        let header = header.as_ref().trim();
        let base = if header.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}
