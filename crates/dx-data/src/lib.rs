//! Data loading and type inference for the dataset explorer

pub mod config;
pub mod schema;
pub mod sources;

use dx_core::TableError;
use thiserror::Error;

// Re-exports
pub use config::NullConfig;
pub use schema::{classify, parse_timestamp, TypeClassifier};
pub use sources::{parse, TableReader};

/// Errors that can occur while reading an uploaded dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Parse error: {0}")]
    ParseFailure(String),

    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::ParseFailure(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::ParseFailure(format!("invalid JSON: {error}"))
    }
}

impl From<calamine::XlsxError> for DataError {
    fn from(error: calamine::XlsxError) -> Self {
        DataError::ParseFailure(format!("invalid workbook: {error}"))
    }
}

impl From<std::str::Utf8Error> for DataError {
    fn from(error: std::str::Utf8Error) -> Self {
        DataError::ParseFailure(format!("invalid UTF-8: {error}"))
    }
}
