//! Core data model for the dataset explorer
//!
//! This crate provides the in-memory table representation shared by the
//! readers, the analysis pipeline and the HTTP server.

pub mod cell;
pub mod predicate;
pub mod table;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cell::Cell;
pub use predicate::FilterPredicate;
pub use table::{Column, Row, Table, TableError};

/// Semantic type inferred for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Temporal,
    Categorical,
}

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Csv,
    Tsv,
    Json,
    Txt,
    Xlsx,
}

impl FileType {
    /// Detect the file type from a filename extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(FileType::Csv),
            "tsv" => Some(FileType::Tsv),
            "json" => Some(FileType::Json),
            "txt" => Some(FileType::Txt),
            "xlsx" => Some(FileType::Xlsx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Csv => "csv",
            FileType::Tsv => "tsv",
            FileType::Json => "json",
            FileType::Txt => "txt",
            FileType::Xlsx => "xlsx",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
