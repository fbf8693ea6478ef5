//! Statistics, chart aggregation, filtering and session state
//!
//! Everything here works on the in-memory [`dx_core::Table`] and the kinds
//! produced by [`dx_data::classify`].

pub mod charts;
pub mod filter;
pub mod palette;
pub mod session;
pub mod stats;
pub mod text;

use dx_data::DataError;
use indexmap::IndexMap;
use thiserror::Error;

// Re-exports
pub use charts::{chart_series, ChartSeries};
pub use filter::apply;
pub use palette::{analyze_image, DominantColor, PaletteError};
pub use session::{ColumnReport, DatasetMeta, DatasetReport, DatasetSession, FilterReport};
pub use stats::{summarize, StatSummary};
pub use text::word_frequencies;

/// Errors raised by session operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No dataset uploaded. Please upload a file first.")]
    NoActiveSession,

    #[error("Column not found: {0}")]
    InvalidColumnReference(String),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Label/count pairs sorted by descending count
///
/// The sort is stable, so equal counts keep first-encountered order.
pub(crate) fn frequencies(labels: impl IntoIterator<Item = String>) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize, ahash::RandomState> =
        IndexMap::with_hasher(ahash::RandomState::new());
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1));
    pairs
}
