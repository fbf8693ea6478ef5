//! Summary statistics per column

use dx_core::cell::format_iso;
use dx_core::{Column, ColumnKind, Table};
use dx_data::schema::coerce_timestamp;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

use crate::frequencies;

/// Number of most frequent values reported for categorical columns
pub const STATS_TOP_N: usize = 20;

/// Descriptive summary of one column, shaped by its kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StatSummary {
    Numeric(NumericStats),
    Temporal(TemporalStats),
    Categorical(CategoricalStats),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
    pub count: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalStats {
    /// Earliest timestamp, ISO formatted
    pub min: Option<String>,
    /// Latest timestamp, ISO formatted
    pub max: Option<String>,
    pub count: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalStats {
    pub unique_values: usize,
    pub top_values: IndexMap<String, usize>,
    pub count: usize,
    pub missing: usize,
}

impl NumericStats {
    /// Zero-valued summary for a column without numbers
    pub fn empty(total: usize) -> Self {
        Self {
            mean: 0.0,
            median: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
            q25: 0.0,
            q75: 0.0,
            count: 0,
            missing: total,
        }
    }

    /// Compute the summary over the non-missing numbers of a column
    pub fn from_column(column: &Column) -> Self {
        let mut values: Vec<f64> = column.cells.iter().filter_map(|c| c.as_number()).collect();
        if values.is_empty() {
            return Self::empty(column.len());
        }

        values.sort_by(|a, b| a.total_cmp(b));
        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Self {
            mean,
            median: quantile(&values, 0.5),
            std,
            min: values[0],
            max: values[n - 1],
            q25: quantile(&values, 0.25),
            q75: quantile(&values, 0.75),
            count: n,
            missing: column.len() - n,
        }
    }
}

impl TemporalStats {
    pub fn from_column(column: &Column) -> Self {
        let timestamps: Vec<_> = column.cells.iter().filter_map(coerce_timestamp).collect();
        Self {
            min: timestamps.iter().min().map(format_iso),
            max: timestamps.iter().max().map(format_iso),
            count: timestamps.len(),
            missing: column.len() - timestamps.len(),
        }
    }
}

impl CategoricalStats {
    pub fn from_column(column: &Column) -> Self {
        let pairs = frequencies(column.cells.iter().filter_map(|c| c.label()));
        let count = pairs.iter().map(|(_, n)| n).sum();

        Self {
            unique_values: pairs.len(),
            top_values: pairs.into_iter().take(STATS_TOP_N).collect(),
            count,
            missing: column.len() - count,
        }
    }
}

/// Quantile of sorted values by linear interpolation
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let idx = (sorted.len() - 1) as f64 * q;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

/// Summarize one column according to its kind
pub fn summarize_column(column: &Column, kind: ColumnKind) -> StatSummary {
    match kind {
        ColumnKind::Numeric => StatSummary::Numeric(NumericStats::from_column(column)),
        ColumnKind::Temporal => StatSummary::Temporal(TemporalStats::from_column(column)),
        ColumnKind::Categorical => StatSummary::Categorical(CategoricalStats::from_column(column)),
    }
}

/// Summarize every classified column of the table, keeping column order
pub fn summarize(
    table: &Table,
    kinds: &IndexMap<String, ColumnKind>,
) -> IndexMap<String, StatSummary> {
    let summaries: Vec<(String, StatSummary)> = table
        .columns()
        .par_iter()
        .filter_map(|column| {
            let kind = kinds.get(&column.name)?;
            Some((column.name.clone(), summarize_column(column, *kind)))
        })
        .collect();

    summaries.into_iter().collect()
}
