//! Chart-ready series per column

use ahash::AHashSet;
use dx_core::cell::LABEL_FORMAT;
use dx_core::{Column, ColumnKind, Table};
use dx_data::schema::coerce_timestamp;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::frequencies;

/// Upper bound on histogram bins
pub const MAX_HISTOGRAM_BINS: usize = 20;

/// Number of bars shown for categorical columns
pub const CHART_TOP_N: usize = 15;

/// Render-ready series for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ChartSeries {
    /// Equal-width bins over the observed numeric range
    Histogram {
        labels: Vec<String>,
        values: Vec<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        raw_values: Option<Vec<f64>>,
    },

    /// Row counts per distinct timestamp, ascending
    #[serde(rename = "line")]
    TimeSeries { labels: Vec<String>, values: Vec<usize> },

    /// Most frequent categories, descending
    Bar { labels: Vec<String>, values: Vec<usize> },
}

impl ChartSeries {
    /// Number of points in the series
    pub fn len(&self) -> usize {
        match self {
            ChartSeries::Histogram { values, .. }
            | ChartSeries::TimeSeries { values, .. }
            | ChartSeries::Bar { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bin numeric values into `min(20, distinct)` equal-width bins
pub fn histogram(values: Vec<f64>) -> ChartSeries {
    if values.is_empty() {
        return ChartSeries::Histogram {
            labels: Vec::new(),
            values: Vec::new(),
            raw_values: None,
        };
    }

    // -0.0 and 0.0 are the same value
    let distinct = values
        .iter()
        .map(|v| (v + 0.0).to_bits())
        .collect::<AHashSet<_>>()
        .len();
    let num_bins = distinct.min(MAX_HISTOGRAM_BINS);

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (lower, upper) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let width = (upper - lower) / num_bins as f64;
    let edges: Vec<f64> = (0..=num_bins)
        .map(|i| if i == num_bins { upper } else { lower + width * i as f64 })
        .collect();

    let mut counts = vec![0usize; num_bins];
    for &value in &values {
        // The last bin is closed on the right
        let mut idx = (((value - lower) / width).floor() as usize).min(num_bins - 1);
        // Division can land one bin off near an edge; the edges decide
        if idx > 0 && value < edges[idx] {
            idx -= 1;
        }
        if idx + 1 < num_bins && value >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    let labels = edges
        .windows(2)
        .map(|pair| format!("{:.2}-{:.2}", pair[0], pair[1]))
        .collect();

    debug!(bins = num_bins, distinct, "built histogram");
    ChartSeries::Histogram {
        labels,
        values: counts,
        raw_values: Some(values),
    }
}

/// Count rows per distinct timestamp in ascending time order
pub fn time_series(column: &Column) -> ChartSeries {
    let mut timestamps: Vec<_> = column.cells.iter().filter_map(coerce_timestamp).collect();
    timestamps.sort();

    let mut labels = Vec::new();
    let mut values: Vec<usize> = Vec::new();
    let mut previous = None;
    for ts in timestamps {
        if previous == Some(ts) {
            if let Some(last) = values.last_mut() {
                *last += 1;
            }
        } else {
            labels.push(ts.format(LABEL_FORMAT).to_string());
            values.push(1);
            previous = Some(ts);
        }
    }

    ChartSeries::TimeSeries { labels, values }
}

/// Most frequent labels as bars
pub fn bars(column: &Column) -> ChartSeries {
    let (labels, values): (Vec<String>, Vec<usize>) =
        frequencies(column.cells.iter().filter_map(|c| c.label()))
            .into_iter()
            .take(CHART_TOP_N)
            .unzip();
    ChartSeries::Bar { labels, values }
}

/// Build the series for one column according to its kind
pub fn column_series(column: &Column, kind: ColumnKind) -> ChartSeries {
    match kind {
        ColumnKind::Numeric => {
            histogram(column.cells.iter().filter_map(|c| c.as_number()).collect())
        }
        ColumnKind::Temporal => time_series(column),
        ColumnKind::Categorical => bars(column),
    }
}

/// Build series for every classified column, keeping column order
pub fn chart_series(
    table: &Table,
    kinds: &IndexMap<String, ColumnKind>,
) -> IndexMap<String, ChartSeries> {
    let series: Vec<(String, ChartSeries)> = table
        .columns()
        .par_iter()
        .filter_map(|column| {
            let kind = kinds.get(&column.name)?;
            Some((column.name.clone(), column_series(column, *kind)))
        })
        .collect();

    series.into_iter().collect()
}
