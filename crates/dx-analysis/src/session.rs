//! Dataset session state
//!
//! The session keeps the original upload and the current filtered view.
//! Upload, filter and reset are serialized by one lock; the analysis of the
//! resulting view runs after the lock is released.

use std::sync::Arc;

use dx_core::{ColumnKind, FileType, FilterPredicate, Row, Table};
use dx_data::{DataError, TypeClassifier};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use crate::charts::{self, ChartSeries};
use crate::stats::{self, StatSummary};
use crate::{filter, text, AnalysisError};

/// Rows included in `sample_data`
pub const SAMPLE_ROWS: usize = 10;

/// Where the active dataset came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetMeta {
    pub filename: String,
    pub file_type: FileType,
}

/// Full analysis returned by upload and reset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub filename: String,
    pub file_type: FileType,
    pub num_rows: usize,
    pub num_columns: usize,
    pub column_names: Vec<String>,
    pub column_types: IndexMap<String, ColumnKind>,
    pub statistics: IndexMap<String, StatSummary>,
    pub chart_data: IndexMap<String, ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_frequencies: Option<IndexMap<String, usize>>,
    pub sample_data: Vec<Row>,
}

/// Analysis returned after a filter
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub num_rows: usize,
    pub statistics: IndexMap<String, StatSummary>,
    pub chart_data: IndexMap<String, ChartSeries>,
    pub sample_data: Vec<Row>,
}

impl FilterReport {
    /// Report for a view without rows
    pub fn empty() -> Self {
        Self {
            num_rows: 0,
            statistics: IndexMap::new(),
            chart_data: IndexMap::new(),
            sample_data: Vec::new(),
        }
    }
}

/// Analysis of a single column of the current view
#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub column: String,
    pub column_type: ColumnKind,
    pub statistics: StatSummary,
    pub chart_data: ChartSeries,
}

struct SessionData {
    meta: DatasetMeta,
    original: Arc<Table>,
    view: Arc<Table>,
}

/// Process-wide holder of the active dataset
pub struct DatasetSession {
    state: Mutex<Option<SessionData>>,
    classifier: TypeClassifier,
}

struct Analysis {
    column_types: IndexMap<String, ColumnKind>,
    statistics: IndexMap<String, StatSummary>,
    chart_data: IndexMap<String, ChartSeries>,
}

impl DatasetSession {
    /// Create a session with no active dataset
    pub fn new() -> Self {
        Self::with_classifier(TypeClassifier::new())
    }

    pub fn with_classifier(classifier: TypeClassifier) -> Self {
        Self {
            state: Mutex::new(None),
            classifier,
        }
    }

    /// Whether a dataset has been uploaded
    pub fn is_active(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Metadata and current view of the active dataset
    pub fn current_view(&self) -> Option<(DatasetMeta, Arc<Table>)> {
        self.state
            .lock()
            .as_ref()
            .map(|data| (data.meta.clone(), Arc::clone(&data.view)))
    }

    /// The untouched upload of the active dataset
    pub fn original(&self) -> Option<Arc<Table>> {
        self.state.lock().as_ref().map(|data| Arc::clone(&data.original))
    }

    /// Replace the active dataset with a new upload
    pub fn upload(&self, meta: DatasetMeta, table: Table) -> Result<DatasetReport, AnalysisError> {
        if table.is_empty() {
            return Err(DataError::EmptyDataset.into());
        }

        let table = Arc::new(table);
        *self.state.lock() = Some(SessionData {
            meta: meta.clone(),
            original: Arc::clone(&table),
            view: Arc::clone(&table),
        });

        info!(
            filename = %meta.filename,
            file_type = %meta.file_type,
            rows = table.num_rows(),
            columns = table.num_columns(),
            "dataset uploaded"
        );
        Ok(self.dataset_report(&meta, &table))
    }

    /// Narrow the current view with a predicate
    ///
    /// The view is left unchanged when evaluation fails.
    pub fn filter(&self, predicate: &FilterPredicate) -> Result<FilterReport, AnalysisError> {
        let (meta, view) = {
            let mut state = self.state.lock();
            let data = state.as_mut().ok_or(AnalysisError::NoActiveSession)?;
            let filtered = Arc::new(filter::apply(&data.view, predicate)?);
            data.view = Arc::clone(&filtered);
            (data.meta.clone(), filtered)
        };

        info!(predicate = %predicate, rows = view.num_rows(), "filter applied");
        if view.is_empty() {
            return Ok(FilterReport::empty());
        }

        let analysis = self.analyze(&meta, &view);
        Ok(FilterReport {
            num_rows: view.num_rows(),
            statistics: analysis.statistics,
            chart_data: analysis.chart_data,
            sample_data: view.head(SAMPLE_ROWS),
        })
    }

    /// Restore the view to the original upload
    pub fn reset(&self) -> Result<DatasetReport, AnalysisError> {
        let (meta, view) = {
            let mut state = self.state.lock();
            let data = state.as_mut().ok_or(AnalysisError::NoActiveSession)?;
            data.view = Arc::clone(&data.original);
            (data.meta.clone(), Arc::clone(&data.view))
        };

        info!(filename = %meta.filename, rows = view.num_rows(), "view reset");
        Ok(self.dataset_report(&meta, &view))
    }

    /// Statistics and chart for one column of the current view
    pub fn column_report(&self, name: &str) -> Result<ColumnReport, AnalysisError> {
        let (meta, view) = self.current_view().ok_or(AnalysisError::NoActiveSession)?;
        let column = view
            .column(name)
            .ok_or_else(|| AnalysisError::InvalidColumnReference(name.to_string()))?;

        let kind = if meta.file_type == FileType::Txt {
            ColumnKind::Categorical
        } else {
            self.classifier.classify_column(column)
        };

        Ok(ColumnReport {
            column: name.to_string(),
            column_type: kind,
            statistics: stats::summarize_column(column, kind),
            chart_data: charts::column_series(column, kind),
        })
    }

    fn analyze(&self, meta: &DatasetMeta, table: &Table) -> Analysis {
        let column_types = if meta.file_type == FileType::Txt {
            // free text is never re-typed
            table
                .column_names()
                .into_iter()
                .map(|name| (name, ColumnKind::Categorical))
                .collect()
        } else {
            self.classifier.classify(table)
        };

        let statistics = stats::summarize(table, &column_types);
        let chart_data = charts::chart_series(table, &column_types);
        Analysis {
            column_types,
            statistics,
            chart_data,
        }
    }

    fn dataset_report(&self, meta: &DatasetMeta, table: &Table) -> DatasetReport {
        let analysis = self.analyze(meta, table);
        let word_frequencies =
            (meta.file_type == FileType::Txt).then(|| text::word_frequencies(table));

        DatasetReport {
            filename: meta.filename.clone(),
            file_type: meta.file_type,
            num_rows: table.num_rows(),
            num_columns: table.num_columns(),
            column_names: table.column_names(),
            column_types: analysis.column_types,
            statistics: analysis.statistics,
            chart_data: analysis.chart_data,
            word_frequencies,
            sample_data: table.head(SAMPLE_ROWS),
        }
    }
}

impl Default for DatasetSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dx_core::{Cell, Column};

    fn meta(file_type: FileType) -> DatasetMeta {
        DatasetMeta {
            filename: format!("data.{file_type}"),
            file_type,
        }
    }

    fn scores() -> Table {
        Table::new(vec![
            Column::new("score", (1..=12).map(|v| Cell::Number(f64::from(v))).collect()),
            Column::new(
                "team",
                (1..=12)
                    .map(|v| Cell::Text(if v % 2 == 0 { "even" } else { "odd" }.to_string()))
                    .collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_operations_require_upload() {
        let session = DatasetSession::new();
        assert!(!session.is_active());
        assert!(matches!(session.reset(), Err(AnalysisError::NoActiveSession)));

        let predicate = FilterPredicate::Substring {
            column: "team".into(),
            query: "odd".into(),
        };
        assert!(matches!(session.filter(&predicate), Err(AnalysisError::NoActiveSession)));
        assert!(matches!(session.column_report("team"), Err(AnalysisError::NoActiveSession)));
    }

    #[test]
    fn test_upload_rejects_empty_table() {
        let session = DatasetSession::new();
        let empty = scores().take_rows(&[]);
        assert!(matches!(
            session.upload(meta(FileType::Csv), empty),
            Err(AnalysisError::Data(DataError::EmptyDataset))
        ));
        assert!(!session.is_active());
    }

    #[test]
    fn test_upload_report() {
        let session = DatasetSession::new();
        let report = session.upload(meta(FileType::Csv), scores()).unwrap();

        assert_eq!(report.num_rows, 12);
        assert_eq!(report.num_columns, 2);
        assert_eq!(report.column_names, vec!["score", "team"]);
        assert_eq!(report.column_types["score"], ColumnKind::Numeric);
        assert_eq!(report.sample_data.len(), SAMPLE_ROWS);
        assert!(report.word_frequencies.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["file_type"], "csv");
        assert!(json.get("word_frequencies").is_none());
    }

    #[test]
    fn test_filters_compose_and_reset_restores() {
        let session = DatasetSession::new();
        session.upload(meta(FileType::Csv), scores()).unwrap();

        let first = session
            .filter(&FilterPredicate::Range {
                column: "score".into(),
                min: Some(5.0),
                max: None,
            })
            .unwrap();
        assert_eq!(first.num_rows, 8);

        let second = session
            .filter(&FilterPredicate::CategoryMembership {
                column: "team".into(),
                allowed: vec!["even".into()],
            })
            .unwrap();
        assert_eq!(second.num_rows, 4);

        let report = session.reset().unwrap();
        assert_eq!(report.num_rows, 12);
        assert_eq!(report.filename, "data.csv");

        let (_, view) = session.current_view().unwrap();
        assert_eq!(*view, *session.original().unwrap());
    }

    #[test]
    fn test_failed_filter_keeps_view() {
        let session = DatasetSession::new();
        session.upload(meta(FileType::Csv), scores()).unwrap();
        session
            .filter(&FilterPredicate::Range {
                column: "score".into(),
                min: None,
                max: Some(3.0),
            })
            .unwrap();

        let result = session.filter(&FilterPredicate::Substring {
            column: "missing".into(),
            query: "x".into(),
        });
        assert!(matches!(result, Err(AnalysisError::InvalidColumnReference(_))));
        assert_eq!(session.current_view().unwrap().1.num_rows(), 3);
    }

    #[test]
    fn test_zero_row_filter_short_circuits() {
        let session = DatasetSession::new();
        session.upload(meta(FileType::Csv), scores()).unwrap();

        let report = session
            .filter(&FilterPredicate::Range {
                column: "score".into(),
                min: Some(100.0),
                max: None,
            })
            .unwrap();
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "num_rows": 0,
                "statistics": {},
                "chart_data": {},
                "sample_data": []
            })
        );
    }

    #[test]
    fn test_text_dataset_is_categorical_with_words() {
        let session = DatasetSession::new();
        let table = Table::new(vec![Column::new(
            dx_data::sources::TEXT_COLUMN,
            vec![Cell::Text("123".into()), Cell::Text("456".into()), Cell::Text("789".into())],
        )])
        .unwrap();

        // numeric-looking lines stay text
        let report = session.upload(meta(FileType::Txt), table).unwrap();
        assert_eq!(report.column_types["text"], ColumnKind::Categorical);
        assert!(matches!(report.statistics["text"], StatSummary::Categorical(_)));
        assert_eq!(report.word_frequencies, Some(IndexMap::new()));

        let column = session.column_report("text").unwrap();
        assert_eq!(column.column_type, ColumnKind::Categorical);
    }

    #[test]
    fn test_column_report() {
        let session = DatasetSession::new();
        session.upload(meta(FileType::Csv), scores()).unwrap();

        let report = session.column_report("score").unwrap();
        assert_eq!(report.column_type, ColumnKind::Numeric);
        assert_eq!(report.chart_data.len(), 12);
        assert!(matches!(
            session.column_report("nope"),
            Err(AnalysisError::InvalidColumnReference(_))
        ));
    }
}
