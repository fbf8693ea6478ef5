//! Shared application state for the server.

use std::sync::Arc;

use dx_analysis::DatasetSession;
use dx_data::NullConfig;

/// Shared state available to all request handlers.
pub struct AppState {
    /// The single active dataset and its filtered view.
    pub session: DatasetSession,

    /// Tokens read as missing values in delimited and workbook uploads.
    pub null_config: NullConfig,

    /// Number of dominant colors returned by `/analyze-image`.
    pub palette_colors: usize,
}

impl AppState {
    pub fn new(palette_colors: usize) -> Self {
        Self {
            session: DatasetSession::new(),
            null_config: NullConfig::default(),
            palette_colors,
        }
    }
}

/// Type alias used in axum handlers.
pub type SharedState = Arc<AppState>;
