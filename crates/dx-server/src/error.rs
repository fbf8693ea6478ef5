//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use dx_analysis::{AnalysisError, PaletteError};
use dx_data::DataError;

/// Structured JSON error response.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<DataError> for AppError {
    fn from(error: DataError) -> Self {
        // Anything wrong with the upload itself is the client's problem
        Self::bad_request(error.to_string())
    }
}

impl From<AnalysisError> for AppError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::NoActiveSession => Self::bad_request(error.to_string()),
            AnalysisError::Data(data) => data.into(),
            AnalysisError::InvalidColumnReference(_) => Self::internal(error.to_string()),
        }
    }
}

impl From<PaletteError> for AppError {
    fn from(error: PaletteError) -> Self {
        Self::internal(format!("Error processing image: {error}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(status = %self.status, error = %self.message, "request failed");
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}
