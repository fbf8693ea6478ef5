//! HTTP route handlers for the dataset explorer.
//!
//! Dataset work is CPU bound, so every handler that touches the session or
//! decodes an image hops onto the blocking pool.

use axum::extract::multipart::Multipart;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use dx_analysis::{
    AnalysisError, ColumnReport, DatasetMeta, DatasetReport, DominantColor, FilterReport,
};
use dx_core::{FileType, FilterPredicate};
use dx_data::DataError;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/upload", post(upload_handler))
        .route("/filter", post(filter_handler))
        .route("/reset", delete(reset_handler))
        .route("/column/:name", get(column_handler))
        .route("/analyze-image", post(analyze_image_handler))
}

/// Run blocking work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::internal(format!("Task failed: {e}")))?
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct RootResponse {
    status: &'static str,
    message: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        message: "Dataset explorer API is running",
    })
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Pull the `file` field out of a multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read upload: {e}")))?;
        return Ok(UploadedFile {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Err(AppError::bad_request("Missing multipart field 'file'"))
}

// ---------------------------------------------------------------------------
// POST /upload
// ---------------------------------------------------------------------------

async fn upload_handler(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<DatasetReport>, AppError> {
    let upload = read_file_field(&mut multipart).await?;
    let file_type = FileType::from_filename(&upload.filename)
        .ok_or_else(|| DataError::UnsupportedFormat(upload.filename.clone()))?;

    tracing::info!(
        filename = %upload.filename,
        file_type = %file_type,
        bytes = upload.bytes.len(),
        "upload received"
    );

    let report = blocking(move || {
        let table = dx_data::parse(&upload.bytes, file_type, &state.null_config)?;
        let meta = DatasetMeta {
            filename: upload.filename,
            file_type,
        };
        Ok(state.session.upload(meta, table)?)
    })
    .await?;

    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// POST /filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum FilterType {
    Range,
    Category,
    Search,
}

/// Request body for `/filter`.
#[derive(Debug, Deserialize)]
struct FilterRequest {
    column: String,
    filter_type: FilterType,
    #[serde(default)]
    min_value: Option<f64>,
    #[serde(default)]
    max_value: Option<f64>,
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    search_query: Option<String>,
}

impl FilterRequest {
    /// Missing optional fields make the predicate a no-op.
    fn into_predicate(self) -> FilterPredicate {
        match self.filter_type {
            FilterType::Range => FilterPredicate::Range {
                column: self.column,
                min: self.min_value,
                max: self.max_value,
            },
            FilterType::Category => FilterPredicate::CategoryMembership {
                column: self.column,
                allowed: self.categories.unwrap_or_default(),
            },
            FilterType::Search => FilterPredicate::Substring {
                column: self.column,
                query: self.search_query.unwrap_or_default(),
            },
        }
    }
}

async fn filter_handler(
    State(state): State<SharedState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<FilterReport>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let predicate = request.into_predicate();

    let report = blocking(move || Ok(state.session.filter(&predicate)?)).await?;
    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// DELETE /reset
// ---------------------------------------------------------------------------

async fn reset_handler(State(state): State<SharedState>) -> Result<Json<DatasetReport>, AppError> {
    let report = blocking(move || Ok(state.session.reset()?)).await?;
    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// GET /column/{name}
// ---------------------------------------------------------------------------

async fn column_handler(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<ColumnReport>, AppError> {
    let report = blocking(move || match state.session.column_report(&name) {
        Ok(report) => Ok(report),
        Err(AnalysisError::InvalidColumnReference(column)) => {
            Err(AppError::not_found(format!("Column '{column}' not found")))
        }
        Err(other) => Err(other.into()),
    })
    .await?;
    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// POST /analyze-image
// ---------------------------------------------------------------------------

const IMAGE_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];

#[derive(Debug, Serialize)]
struct ImageResponse {
    filename: String,
    colors: Vec<DominantColor>,
    total_colors: usize,
}

async fn analyze_image_handler(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<ImageResponse>, AppError> {
    let upload = read_file_field(&mut multipart).await?;
    let content_type = upload.content_type.as_deref().unwrap_or_default();
    if !IMAGE_CONTENT_TYPES.contains(&content_type) {
        return Err(AppError::bad_request(
            "Invalid file type. Only PNG and JPEG images are supported",
        ));
    }

    let num_colors = state.palette_colors;
    let bytes = upload.bytes;
    let colors = blocking(move || Ok(dx_analysis::analyze_image(&bytes, num_colors)?)).await?;

    tracing::info!(filename = %upload.filename, colors = colors.len(), "image analyzed");
    Ok(Json(ImageResponse {
        filename: upload.filename,
        total_colors: colors.len(),
        colors,
    }))
}
