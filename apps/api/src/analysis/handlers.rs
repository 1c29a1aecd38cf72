//! Axum route handlers for the CV Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::analysis::pipeline::{AnalysisResult, AnalyzeOptions};
use crate::errors::AppError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// POST /api/v1/cv/analyze
///
/// Analyzes an uploaded PDF and emails valid candidates. The file is never written to disk.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    run(state, multipart, AnalyzeOptions { notify: true }).await
}

/// POST /api/v1/cv/feedback
///
/// Same analysis as `/analyze` but never sends an email.
pub async fn handle_feedback(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    run(state, multipart, AnalyzeOptions { notify: false }).await
}

async fn run(
    state: AppState,
    multipart: Multipart,
    options: AnalyzeOptions,
) -> Result<Json<AnalysisResult>, AppError> {
    let (filename, pdf_bytes) = read_pdf_upload(multipart).await?;
    info!("Received CV upload '{filename}' ({} bytes)", pdf_bytes.len());

    let result = state.analyzer.analyze_document(pdf_bytes, options).await?;
    Ok(Json(result))
}

/// Pulls the `file` field out of the form and checks it looks like a PDF upload.
async fn read_pdf_upload(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !has_pdf_extension(&filename) {
            return Err(AppError::Validation("Only PDF files are accepted".to_string()));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        return Ok((filename, data));
    }

    Err(AppError::Validation(format!(
        "Missing '{FILE_FIELD}' field in multipart body"
    )))
}

fn has_pdf_extension(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}
