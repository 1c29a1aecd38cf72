//! PDF text extraction and the analyzable-text invariant.
//!
//! Extraction is CPU-bound and must run inside `tokio::task::spawn_blocking`.

use bytes::Bytes;

use crate::analysis::AnalysisError;

/// Minimum number of characters a CV must contain to be worth evaluating.
pub const MIN_TEXT_CHARS: usize = 200;

/// Trimmed CV text that is long enough to send to the evaluation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Result<Self, AnalysisError> {
        let text = text.into();
        let trimmed = text.trim();
        let chars = trimmed.chars().count();
        if chars < MIN_TEXT_CHARS {
            return Err(AnalysisError::InsufficientContent {
                chars,
                min: MIN_TEXT_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extracts the text of every page in order, one trailing newline per page, then trims.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, AnalysisError> {
    if pdf_bytes.is_empty() {
        return Err(AnalysisError::Extraction("document is empty".to_string()));
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| AnalysisError::Extraction(e.to_string()))?;

    Ok(join_pages(&pages))
}

/// Runs [`extract_text`] on the blocking pool. A parser panic is reported as an
/// extraction failure.
pub async fn extract_text_blocking(pdf_bytes: Bytes) -> Result<String, AnalysisError> {
    tokio::task::spawn_blocking(move || extract_text(&pdf_bytes))
        .await
        .map_err(|e| AnalysisError::Extraction(format!("PDF parser aborted: {e}")))?
}

fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text.trim().to_string()
}
