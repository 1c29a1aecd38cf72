// CV Analysis Pipeline
// Implements: text extraction, heuristic features, LLM evaluation, score aggregation,
// candidate decision and acceptance notification.
// All LLM calls go through llm_client, no direct provider calls here.

pub mod evaluation;
pub mod extract;
pub mod features;
pub mod handlers;
pub mod notification;
pub mod pipeline;
pub mod prompts;
pub mod scoring;

use thiserror::Error;

/// Fatal pipeline failures. Any of these aborts the request with no partial result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Could not read PDF: {0}")]
    Extraction(String),

    #[error("CV is too short to analyze ({chars} characters, at least {min} required)")]
    InsufficientContent { chars: usize, min: usize },

    #[error("Evaluation service failed: {0}")]
    EvaluationService(String),
}
