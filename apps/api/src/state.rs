use std::sync::Arc;

use crate::analysis::pipeline::CvAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Screening pipeline. Evaluator and notifier are swapped at startup via config.
    pub analyzer: Arc<CvAnalyzer>,
}
