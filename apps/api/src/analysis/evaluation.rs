//! Evaluation Client: asks the LLM for a structured judgment of a CV.
//!
//! The provider is untrusted: its JSON is read field by field and anything missing or
//! of the wrong type falls back to a default instead of failing the request.
//!
//! `CvAnalyzer` holds an `Arc<dyn Evaluator>`; `LlmEvaluator` is the production backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::analysis::extract::ExtractedText;
use crate::analysis::prompts::{build_evaluation_prompt, build_evaluation_system};
use crate::analysis::AnalysisError;
use crate::llm_client::LlmClient;

// ────────────────────────────────────────────────────────────────────────────
// Judgment model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationJudgment {
    pub is_university_graduate: bool,
    pub is_software_developer: bool,
    pub is_from_peru: bool,
    pub has_github: bool,
    pub has_portfolio: bool,

    /// Category sub-scores as reported. Expected in [0, 10] but not guaranteed.
    pub education_score: f64,
    pub format_score: f64,
    pub experience_score: f64,
    pub skills_score: f64,
    pub extras_score: f64,

    pub education_institution: Option<String>,
    pub professional_summary: String,

    pub positive_points: Vec<String>,
    pub improvements: Vec<String>,
    pub critical_errors: Vec<String>,
    pub suggestions: Vec<String>,
}

impl EvaluationJudgment {
    /// Builds a judgment from the provider's raw JSON object, defaulting each field
    /// independently. Fails only when the payload is not an object at all.
    pub fn from_value(value: &Value) -> Result<Self, AnalysisError> {
        let obj = value.as_object().ok_or_else(|| {
            AnalysisError::EvaluationService(format!(
                "expected a JSON object, got {}",
                json_kind(value)
            ))
        })?;

        Ok(Self {
            is_university_graduate: read_bool(obj, "is_university_graduate"),
            is_software_developer: read_bool(obj, "is_software_developer"),
            is_from_peru: read_bool(obj, "is_from_peru"),
            has_github: read_bool(obj, "has_github"),
            has_portfolio: read_bool(obj, "has_portfolio"),
            education_score: read_score(obj, "education_score"),
            format_score: read_score(obj, "format_score"),
            experience_score: read_score(obj, "experience_score"),
            skills_score: read_score(obj, "skills_score"),
            extras_score: read_score(obj, "extras_score"),
            education_institution: read_optional_text(obj, "education_institution"),
            professional_summary: read_optional_text(obj, "professional_summary")
                .unwrap_or_default(),
            positive_points: read_list(obj, "positive_points"),
            improvements: read_list(obj, "improvements"),
            critical_errors: read_list(obj, "critical_errors"),
            suggestions: read_list(obj, "suggestions"),
        })
    }
}

fn read_bool(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn read_score(obj: &Map<String, Value>, key: &str) -> f64 {
    let score = match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    score.filter(|s| s.is_finite()).unwrap_or(0.0)
}

/// Non-empty string, or `None`. Models sometimes write the literal "null".
fn read_optional_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        .map(String::from)
}

fn read_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Produces a structured judgment for a CV. Implement this to swap the provider
/// without touching the pipeline or handlers.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        text: &ExtractedText,
        years_experience: u32,
    ) -> Result<EvaluationJudgment, AnalysisError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmEvaluator
// ────────────────────────────────────────────────────────────────────────────

/// Chat-completions backed evaluator. One request per CV, no retries.
#[derive(Debug, Clone)]
pub struct LlmEvaluator {
    llm: LlmClient,
}

impl LlmEvaluator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Evaluator for LlmEvaluator {
    async fn evaluate(
        &self,
        text: &ExtractedText,
        years_experience: u32,
    ) -> Result<EvaluationJudgment, AnalysisError> {
        let prompt = build_evaluation_prompt(text.as_str(), years_experience);
        let system = build_evaluation_system();

        let raw: Value = self
            .llm
            .call_json(&prompt, &system)
            .await
            .map_err(|e| AnalysisError::EvaluationService(e.to_string()))?;

        let judgment = EvaluationJudgment::from_value(&raw)?;
        info!(
            "Evaluation received: developer={}, github={}",
            judgment.is_software_developer, judgment.has_github
        );
        Ok(judgment)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
