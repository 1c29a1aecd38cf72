//! CV Analysis: orchestrates the full screening pipeline.
//!
//! Flow: extract_text → ExtractedText (length gate) → extract_features →
//!       evaluator.evaluate → compute_score_breakdown → validity decision →
//!       optional acceptance email → AnalysisResult.
//!
//! Nothing is persisted. Each call is independent and only reads shared clients.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::evaluation::{EvaluationJudgment, Evaluator};
use crate::analysis::extract::{extract_text_blocking, ExtractedText};
use crate::analysis::features::{extract_features, HeuristicFeatures};
use crate::analysis::notification::{acceptance_body, Notifier, ACCEPTANCE_SUBJECT};
use crate::analysis::scoring::{compute_score_breakdown, ScoreBreakdown};
use crate::analysis::AnalysisError;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct AnalyzeOptions {
    /// Send the acceptance email to valid candidates. Off for feedback-only runs.
    pub notify: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self { notify: true }
    }
}

/// Flat response record returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub is_valid_candidate: bool,
    pub is_university_graduate: bool,
    pub is_software_developer: bool,
    pub is_from_peru: bool,
    pub has_github: bool,
    pub has_portfolio: bool,
    pub years_experience: u32,
    pub candidate_email: Option<String>,
    pub email_sent: bool,

    pub education_score: f64,
    pub format_score: f64,
    pub experience_score: f64,
    pub skills_score: f64,
    pub extras_score: f64,

    pub positive_points: Vec<String>,
    pub improvements: Vec<String>,
    pub critical_errors: Vec<String>,
    pub suggestions: Vec<String>,

    pub education_institution: Option<String>,
    pub professional_summary: String,
}

impl AnalysisResult {
    fn assemble(
        features: HeuristicFeatures,
        judgment: EvaluationJudgment,
        scores: ScoreBreakdown,
        is_valid_candidate: bool,
        email_sent: bool,
    ) -> Self {
        Self {
            overall_score: scores.overall_score,
            is_valid_candidate,
            is_university_graduate: judgment.is_university_graduate,
            is_software_developer: judgment.is_software_developer,
            is_from_peru: judgment.is_from_peru,
            has_github: judgment.has_github,
            has_portfolio: judgment.has_portfolio,
            years_experience: features.years_experience,
            candidate_email: features.candidate_email,
            email_sent,
            education_score: scores.education_score,
            format_score: scores.format_score,
            experience_score: scores.experience_score,
            skills_score: scores.skills_score,
            extras_score: scores.extras_score,
            positive_points: judgment.positive_points,
            improvements: judgment.improvements,
            critical_errors: judgment.critical_errors,
            suggestions: judgment.suggestions,
            education_institution: judgment.education_institution,
            professional_summary: judgment.professional_summary,
        }
    }
}

/// Validity is gated on the profile type alone; the score is informational.
pub fn is_valid_candidate(judgment: &EvaluationJudgment) -> bool {
    judgment.is_software_developer
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Shared by all requests via `AppState`. Holds only stateless, pooled clients.
#[derive(Clone)]
pub struct CvAnalyzer {
    evaluator: Arc<dyn Evaluator>,
    notifier: Arc<dyn Notifier>,
}

impl CvAnalyzer {
    pub fn new(evaluator: Arc<dyn Evaluator>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            evaluator,
            notifier,
        }
    }

    /// Byte-stream entry point: extracts PDF text, then runs [`Self::analyze_text`].
    pub async fn analyze_document(
        &self,
        pdf_bytes: Bytes,
        options: AnalyzeOptions,
    ) -> Result<AnalysisResult, AnalysisError> {
        let text = extract_text_blocking(pdf_bytes).await?;
        self.analyze_text(text, options).await
    }

    /// Runs the pipeline on already extracted text.
    ///
    /// Steps:
    /// 1. ExtractedText::new() → fails fast below 200 characters
    /// 2. extract_features() → email + years of experience
    /// 3. evaluator.evaluate() → EvaluationJudgment
    /// 4. compute_score_breakdown() → ScoreBreakdown
    /// 5. is_valid_candidate() → notify if valid and an email was found
    pub async fn analyze_text(
        &self,
        text: String,
        options: AnalyzeOptions,
    ) -> Result<AnalysisResult, AnalysisError> {
        let span = info_span!("cv_analysis", analysis_id = %Uuid::new_v4());
        self.run(text, options).instrument(span).await
    }

    async fn run(
        &self,
        text: String,
        options: AnalyzeOptions,
    ) -> Result<AnalysisResult, AnalysisError> {
        // Step 1: Length gate, before any network call
        let text = ExtractedText::new(text)?;

        // Step 2: Heuristic features
        let features = extract_features(text.as_str());
        info!(
            "Features extracted: email_found={}, years_experience={}",
            features.candidate_email.is_some(),
            features.years_experience
        );

        // Step 3: Evaluation
        let judgment = self
            .evaluator
            .evaluate(&text, features.years_experience)
            .await?;

        // Step 4: Score
        let scores = compute_score_breakdown(&judgment);
        let valid = is_valid_candidate(&judgment);
        info!(
            "Overall score: {}/10, valid_candidate={}",
            scores.overall_score, valid
        );

        // Step 5: Notification
        let email_sent = match (&features.candidate_email, valid && options.notify) {
            (Some(recipient), true) => self.notify(recipient, scores.overall_score).await,
            _ => false,
        };

        Ok(AnalysisResult::assemble(
            features, judgment, scores, valid, email_sent,
        ))
    }

    /// One delivery attempt. Failures are logged and reported as `false`.
    async fn notify(&self, recipient: &str, overall_score: f64) -> bool {
        let body = acceptance_body(overall_score);
        match self
            .notifier
            .send(recipient, ACCEPTANCE_SUBJECT, &body)
            .await
        {
            Ok(()) => {
                info!("Acceptance email sent");
                true
            }
            Err(e) => {
                warn!("Acceptance email not sent: {e}");
                false
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::analysis::notification::NotificationError;

    /// Returns a fixed judgment (or failure) and counts calls.
    pub(crate) struct FakeEvaluator {
        pub(crate) judgment: Option<EvaluationJudgment>,
        pub(crate) calls: AtomicUsize,
        pub(crate) last_years: Mutex<Option<u32>>,
    }

    impl FakeEvaluator {
        pub(crate) fn returning(judgment: EvaluationJudgment) -> Self {
            Self {
                judgment: Some(judgment),
                calls: AtomicUsize::new(0),
                last_years: Mutex::new(None),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                judgment: None,
                calls: AtomicUsize::new(0),
                last_years: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Evaluator for FakeEvaluator {
        async fn evaluate(
            &self,
            _text: &ExtractedText,
            years_experience: u32,
        ) -> Result<EvaluationJudgment, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_years.lock().unwrap() = Some(years_experience);
            self.judgment
                .clone()
                .ok_or_else(|| AnalysisError::EvaluationService("connection refused".to_string()))
        }
    }

    /// Records every send; optionally fails them all.
    pub(crate) struct FakeNotifier {
        pub(crate) fail: bool,
        pub(crate) sent: Mutex<Vec<(String, String, String)>>,
    }

    impl FakeNotifier {
        pub(crate) fn ok() -> Self {
            Self {
                fail: false,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn broken() -> Self {
            Self {
                fail: true,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send(
            &self,
            recipient: &str,
            subject: &str,
            html_body: &str,
        ) -> Result<(), NotificationError> {
            self.sent.lock().unwrap().push((
                recipient.to_string(),
                subject.to_string(),
                html_body.to_string(),
            ));
            if self.fail {
                Err(NotificationError::Disabled)
            } else {
                Ok(())
            }
        }
    }

    pub(crate) fn developer_judgment() -> EvaluationJudgment {
        EvaluationJudgment {
            is_software_developer: true,
            has_github: true,
            education_score: 8.0,
            format_score: 9.0,
            experience_score: 7.0,
            skills_score: 8.0,
            extras_score: 6.0,
            professional_summary: "Backend developer".to_string(),
            positive_points: vec!["Active GitHub".to_string()],
            ..Default::default()
        }
    }

    pub(crate) fn cv_text(email: Option<&str>) -> String {
        let mut text = String::from(
            "Software Engineer\nAcme Corp 2015 - 2022: built payment services in Rust and Go, \
             mentored four engineers, cut p99 latency by 40%.\n\
             Education: Universidad de Lima 2010 - 2014.\n\
             Skills: Rust, Go, PostgreSQL, Kubernetes, Terraform, CI/CD.\n",
        );
        if let Some(email) = email {
            text.push_str(&format!("Contact: {email}\n"));
        }
        text
    }

    fn analyzer(evaluator: &Arc<FakeEvaluator>, notifier: &Arc<FakeNotifier>) -> CvAnalyzer {
        CvAnalyzer::new(evaluator.clone(), notifier.clone())
    }

    #[tokio::test]
    async fn test_short_text_fails_before_evaluation() {
        let evaluator = Arc::new(FakeEvaluator::returning(developer_judgment()));
        let notifier = Arc::new(FakeNotifier::ok());

        let err = analyzer(&evaluator, &notifier)
            .analyze_text("Jane Doe, developer".to_string(), AnalyzeOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::InsufficientContent { .. }));
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_valid_candidate_with_email_is_notified_once() {
        let evaluator = Arc::new(FakeEvaluator::returning(developer_judgment()));
        let notifier = Arc::new(FakeNotifier::ok());

        let result = analyzer(&evaluator, &notifier)
            .analyze_text(cv_text(Some("jane@example.com")), AnalyzeOptions::default())
            .await
            .unwrap();

        assert!(result.is_valid_candidate);
        assert!(result.email_sent);
        assert_eq!(result.overall_score, 7.5);
        assert_eq!(result.candidate_email.as_deref(), Some("jane@example.com"));

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "jane@example.com");
        assert_eq!(sent[0].1, ACCEPTANCE_SUBJECT);
        assert!(sent[0].2.contains("7.50/10"));
    }

    #[tokio::test]
    async fn test_heuristic_years_are_passed_to_evaluator_and_reported() {
        let evaluator = Arc::new(FakeEvaluator::returning(developer_judgment()));
        let notifier = Arc::new(FakeNotifier::ok());

        let result = analyzer(&evaluator, &notifier)
            .analyze_text(cv_text(None), AnalyzeOptions::default())
            .await
            .unwrap();

        // 2010 .. 2022
        assert_eq!(result.years_experience, 12);
        assert_eq!(*evaluator.last_years.lock().unwrap(), Some(12));
    }

    #[tokio::test]
    async fn test_high_score_non_developer_is_not_valid() {
        let judgment = EvaluationJudgment {
            is_software_developer: false,
            has_github: true,
            education_score: 9.0,
            format_score: 9.0,
            experience_score: 9.0,
            skills_score: 9.0,
            extras_score: 9.0,
            ..Default::default()
        };
        let evaluator = Arc::new(FakeEvaluator::returning(judgment));
        let notifier = Arc::new(FakeNotifier::ok());

        let result = analyzer(&evaluator, &notifier)
            .analyze_text(cv_text(Some("jane@example.com")), AnalyzeOptions::default())
            .await
            .unwrap();

        assert_eq!(result.overall_score, 9.0);
        assert!(!result.is_valid_candidate);
        assert!(!result.email_sent);
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_no_email_means_no_dispatch() {
        let evaluator = Arc::new(FakeEvaluator::returning(developer_judgment()));
        let notifier = Arc::new(FakeNotifier::ok());

        let result = analyzer(&evaluator, &notifier)
            .analyze_text(cv_text(None), AnalyzeOptions::default())
            .await
            .unwrap();

        assert!(result.is_valid_candidate);
        assert!(result.candidate_email.is_none());
        assert!(!result.email_sent);
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_notifier_failure_only_clears_email_sent() {
        let evaluator = Arc::new(FakeEvaluator::returning(developer_judgment()));
        let ok_notifier = Arc::new(FakeNotifier::ok());
        let broken_notifier = Arc::new(FakeNotifier::broken());
        let text = cv_text(Some("jane@example.com"));

        let delivered = analyzer(&evaluator, &ok_notifier)
            .analyze_text(text.clone(), AnalyzeOptions::default())
            .await
            .unwrap();
        let failed = analyzer(&evaluator, &broken_notifier)
            .analyze_text(text, AnalyzeOptions::default())
            .await
            .unwrap();

        assert!(delivered.email_sent);
        assert!(!failed.email_sent);
        assert_eq!(broken_notifier.count(), 1);
        assert_eq!(
            failed,
            AnalysisResult {
                email_sent: false,
                ..delivered
            }
        );
    }

    #[tokio::test]
    async fn test_feedback_mode_never_notifies() {
        let evaluator = Arc::new(FakeEvaluator::returning(developer_judgment()));
        let notifier = Arc::new(FakeNotifier::ok());

        let result = analyzer(&evaluator, &notifier)
            .analyze_text(
                cv_text(Some("jane@example.com")),
                AnalyzeOptions { notify: false },
            )
            .await
            .unwrap();

        assert!(result.is_valid_candidate);
        assert!(!result.email_sent);
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_evaluation_failure_propagates() {
        let evaluator = Arc::new(FakeEvaluator::failing());
        let notifier = Arc::new(FakeNotifier::ok());

        let err = analyzer(&evaluator, &notifier)
            .analyze_text(cv_text(Some("jane@example.com")), AnalyzeOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::EvaluationService(_)));
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_missing_github_is_penalized_in_result() {
        let judgment = EvaluationJudgment {
            has_github: false,
            ..developer_judgment()
        };
        let evaluator = Arc::new(FakeEvaluator::returning(judgment));
        let notifier = Arc::new(FakeNotifier::ok());

        let result = analyzer(&evaluator, &notifier)
            .analyze_text(cv_text(None), AnalyzeOptions::default())
            .await
            .unwrap();

        assert_eq!(result.overall_score, 6.0);
        assert!(!result.has_github);
    }

    #[tokio::test]
    async fn test_result_reports_clamped_sub_scores() {
        let judgment = EvaluationJudgment {
            skills_score: 14.0,
            ..developer_judgment()
        };
        let evaluator = Arc::new(FakeEvaluator::returning(judgment));
        let notifier = Arc::new(FakeNotifier::ok());

        let result = analyzer(&evaluator, &notifier)
            .analyze_text(cv_text(None), AnalyzeOptions::default())
            .await
            .unwrap();

        assert_eq!(result.skills_score, 10.0);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_extraction_error() {
        let evaluator = Arc::new(FakeEvaluator::returning(developer_judgment()));
        let notifier = Arc::new(FakeNotifier::ok());

        let err = analyzer(&evaluator, &notifier)
            .analyze_document(Bytes::from_static(b"%PDF-garbage"), AnalyzeOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Extraction(_)));
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_result_serializes_flat_record() {
        let result = AnalysisResult::assemble(
            HeuristicFeatures {
                candidate_email: Some("a@b.com".to_string()),
                years_experience: 5,
            },
            developer_judgment(),
            compute_score_breakdown(&developer_judgment()),
            true,
            false,
        );
        let value = serde_json::to_value(&result).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "overall_score",
            "is_valid_candidate",
            "is_university_graduate",
            "is_software_developer",
            "is_from_peru",
            "has_github",
            "has_portfolio",
            "years_experience",
            "candidate_email",
            "email_sent",
            "education_score",
            "format_score",
            "experience_score",
            "skills_score",
            "extras_score",
            "positive_points",
            "improvements",
            "critical_errors",
            "suggestions",
            "education_institution",
            "professional_summary",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 21);
        assert!(obj["education_institution"].is_null());
    }
}
