//! Heuristic signals read straight from CV text, without the evaluation service.

use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on the years-of-experience heuristic.
pub const MAX_YEARS_EXPERIENCE: u32 = 30;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid year regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeuristicFeatures {
    pub candidate_email: Option<String>,
    pub years_experience: u32,
}

pub fn extract_features(text: &str) -> HeuristicFeatures {
    HeuristicFeatures {
        candidate_email: extract_email(text),
        years_experience: extract_years_of_experience(text),
    }
}

/// Returns the first email-shaped substring in document order.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Span between the earliest and latest 19xx/20xx year in the text, capped at 30.
/// A single year (or none) gives 0.
pub fn extract_years_of_experience(text: &str) -> u32 {
    let years: Vec<u32> = YEAR_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    if years.len() < 2 {
        return 0;
    }

    let (Some(&start), Some(&end)) = (years.iter().min(), years.iter().max()) else {
        return 0;
    };

    end.saturating_sub(start).min(MAX_YEARS_EXPERIENCE)
}
