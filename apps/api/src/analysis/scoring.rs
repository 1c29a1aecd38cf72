use crate::analysis::evaluation::EvaluationJudgment;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// Flat deduction applied to the weighted sum when no GitHub profile is found.
pub const GITHUB_PENALTY: f64 = 1.5;

pub const EDUCATION_WEIGHT: f64 = 0.15;
pub const FORMAT_WEIGHT: f64 = 0.10;
pub const EXPERIENCE_WEIGHT: f64 = 0.40;
pub const SKILLS_WEIGHT: f64 = 0.25;
pub const EXTRAS_WEIGHT: f64 = 0.10;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub education_score: f64,
    pub format_score: f64,
    pub experience_score: f64,
    pub skills_score: f64,
    pub extras_score: f64,
    pub overall_score: f64,
}

/// Weighted sum of clamped sub-scores, minus [`GITHUB_PENALTY`] without GitHub,
/// clamped to [0, 10] and rounded to two decimals.
pub fn compute_score_breakdown(judgment: &EvaluationJudgment) -> ScoreBreakdown {
    let education = clamp_score(judgment.education_score);
    let format = clamp_score(judgment.format_score);
    let experience = clamp_score(judgment.experience_score);
    let skills = clamp_score(judgment.skills_score);
    let extras = clamp_score(judgment.extras_score);

    let mut score = EDUCATION_WEIGHT * education
        + FORMAT_WEIGHT * format
        + EXPERIENCE_WEIGHT * experience
        + SKILLS_WEIGHT * skills
        + EXTRAS_WEIGHT * extras;

    if !judgment.has_github {
        score -= GITHUB_PENALTY;
    }

    ScoreBreakdown {
        education_score: education,
        format_score: format,
        experience_score: experience,
        skills_score: skills,
        extras_score: extras,
        overall_score: round_two(clamp_score(score)),
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(MIN_SCORE, MAX_SCORE)
    } else {
        MIN_SCORE
    }
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
