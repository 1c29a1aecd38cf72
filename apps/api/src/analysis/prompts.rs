// All LLM prompt constants for the Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SCORE_RANGE_INSTRUCTION};

/// Recruiter persona for CV evaluation. Appended with the JSON-only fragment at call time.
pub const CV_EVALUATION_SYSTEM: &str = "You are a senior technical recruiter who values \
    REAL EVIDENCE over titles. A GitHub profile is critical evidence of ability.";

/// CV evaluation prompt template. Replace `{cv_text}`, `{years_experience}` and
/// `{score_range}` before sending.
pub const CV_EVALUATION_PROMPT_TEMPLATE: &str = r#"Analyze the following CV.

CV TEXT:
{cv_text}

YEARS OF EXPERIENCE DETECTED: {years_experience} years

CRITERIA:

1. EDUCATION (15%)
- Technical or university training (both count)
- A technical graduate with GitHub outranks a university graduate without projects

2. PRESENTATION (10%)
- Clear structure, complete information

3. EXPERIENCE (40%) - MOST IMPORTANT
- Real projects
- Demonstrated impact

4. TECHNICAL SKILLS (25%)
- Up-to-date stack
- MUST have GitHub

5. EVIDENCE AND EXTRAS (10%)
- GitHub, portfolio, notable projects
- No GitHub is a significant negative

{score_range}

Return a JSON object with this EXACT schema (no extra fields):
{
  "is_university_graduate": boolean,
  "is_software_developer": boolean,
  "is_from_peru": boolean,
  "has_github": boolean,
  "has_portfolio": boolean,
  "education_institution": "institution name" | null,
  "professional_summary": "short objective summary",

  "education_score": number (0-10),
  "format_score": number (0-10),
  "experience_score": number (0-10),
  "skills_score": number (0-10),
  "extras_score": number (0-10),

  "positive_points": ["strength 1", "strength 2"],
  "improvements": ["improvement 1", "improvement 2"],
  "critical_errors": ["only if serious errors exist"],
  "suggestions": ["recommendation 1"]
}"#;

pub fn build_evaluation_system() -> String {
    format!("{CV_EVALUATION_SYSTEM} {JSON_ONLY_SYSTEM}")
}

pub fn build_evaluation_prompt(cv_text: &str, years_experience: u32) -> String {
    CV_EVALUATION_PROMPT_TEMPLATE
        .replace("{years_experience}", &years_experience.to_string())
        .replace("{score_range}", SCORE_RANGE_INSTRUCTION)
        // CV text last so placeholders inside the CV are never substituted
        .replace("{cv_text}", cv_text)
}
