// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps numeric category scores inside the accepted range.
pub const SCORE_RANGE_INSTRUCTION: &str = "\
    IMPORTANT: every score must be a number between 0 and 10 inclusive. \
    Never exceed 10.";
