//! Turns generated text into an [`AnalysisResult`].
//!
//! Interpretation never fails from the caller's point of view: text that
//! cannot be read as an analysis becomes [`AnalysisResult::parse_failure`],
//! and a failed generation call becomes
//! [`AnalysisResult::generation_failure`].

use thiserror::Error;
use tracing::error;
use trend_hunter_core::AnalysisResult;

use crate::generation::GenerationError;

const FENCE: &str = "```";

/// Why generated text could not be read as an analysis.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("response is empty")]
    Empty,
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("invalid analysis JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Remove surrounding whitespace and a Markdown code fence, if present.
///
/// ```
/// use trend_hunter::interpreter::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
/// ```
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix(FENCE) {
        body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = body.strip_suffix(FENCE) {
        body = rest;
    }
    body.trim()
}

/// Parse generated text as an analysis.
///
/// # Errors
///
/// Returns an [`InterpretError`] if the text is empty, is not a single JSON
/// object, or does not match the analysis schema.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, InterpretError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(InterpretError::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(InterpretError::NotAnObject);
    }

    Ok(serde_json::from_value(value)?)
}

/// Interpret generated text, falling back to the parse-failure analysis.
#[must_use]
pub fn interpret(text: &str) -> AnalysisResult {
    match parse_analysis(text) {
        Ok(analysis) => analysis,
        Err(e) => {
            error!(error = %e, "Failed to parse AI response");
            AnalysisResult::parse_failure()
        }
    }
}

/// Interpret the outcome of a generation call for the product `title`.
#[must_use]
pub fn interpret_outcome(outcome: Result<String, GenerationError>, title: &str) -> AnalysisResult {
    match outcome {
        Ok(text) => interpret(&text),
        Err(e) => {
            error!(product = title, error = %e, "AI analysis failed");
            AnalysisResult::generation_failure(&e.to_string())
        }
    }
}
