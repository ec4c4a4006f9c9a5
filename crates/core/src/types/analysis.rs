//! AI-generated product analysis.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Quality flag carried by an analysis whose generated text could not be
/// interpreted.
pub const PARSE_FAILURE_FLAG: &str = "Analysis incomplete";

/// Quality flag carried by an analysis whose generation call never returned
/// usable text.
pub const GENERATION_FAILURE_FLAG: &str = "Analysis failed";

/// Errors that can occur when validating an analysis.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The virality score is outside 0-100.
    #[error("virality score must be between 0 and 100 (got {0})")]
    ScoreOutOfRange(String),
    /// The virality score is not a whole number.
    #[error("virality score must be an integer (got {0})")]
    NotAnInteger(String),
}

/// Virality score from 0 (no potential) to 100 (certain hit).
///
/// Out-of-range values are rejected, never clamped:
///
/// ```
/// use trend_hunter_core::ViralityScore;
///
/// assert!(ViralityScore::new(0).is_ok());
/// assert!(ViralityScore::new(100).is_ok());
/// assert!(ViralityScore::new(150).is_err());
/// assert!(ViralityScore::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct ViralityScore(u8);

impl ViralityScore {
    /// Lowest score; also the score of a failed generation call.
    pub const MIN: Self = Self(0);
    /// Midpoint score; the score of an uninterpretable response.
    pub const NEUTRAL: Self = Self(50);
    /// Highest score.
    pub const MAX: Self = Self(100);

    /// Validate a score.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ScoreOutOfRange`] unless `0 <= value <= 100`.
    pub fn new(value: i64) -> Result<Self, AnalysisError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX.0)
            .map(Self)
            .ok_or_else(|| AnalysisError::ScoreOutOfRange(value.to_string()))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ViralityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ViralityScore> for u8 {
    fn from(score: ViralityScore) -> Self {
        score.0
    }
}

/// Score as it may appear in generated JSON.
///
/// Models occasionally emit `85.0` or `"85"`; both are accepted as long as
/// they denote a whole number.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ScoreValue {
    fn into_score(self) -> Result<ViralityScore, AnalysisError> {
        match self {
            Self::Int(v) => ViralityScore::new(v),
            Self::Float(v) => {
                if !v.is_finite() || v.fract() != 0.0 {
                    return Err(AnalysisError::NotAnInteger(v.to_string()));
                }
                if !(0.0..=100.0).contains(&v) {
                    return Err(AnalysisError::ScoreOutOfRange(v.to_string()));
                }
                #[allow(clippy::cast_possible_truncation)]
                let whole = v as i64;
                ViralityScore::new(whole)
            }
            Self::Text(s) => match s.trim().parse::<i64>() {
                Ok(v) => ViralityScore::new(v),
                Err(_) => Err(AnalysisError::NotAnInteger(s)),
            },
        }
    }
}

impl<'de> Deserialize<'de> for ViralityScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ScoreValue::deserialize(deserializer)?
            .into_score()
            .map_err(serde::de::Error::custom)
    }
}

/// Analysis of one product produced by interpreting generated text.
///
/// The four text fields are required in generated JSON; the phrase lists
/// default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub virality_score: ViralityScore,
    /// Why the product is trending.
    pub why_winning: String,
    /// Main pain point the product addresses.
    pub problem_solved: String,
    #[serde(default)]
    pub emotional_triggers: Vec<String>,
    #[serde(default)]
    pub marketing_angles: Vec<String>,
    /// Potential quality issues. Degraded analyses carry a single sentinel.
    #[serde(default)]
    pub quality_flags: Vec<String>,
    pub target_audience: String,
    #[serde(default)]
    pub ad_hooks: Vec<String>,
}

impl AnalysisResult {
    /// Fallback for generated text that could not be interpreted.
    #[must_use]
    pub fn parse_failure() -> Self {
        Self {
            virality_score: ViralityScore::NEUTRAL,
            why_winning: "Unable to analyze - AI response parsing failed".to_string(),
            problem_solved: "Unknown".to_string(),
            emotional_triggers: Vec::new(),
            marketing_angles: Vec::new(),
            quality_flags: vec![PARSE_FAILURE_FLAG.to_string()],
            target_audience: "General consumers".to_string(),
            ad_hooks: Vec::new(),
        }
    }

    /// Fallback for a generation call that failed outright.
    #[must_use]
    pub fn generation_failure(reason: &str) -> Self {
        Self {
            virality_score: ViralityScore::MIN,
            why_winning: format!("Analysis failed: {reason}"),
            problem_solved: "Unknown".to_string(),
            emotional_triggers: Vec::new(),
            marketing_angles: Vec::new(),
            quality_flags: vec![GENERATION_FAILURE_FLAG.to_string()],
            target_audience: "Unknown".to_string(),
            ad_hooks: Vec::new(),
        }
    }

    /// Whether this is a fallback rather than a genuine analysis.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.quality_flags
            .iter()
            .any(|flag| flag == PARSE_FAILURE_FLAG || flag == GENERATION_FAILURE_FLAG)
    }
}
