use crate::engine::EvaluationStatus;
use crate::session::ScoreDelta;
use serde::{Deserialize, Serialize};

/// How completely the pitch addresses a dimension, judged by span confidence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CoverageLevel {
    Complete,
    Partial,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub complete: usize,
    pub partial: usize,
    pub missing: usize,
    pub percent_complete: f64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    #[strum(to_string = "fundable")]
    Fundable,
    #[strum(to_string = "not fundable yet")]
    NotFundableYet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionFeedback {
    pub dimension_id: String,
    pub label: String,
    pub status: EvaluationStatus,
    pub score: Option<u8>,
    pub critique: String,
    pub delta: ScoreDelta,
    pub coverage: CoverageLevel,
}

/// Structured feedback for the latest revision of a session. Derived on
/// demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub session_id: String,
    pub revision: u32,
    pub overall_score: Option<f64>,
    pub verdict: Verdict,
    pub per_dimension: Vec<DimensionFeedback>,
    /// Evaluated dimensions, weakest first.
    pub top_priorities: Vec<String>,
    /// Dimensions whose evaluation failed.
    pub unevaluated: Vec<String>,
    pub next_actions: Vec<String>,
    pub coverage: Coverage,
}

impl FeedbackReport {
    pub fn dimension(&self, dimension_id: &str) -> Option<&DimensionFeedback> {
        self.per_dimension
            .iter()
            .find(|d| d.dimension_id == dimension_id)
    }
}
