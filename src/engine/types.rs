use serde::{Deserialize, Serialize};

/// Which matching tier attributed a span.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpanSource {
    Section,
    Keywords,
    Generated,
    None,
}

/// The part of a pitch attributed to one rubric dimension.
///
/// `start..end` are byte offsets into the pitch and `text` is exactly that
/// slice. An absent dimension has empty text and zero confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub dimension_id: String,
    pub text: String,
    pub confidence: f64,
    pub start: usize,
    pub end: usize,
    pub source: SpanSource,
}

impl Span {
    pub fn absent(dimension_id: &str) -> Self {
        Self {
            dimension_id: dimension_id.to_string(),
            text: String::new(),
            confidence: 0.0,
            start: 0,
            end: 0,
            source: SpanSource::None,
        }
    }

    /// Slice `pitch[start..end]` into a span. `None` when the range is empty
    /// or does not fall on character boundaries.
    pub fn from_range(
        dimension_id: &str,
        pitch: &str,
        start: usize,
        end: usize,
        confidence: f64,
        source: SpanSource,
    ) -> Option<Self> {
        let text = pitch.get(start..end)?;
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            dimension_id: dimension_id.to_string(),
            text: text.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
            start,
            end,
            source,
        })
    }

    pub fn is_absent(&self) -> bool {
        self.confidence <= 0.0 || self.text.trim().is_empty()
    }
}

/// One span per rubric dimension, in rubric order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    spans: Vec<Span>,
}

impl Decomposition {
    pub(crate) fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn get(&self, dimension_id: &str) -> Option<&Span> {
        self.spans.iter().find(|s| s.dimension_id == dimension_id)
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn into_spans(self) -> Vec<Span> {
        self.spans
    }
}

/// Outcome of evaluating one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EvaluationStatus {
    Scored,
    /// Absent from the pitch; carries the fixed low score.
    Missing,
    /// Could not be evaluated; carries no score.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub dimension_id: String,
    pub score: Option<u8>,
    pub critique: String,
    pub span: Span,
    pub status: EvaluationStatus,
}

impl Evaluation {
    pub fn scored(span: Span, score: u8, critique: String) -> Self {
        Self {
            dimension_id: span.dimension_id.clone(),
            score: Some(score.min(100)),
            critique,
            span,
            status: EvaluationStatus::Scored,
        }
    }

    pub fn missing(span: Span, score: u8, critique: String) -> Self {
        Self {
            dimension_id: span.dimension_id.clone(),
            score: Some(score.min(100)),
            critique,
            span,
            status: EvaluationStatus::Missing,
        }
    }

    pub fn failed(span: Span, reason: impl Into<String>) -> Self {
        Self {
            dimension_id: span.dimension_id.clone(),
            score: None,
            critique: String::new(),
            span,
            status: EvaluationStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    /// Scored or missing: the dimension has a usable score.
    pub fn is_evaluated(&self) -> bool {
        !matches!(self.status, EvaluationStatus::Failed { .. })
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.status, EvaluationStatus::Missing)
    }
}
