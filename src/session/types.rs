use crate::engine::Evaluation;
use crate::error::SessionError;
use crate::rubric::Rubric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One full evaluation pass over a version of the pitch. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub sequence: u32,
    pub pitch_text: String,
    pub evaluations: Vec<Evaluation>,
    pub created_at: DateTime<Utc>,
}

impl Revision {
    pub fn evaluation(&self, dimension_id: &str) -> Option<&Evaluation> {
        self.evaluations
            .iter()
            .find(|e| e.dimension_id == dimension_id)
    }

    pub fn score(&self, dimension_id: &str) -> Option<u8> {
        self.evaluation(dimension_id).and_then(|e| e.score)
    }
}

/// Change in a dimension's score between the two latest revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScoreDelta {
    /// Only one revision exists.
    Baseline,
    /// Latest minus previous score.
    Change(i32),
    /// One side has no score.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionDelta {
    pub dimension_id: String,
    pub delta: ScoreDelta,
}

/// Per-dimension deltas in rubric order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deltas(Vec<DimensionDelta>);

impl Deltas {
    pub fn get(&self, dimension_id: &str) -> Option<ScoreDelta> {
        self.0
            .iter()
            .find(|d| d.dimension_id == dimension_id)
            .map(|d| d.delta)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DimensionDelta> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordered revision history of one working session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub revisions: Vec<Revision>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            revisions: Vec::new(),
        }
    }

    pub fn latest(&self) -> Option<&Revision> {
        self.revisions.last()
    }

    pub fn previous(&self) -> Option<&Revision> {
        self.revisions.len().checked_sub(2).map(|i| &self.revisions[i])
    }

    pub fn next_sequence(&self) -> u32 {
        self.latest().map_or(1, |r| r.sequence + 1)
    }

    /// Append `revision`, enforcing sequence order and one evaluation per
    /// rubric dimension in rubric order.
    pub fn push(&mut self, revision: Revision, rubric: &Rubric) -> Result<(), SessionError> {
        let expected = self.next_sequence();
        if revision.sequence != expected {
            return Err(SessionError::OutOfOrder {
                expected,
                got: revision.sequence,
            });
        }

        if revision.evaluations.len() != rubric.len() {
            return Err(SessionError::IncompleteRevision {
                sequence: revision.sequence,
                detail: format!(
                    "{} evaluations for {} dimensions",
                    revision.evaluations.len(),
                    rubric.len()
                ),
            });
        }
        if let Some((evaluation, dimension)) = revision
            .evaluations
            .iter()
            .zip(rubric)
            .find(|(e, d)| e.dimension_id != d.id)
        {
            return Err(SessionError::IncompleteRevision {
                sequence: revision.sequence,
                detail: format!(
                    "expected dimension {}, found {}",
                    dimension.id, evaluation.dimension_id
                ),
            });
        }

        self.revisions.push(revision);
        Ok(())
    }

    /// Score deltas between the latest two revisions, in rubric order.
    pub fn delta(&self, rubric: &Rubric) -> Result<Deltas, SessionError> {
        let latest = self.latest().ok_or(SessionError::Empty)?;
        let previous = self.previous();

        Ok(Deltas(
            rubric
                .iter()
                .map(|dimension| {
                    let delta = match previous {
                        None => ScoreDelta::Baseline,
                        Some(previous) => match (
                            latest.score(&dimension.id),
                            previous.score(&dimension.id),
                        ) {
                            (Some(now), Some(before)) => {
                                ScoreDelta::Change(i32::from(now) - i32::from(before))
                            }
                            _ => ScoreDelta::Unavailable,
                        },
                    };
                    DimensionDelta {
                        dimension_id: dimension.id.clone(),
                        delta,
                    }
                })
                .collect(),
        ))
    }
}
