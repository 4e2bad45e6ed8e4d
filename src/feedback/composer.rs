use super::types::{Coverage, CoverageLevel, DimensionFeedback, FeedbackReport, Verdict};
use crate::config::EngineConfig;
use crate::engine::{Evaluation, EvaluationStatus, first_sentence};
use crate::error::SessionError;
use crate::rubric::{Rubric, RubricDimension};
use crate::session::{ScoreDelta, Session};

/// Build the feedback report for the latest revision of `session`.
pub fn compose(
    session: &Session,
    rubric: &Rubric,
    config: &EngineConfig,
) -> Result<FeedbackReport, SessionError> {
    let latest = session.latest().ok_or(SessionError::Empty)?;
    let deltas = session.delta(rubric)?;

    let mut per_dimension = Vec::with_capacity(rubric.len());
    for dimension in rubric {
        let evaluation =
            latest
                .evaluation(&dimension.id)
                .ok_or_else(|| SessionError::IncompleteRevision {
                    sequence: latest.sequence,
                    detail: format!("no evaluation for {}", dimension.id),
                })?;
        per_dimension.push(DimensionFeedback {
            dimension_id: dimension.id.clone(),
            label: dimension.label.clone(),
            status: evaluation.status.clone(),
            score: evaluation.score,
            critique: evaluation.critique.clone(),
            delta: deltas.get(&dimension.id).unwrap_or(ScoreDelta::Unavailable),
            coverage: coverage_level(evaluation, config.confidence_threshold),
        });
    }

    let overall_score = overall_score(&latest.evaluations, rubric);
    let top_priorities = top_priorities(&per_dimension);
    let unevaluated: Vec<String> = per_dimension
        .iter()
        .filter(|d| matches!(d.status, EvaluationStatus::Failed { .. }))
        .map(|d| d.dimension_id.clone())
        .collect();
    let next_actions = next_actions(&top_priorities, &per_dimension, rubric, config.max_next_actions);
    let coverage = coverage(&per_dimension);

    let any_missing = per_dimension
        .iter()
        .any(|d| d.status == EvaluationStatus::Missing);
    let verdict = match overall_score {
        Some(score) if score >= config.fundable_threshold && !any_missing && unevaluated.is_empty() => {
            Verdict::Fundable
        }
        _ => Verdict::NotFundableYet,
    };

    Ok(FeedbackReport {
        session_id: session.id.clone(),
        revision: latest.sequence,
        overall_score,
        verdict,
        per_dimension,
        top_priorities,
        unevaluated,
        next_actions,
        coverage,
    })
}

/// Weighted mean over evaluated dimensions, normalized by the weights
/// actually included. One decimal.
fn overall_score(evaluations: &[Evaluation], rubric: &Rubric) -> Option<f64> {
    let (weighted, total_weight) = evaluations
        .iter()
        .filter_map(|e| {
            let score = e.score?;
            let weight = rubric.get(&e.dimension_id)?.weight;
            Some((f64::from(score) * weight, weight))
        })
        .fold((0.0, 0.0), |(sum, total), (value, weight)| {
            (sum + value, total + weight)
        });

    (total_weight > 0.0).then(|| (weighted / total_weight * 10.0).round() / 10.0)
}

/// Scored or missing dimensions sorted ascending by score. `per_dimension`
/// is in rubric order and the sort is stable, so ties keep declared order.
fn top_priorities(per_dimension: &[DimensionFeedback]) -> Vec<String> {
    let mut evaluated: Vec<(u8, &str)> = per_dimension
        .iter()
        .filter_map(|d| d.score.map(|score| (score, d.dimension_id.as_str())))
        .collect();
    evaluated.sort_by_key(|&(score, _)| score);
    evaluated.into_iter().map(|(_, id)| id.to_string()).collect()
}

fn next_actions(
    priorities: &[String],
    per_dimension: &[DimensionFeedback],
    rubric: &Rubric,
    limit: usize,
) -> Vec<String> {
    priorities
        .iter()
        .filter_map(|id| {
            let feedback = per_dimension.iter().find(|d| &d.dimension_id == id)?;
            let dimension = rubric.get(id)?;
            Some(action_for(feedback, dimension))
        })
        .take(limit)
        .collect()
}

fn action_for(feedback: &DimensionFeedback, dimension: &RubricDimension) -> String {
    if feedback.status == EvaluationStatus::Missing {
        let hint = dimension.missing_hint.trim();
        return if hint.is_empty() {
            format!("Add a {} section to the pitch.", dimension.label)
        } else {
            format!("Add a {} section: {hint}", dimension.label)
        };
    }

    let advice = first_sentence(&feedback.critique);
    let advice = if advice.is_empty() {
        format!("strengthen the {} section.", dimension.label)
    } else {
        advice.to_string()
    };
    match feedback.delta {
        ScoreDelta::Change(change) if change < 0 => format!(
            "{} regressed by {} points since the last revision: {advice}",
            dimension.label,
            change.unsigned_abs()
        ),
        _ => format!("{}: {advice}", dimension.label),
    }
}

fn coverage_level(evaluation: &Evaluation, threshold: f64) -> CoverageLevel {
    let confidence = evaluation.span.confidence;
    if evaluation.span.is_absent() {
        CoverageLevel::Missing
    } else if confidence >= threshold {
        CoverageLevel::Complete
    } else {
        CoverageLevel::Partial
    }
}

fn coverage(per_dimension: &[DimensionFeedback]) -> Coverage {
    let count = |level| per_dimension.iter().filter(|d| d.coverage == level).count();
    let complete = count(CoverageLevel::Complete);
    #[allow(clippy::cast_precision_loss)]
    let percent_complete = if per_dimension.is_empty() {
        0.0
    } else {
        (complete as f64 / per_dimension.len() as f64 * 1000.0).round() / 10.0
    };
    Coverage {
        complete,
        partial: count(CoverageLevel::Partial),
        missing: count(CoverageLevel::Missing),
        percent_complete,
    }
}
