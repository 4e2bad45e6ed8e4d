use super::types::{FeedbackReport, Verdict};
use crate::engine::EvaluationStatus;
use crate::session::ScoreDelta;
use std::fmt::Write;

/// Plain-text rendering of a report for terminals.
pub fn render_text(report: &FeedbackReport) -> String {
    let mut out = String::new();

    let overall = report
        .overall_score
        .map_or_else(|| "n/a".to_string(), |score| format!("{score:.1}/100"));
    let _ = writeln!(
        out,
        "Revision {}: overall {overall} ({})",
        report.revision, report.verdict
    );
    let _ = writeln!(
        out,
        "Coverage: {} complete, {} partial, {} missing ({:.1}% complete)",
        report.coverage.complete,
        report.coverage.partial,
        report.coverage.missing,
        report.coverage.percent_complete
    );
    out.push('\n');

    for dimension in &report.per_dimension {
        let score = match (&dimension.status, dimension.score) {
            (EvaluationStatus::Failed { .. }, _) | (_, None) => "  --".to_string(),
            (_, Some(score)) => format!("{score:>4}"),
        };
        let _ = writeln!(
            out,
            "{score}  {:<12} {}",
            dimension.label,
            delta_marker(dimension.delta)
        );
        match &dimension.status {
            EvaluationStatus::Failed { reason } => {
                let _ = writeln!(out, "      not evaluated: {reason}");
            }
            _ if !dimension.critique.is_empty() => {
                let _ = writeln!(out, "      {}", dimension.critique);
            }
            _ => {}
        }
    }

    if !report.next_actions.is_empty() {
        out.push_str("\nNext actions:\n");
        for (i, action) in report.next_actions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {action}", i + 1);
        }
    }

    if report.verdict == Verdict::Fundable {
        out.push_str("\nThis pitch covers every dimension at a fundable level.\n");
    }
    out
}

fn delta_marker(delta: ScoreDelta) -> String {
    match delta {
        ScoreDelta::Baseline => String::new(),
        ScoreDelta::Change(0) => "(=)".to_string(),
        ScoreDelta::Change(change) => format!("({change:+})"),
        ScoreDelta::Unavailable => "(n/a)".to_string(),
    }
}
