use crate::scripted_provider::{
    PromptKind, ScriptedProvider, evaluator, evaluator_with_reliability, evaluator_with_rubric,
    score_reply,
};
use pitchcoach::config::{EngineConfig, ReliabilityConfig};
use pitchcoach::engine::EvaluationStatus;
use pitchcoach::error::LlmError;
use pitchcoach::feedback::{CoverageLevel, Verdict};
use pitchcoach::rubric::{Rubric, RubricDimension};
use pitchcoach::session::ScoreDelta;
use pitchcoach::SessionManager;
use std::sync::Arc;
use std::time::Duration;

const DENTISTS_V1: &str = "Problem: Dentists lose hours to claims.\nSolution: We automate claim filing.";
const DENTISTS_V2: &str = "Problem: Dentists lose hours to claims.\nSolution: We automate claim filing.\nMarket: The addressable market is $4B across US dental clinics.";

fn dentist_scores() -> ScriptedProvider {
    ScriptedProvider::new(|kind, label, _| match kind {
        PromptKind::Extract => Ok("NONE".into()),
        PromptKind::Score => {
            let score = match label {
                "Problem" => 70,
                "Solution" => 60,
                "Market" => 55,
                _ => 50,
            };
            Ok(score_reply(score, &format!("{label} needs numbers. Quantify it.")))
        }
    })
}

fn three_part_rubric() -> Rubric {
    Rubric::new(vec![
        RubricDimension::new("problem", "Problem", "The pain"),
        RubricDimension::new("solution", "Solution", "The product"),
        RubricDimension::new("market", "Market", "The opportunity"),
    ])
    .unwrap()
}

const THREE_PART_PITCH: &str =
    "Problem: Clinics drown in paperwork.\nSolution: A filing assistant.\nMarket: Every clinic in the US.";

#[tokio::test]
async fn missing_market_is_flagged_then_credited_on_revision() {
    let provider = Arc::new(dentist_scores());
    let manager = SessionManager::new(evaluator(provider.clone(), EngineConfig::default()));
    let id = manager.create_session().unwrap();

    let first = manager.submit_pitch(&id, DENTISTS_V1).await.unwrap();
    assert_eq!(first.revision, 1);
    let market = first.dimension("market").unwrap();
    assert_eq!(market.status, EvaluationStatus::Missing);
    assert_eq!(market.score, Some(0));
    assert!(market.critique.contains("market sizing"), "{}", market.critique);
    assert_eq!(market.coverage, CoverageLevel::Missing);
    assert_eq!(market.delta, ScoreDelta::Baseline);
    assert!(!provider.scored_labels().contains(&"Market".to_string()));
    assert_eq!(first.verdict, Verdict::NotFundableYet);
    assert!(first.next_actions.iter().any(|a| a.starts_with("Add a Market section")));

    let second = manager.submit_pitch(&id, DENTISTS_V2).await.unwrap();
    assert_eq!(second.revision, 2);
    let market = second.dimension("market").unwrap();
    assert_eq!(market.status, EvaluationStatus::Scored);
    assert_eq!(market.score, Some(55));
    assert_eq!(market.delta, ScoreDelta::Change(55));
    assert_eq!(second.dimension("problem").unwrap().delta, ScoreDelta::Change(0));
    assert!(second.overall_score.unwrap() > first.overall_score.unwrap());
}

#[tokio::test]
async fn priorities_run_weakest_first() {
    let provider = Arc::new(ScriptedProvider::new(|_, label, _| {
        let score = match label {
            "Problem" => 80,
            "Solution" => 20,
            _ => 50,
        };
        Ok(score_reply(score, "Tighten this. Add evidence."))
    }));
    let manager = SessionManager::new(evaluator_with_rubric(
        provider.clone(),
        three_part_rubric(),
        EngineConfig::default(),
    ));
    let id = manager.create_session().unwrap();

    let report = manager.submit_pitch(&id, THREE_PART_PITCH).await.unwrap();
    assert_eq!(report.top_priorities, vec!["solution", "market", "problem"]);
    assert_eq!(report.overall_score, Some(50.0));
    assert_eq!(report.coverage.complete, 3);
    assert_eq!(provider.extract_calls(), 0);
    assert!(report.next_actions[0].starts_with("Solution:"));
}

#[tokio::test]
async fn strong_complete_pitch_is_fundable() {
    let provider = Arc::new(ScriptedProvider::constant(90));
    let manager = SessionManager::new(evaluator_with_rubric(
        provider,
        three_part_rubric(),
        EngineConfig::default(),
    ));
    let id = manager.create_session().unwrap();

    let report = manager.submit_pitch(&id, THREE_PART_PITCH).await.unwrap();
    assert_eq!(report.verdict, Verdict::Fundable);
    assert_eq!(report.verdict.to_string(), "fundable");
    assert!(report.unevaluated.is_empty());
}

#[tokio::test]
async fn one_failed_dimension_leaves_the_rest_scored() {
    let provider = Arc::new(ScriptedProvider::new(|kind, label, _| match (kind, label) {
        (PromptKind::Score, "Market") => Err(LlmError::Rejected {
            provider: "scripted".into(),
            status: 400,
            message: "content filtered".into(),
        }),
        _ => Ok(score_reply(65, "Reasonable. Be more specific.")),
    }));
    let manager = SessionManager::new(evaluator_with_rubric(
        provider,
        three_part_rubric(),
        EngineConfig::default(),
    ));
    let id = manager.create_session().unwrap();

    let report = manager.submit_pitch(&id, THREE_PART_PITCH).await.unwrap();
    assert_eq!(report.unevaluated, vec!["market"]);
    let market = report.dimension("market").unwrap();
    assert!(matches!(market.status, EvaluationStatus::Failed { .. }));
    assert_eq!(market.score, None);
    assert!(!report.top_priorities.contains(&"market".to_string()));
    assert_eq!(report.dimension("problem").unwrap().score, Some(65));
    assert_eq!(report.overall_score, Some(65.0));
    assert_eq!(report.verdict, Verdict::NotFundableYet);
}

#[tokio::test]
async fn unparsable_reply_fails_only_that_dimension() {
    let provider = Arc::new(ScriptedProvider::new(|_, label, _| {
        if label == "Solution" {
            Ok("I would rather not say.".into())
        } else {
            Ok(score_reply(70, "Fine. Add proof."))
        }
    }));
    let manager = SessionManager::new(evaluator_with_rubric(
        provider,
        three_part_rubric(),
        EngineConfig::default(),
    ));
    let id = manager.create_session().unwrap();

    let report = manager.submit_pitch(&id, THREE_PART_PITCH).await.unwrap();
    match &report.dimension("solution").unwrap().status {
        EvaluationStatus::Failed { reason } => assert!(reason.contains("unparsable"), "{reason}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(report.unevaluated, vec!["solution"]);
}

#[tokio::test]
async fn model_extracted_excerpt_is_scored() {
    let pitch = "Problem: Dentists lose hours to claims.\nSolution: We automate claim filing. Three clinics pay us monthly.";
    let provider = Arc::new(ScriptedProvider::new(|kind, label, _| match (kind, label) {
        (PromptKind::Extract, "Traction") => Ok(
            r#"{"excerpt": "Three clinics pay us monthly.", "confidence": 0.8}"#.into(),
        ),
        (PromptKind::Extract, "Competition") => Ok(
            r#"{"excerpt": "We beat every rival on price.", "confidence": 0.9}"#.into(),
        ),
        (PromptKind::Extract, _) => Ok("NONE".into()),
        (PromptKind::Score, _) => Ok(score_reply(40, "Early. Show growth.")),
    }));
    let manager = SessionManager::new(evaluator(provider.clone(), EngineConfig::default()));
    let id = manager.create_session().unwrap();

    let report = manager.submit_pitch(&id, pitch).await.unwrap();
    assert_eq!(report.dimension("traction").unwrap().status, EvaluationStatus::Scored);
    // Not verbatim in the pitch, so discarded.
    assert_eq!(
        report.dimension("competition").unwrap().status,
        EvaluationStatus::Missing
    );

    let revisions = manager.revisions(&id).unwrap();
    let traction = revisions[0].evaluation("traction").unwrap();
    assert_eq!(traction.span.text, "Three clinics pay us monthly.");
    assert_eq!(&pitch[traction.span.start..traction.span.end], traction.span.text);
    assert!(provider.scored_labels().contains(&"Traction".to_string()));
}

#[tokio::test]
async fn slow_dimension_times_out_into_a_failure() {
    let provider = Arc::new(
        ScriptedProvider::constant(75).with_delay_for("Market", Duration::from_secs(3)),
    );
    let reliability = ReliabilityConfig {
        generation_timeout_secs: 1,
        ..ReliabilityConfig::default()
    };
    let manager = SessionManager::new(evaluator_with_reliability(
        provider,
        three_part_rubric(),
        EngineConfig::default(),
        reliability,
    ));
    let id = manager.create_session().unwrap();

    let report = manager.submit_pitch(&id, THREE_PART_PITCH).await.unwrap();
    assert_eq!(report.unevaluated, vec!["market"]);
    match &report.dimension("market").unwrap().status {
        EvaluationStatus::Failed { reason } => assert!(reason.contains("timed out"), "{reason}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(report.dimension("problem").unwrap().score, Some(75));
    assert_eq!(report.dimension("solution").unwrap().score, Some(75));
    assert_eq!(report.overall_score, Some(75.0));
}
