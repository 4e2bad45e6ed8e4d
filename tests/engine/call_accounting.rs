use crate::scripted_provider::{ScriptedProvider, evaluator};
use pitchcoach::config::EngineConfig;
use pitchcoach::engine::EvaluationStatus;
use pitchcoach::error::LlmError;
use pitchcoach::{PitchError, SessionManager};
use std::sync::Arc;

const SHORT_PITCH: &str = "Problem: Dentists lose hours to claims.\nSolution: We automate claim filing.";

#[tokio::test]
async fn heuristic_only_run_never_calls_the_model_for_missing_dimensions() {
    let provider = Arc::new(ScriptedProvider::constant(60));
    let engine = EngineConfig {
        escalate_extraction: false,
        ..EngineConfig::default()
    };
    let manager = SessionManager::new(evaluator(provider.clone(), engine));
    let id = manager.create_session().unwrap();

    manager.submit_pitch(&id, SHORT_PITCH).await.unwrap();
    assert_eq!(provider.extract_calls(), 0);
    assert_eq!(provider.score_calls(), 2);
    let mut labels = provider.scored_labels();
    labels.sort();
    assert_eq!(labels, vec!["Problem", "Solution"]);
}

#[tokio::test]
async fn escalation_asks_once_per_weak_dimension() {
    let provider = Arc::new(ScriptedProvider::constant(60));
    let manager = SessionManager::new(evaluator(provider.clone(), EngineConfig::default()));
    let id = manager.create_session().unwrap();

    manager.submit_pitch(&id, SHORT_PITCH).await.unwrap();
    // Customer, market, competition, traction, ask.
    assert_eq!(provider.extract_calls(), 5);
    assert_eq!(provider.score_calls(), 2);
}

#[tokio::test]
async fn empty_and_oversized_pitches_are_rejected_without_calls() {
    let provider = Arc::new(ScriptedProvider::constant(60));
    let engine = EngineConfig {
        max_pitch_chars: 40,
        ..EngineConfig::default()
    };
    let manager = SessionManager::new(evaluator(provider.clone(), engine));
    let id = manager.create_session().unwrap();

    let err = manager.submit_pitch(&id, "   \n\t ").await.unwrap_err();
    assert!(matches!(err, PitchError::InvalidInput(_)), "{err}");

    let err = manager.submit_pitch(&id, &"x".repeat(41)).await.unwrap_err();
    assert!(
        matches!(err, PitchError::InputTooLarge { chars: 41, max: 40 }),
        "{err}"
    );

    assert_eq!(provider.total_calls(), 0);
    assert!(manager.revisions(&id).unwrap().is_empty());
}

#[tokio::test]
async fn exhausted_budget_fails_dimensions_instead_of_the_request() {
    let provider = Arc::new(ScriptedProvider::constant(60));
    let engine = EngineConfig {
        escalate_extraction: false,
        max_calls_per_window: 1,
        ..EngineConfig::default()
    };
    let manager = SessionManager::new(evaluator(provider.clone(), engine));
    let id = manager.create_session().unwrap();

    let report = manager.submit_pitch(&id, SHORT_PITCH).await.unwrap();
    assert_eq!(provider.score_calls(), 1);
    assert_eq!(report.unevaluated.len(), 1);
    let failed = report.dimension(&report.unevaluated[0]).unwrap();
    match &failed.status {
        EvaluationStatus::Failed { reason } => {
            let expected = LlmError::BudgetExhausted { limit: 1 }.to_string();
            assert!(reason.contains(&expected), "{reason}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
