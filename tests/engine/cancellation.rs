use crate::scripted_provider::{ScriptedProvider, evaluator};
use pitchcoach::config::EngineConfig;
use pitchcoach::{PitchError, SessionManager};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const PITCH: &str = "Problem: Dentists lose hours to claims.\nSolution: We automate claim filing.";

#[tokio::test]
async fn cancelling_mid_evaluation_appends_nothing() {
    let provider =
        Arc::new(ScriptedProvider::constant(60).with_delay(Duration::from_secs(3)));
    let manager = Arc::new(SessionManager::new(evaluator(
        provider.clone(),
        EngineConfig::default(),
    )));
    let id = manager.create_session().unwrap();
    let cancel = CancellationToken::new();

    let task = {
        let manager = Arc::clone(&manager);
        let id = id.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { manager.submit_pitch_with_cancel(&id, PITCH, &cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("cancellation should return promptly")
        .unwrap();
    assert!(matches!(result, Err(PitchError::Cancelled)));
    assert!(provider.total_calls() > 0);
    assert!(manager.revisions(&id).unwrap().is_empty());
    assert!(manager.report(&id).is_err());
}

#[tokio::test]
async fn already_cancelled_submission_makes_no_calls() {
    let provider = Arc::new(ScriptedProvider::constant(60));
    let manager = SessionManager::new(evaluator(provider.clone(), EngineConfig::default()));
    let id = manager.create_session().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = manager.submit_pitch_with_cancel(&id, PITCH, &cancel).await;
    assert!(matches!(result, Err(PitchError::Cancelled)));
    assert_eq!(provider.total_calls(), 0);
    assert!(manager.revisions(&id).unwrap().is_empty());
}

#[tokio::test]
async fn session_accepts_a_new_revision_after_cancellation() {
    let provider = Arc::new(ScriptedProvider::constant(60));
    let manager = SessionManager::new(evaluator(provider, EngineConfig::default()));
    let id = manager.create_session().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let _ = manager.submit_pitch_with_cancel(&id, PITCH, &cancel).await;

    let report = manager.submit_pitch(&id, PITCH).await.unwrap();
    assert_eq!(report.revision, 1);
}
