use super::types::{Deltas, Revision, Session};
use crate::engine::{CallGate, Evaluator};
use crate::error::{Result, SessionError};
use crate::rubric::Rubric;
use chrono::Utc;
use std::sync::{PoisonError, RwLock};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Live state of one working session.
///
/// Appends are serialized by an async writer lock held across the whole
/// evaluation. Readers only touch the `RwLock`, which is never held across
/// an await, so they see the last committed revision while an evaluation is
/// in flight.
pub struct SessionTracker {
    writer: Mutex<()>,
    state: RwLock<Session>,
    gate: CallGate,
}

impl SessionTracker {
    pub fn new(id: impl Into<String>, gate: CallGate) -> Self {
        Self {
            writer: Mutex::new(()),
            state: RwLock::new(Session::new(id)),
            gate,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.read(Clone::clone)
    }

    pub fn revisions(&self) -> Vec<Revision> {
        self.read(|session| session.revisions.clone())
    }

    /// Evaluate `pitch` and append it as the next revision.
    ///
    /// Returns the session exactly as committed by this append, so its
    /// latest revision is the one just evaluated even when other submissions
    /// are queued behind the writer lock. Nothing is appended when
    /// validation fails or `cancel` fires first.
    pub async fn append_revision(
        &self,
        evaluator: &Evaluator,
        pitch: &str,
        cancel: &CancellationToken,
    ) -> Result<Session> {
        let pitch = evaluator.validate_pitch(pitch)?;
        let _writer = self.writer.lock().await;

        let evaluations = evaluator.evaluate(pitch, &self.gate, cancel).await?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let sequence = state.next_sequence();
        let revision = Revision {
            sequence,
            pitch_text: pitch.to_string(),
            evaluations,
            created_at: Utc::now(),
        };
        state.push(revision, evaluator.rubric())?;
        tracing::info!(
            session_id = state.id.as_str(),
            sequence,
            "Revision appended"
        );
        Ok(Session::clone(&state))
    }

    pub fn delta(&self, rubric: &Rubric) -> std::result::Result<Deltas, SessionError> {
        self.read(|session| session.delta(rubric))
    }

    fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}
