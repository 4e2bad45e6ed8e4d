use super::tracker::SessionTracker;
use super::types::{Deltas, Revision, Session};
use crate::engine::Evaluator;
use crate::error::{Result, SessionError};
use crate::feedback::{FeedbackReport, compose};
use crate::rubric::Rubric;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Owns every live session, keyed by UUID. Sessions live in process memory
/// only and are independent of each other.
pub struct SessionManager {
    evaluator: Arc<Evaluator>,
    sessions: RwLock<HashMap<String, Arc<SessionTracker>>>,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(evaluator: Arc<Evaluator>) -> Self {
        let max_sessions = evaluator.engine_config().max_sessions;
        Self {
            evaluator,
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    pub fn rubric(&self) -> &Rubric {
        self.evaluator.rubric()
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn create_session(&self) -> std::result::Result<String, SessionError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.len() >= self.max_sessions {
            return Err(SessionError::Capacity {
                max: self.max_sessions,
            });
        }

        let id = Uuid::new_v4().to_string();
        sessions.insert(
            id.clone(),
            Arc::new(SessionTracker::new(id.clone(), self.evaluator.new_gate())),
        );
        tracing::info!(session_id = id.as_str(), "Session created");
        Ok(id)
    }

    /// Destroy a session. In-flight submissions finish against the detached
    /// tracker and are then dropped with it.
    pub fn end_session(&self, session_id: &str) -> std::result::Result<(), SessionError> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id);
        match removed {
            Some(_) => {
                tracing::info!(session_id, "Session ended");
                Ok(())
            }
            None => Err(SessionError::NotFound(session_id.to_string())),
        }
    }

    pub fn session(&self, session_id: &str) -> std::result::Result<Arc<SessionTracker>, SessionError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Evaluate a new revision of the pitch and return the refreshed report.
    pub async fn submit_pitch(&self, session_id: &str, pitch: &str) -> Result<FeedbackReport> {
        self.submit_pitch_with_cancel(session_id, pitch, &CancellationToken::new())
            .await
    }

    pub async fn submit_pitch_with_cancel(
        &self,
        session_id: &str,
        pitch: &str,
        cancel: &CancellationToken,
    ) -> Result<FeedbackReport> {
        let committed = self
            .session(session_id)?
            .append_revision(&self.evaluator, pitch, cancel)
            .await?;
        self.compose_for(&committed)
    }

    /// Report for the latest revision.
    pub fn report(&self, session_id: &str) -> Result<FeedbackReport> {
        self.compose_for(&self.session(session_id)?.snapshot())
    }

    pub fn revisions(&self, session_id: &str) -> std::result::Result<Vec<Revision>, SessionError> {
        Ok(self.session(session_id)?.revisions())
    }

    pub fn delta(&self, session_id: &str) -> std::result::Result<Deltas, SessionError> {
        self.session(session_id)?.delta(self.rubric())
    }

    fn compose_for(&self, session: &Session) -> Result<FeedbackReport> {
        Ok(compose(
            session,
            self.rubric(),
            self.evaluator.engine_config(),
        )?)
    }
}
