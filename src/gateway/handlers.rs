use super::{AppState, SubmitPitchBody};
use crate::error::{PitchError, SessionError};
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tokio_util::sync::CancellationToken;

/// Error response: status plus `{"error": message}`.
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<PitchError> for ApiError {
    fn from(err: PitchError) -> Self {
        let status = match &err {
            PitchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PitchError::InputTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            PitchError::Session(session) => return session.clone().into(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {err}");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match err {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Empty => StatusCode::CONFLICT,
            SessionError::Capacity { .. } => StatusCode::SERVICE_UNAVAILABLE,
            SessionError::OutOfOrder { .. } | SessionError::IncompleteRevision { .. } => {
                tracing::error!("Session invariant violated: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// GET /health
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.sessions.session_count(),
        "dimensions": state.sessions.rubric().len(),
    }))
}

/// GET /rubric: the active rubric, in declared order
pub(super) async fn handle_rubric(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.sessions.rubric().clone())
}

/// POST /sessions
pub(super) async fn handle_create_session(
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let session_id = state.sessions.create_session()?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "session_id": session_id })),
    ))
}

/// DELETE /sessions/{id}
pub(super) async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.sessions.end_session(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sessions/{id}/pitches: evaluate a new revision
pub(super) async fn handle_submit_pitch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SubmitPitchBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body.map_err(|rejection| ApiError {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    // Dropping this handler (client gone, timeout) cancels the evaluation.
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let report = state
        .sessions
        .submit_pitch_with_cancel(&id, &body.pitch, &cancel)
        .await?;
    Ok(Json(report))
}

/// GET /sessions/{id}/report
pub(super) async fn handle_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.sessions.report(&id)?))
}

/// GET /sessions/{id}/revisions
pub(super) async fn handle_revisions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.sessions.revisions(&id)?))
}

/// GET /sessions/{id}/delta
pub(super) async fn handle_delta(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.sessions.delta(&id)?))
}
