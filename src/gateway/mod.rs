//! Axum-based HTTP gateway over the session manager, with body limits and
//! request timeouts.

mod handlers;

use handlers::{
    handle_create_session, handle_delta, handle_end_session, handle_health, handle_report,
    handle_revisions, handle_rubric, handle_submit_pitch,
};

use crate::config::{Config, GatewayConfig};
use crate::engine::Evaluator;
use crate::session::SessionManager;
use anyhow::Result;
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
}

/// Pitch submission body
#[derive(serde::Deserialize)]
pub struct SubmitPitchBody {
    pub pitch: String,
}

/// Router with every route, body limit and timeout applied.
pub fn router(state: AppState, gateway: &GatewayConfig) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/rubric", get(handle_rubric))
        .route("/sessions", post(handle_create_session))
        .route(
            "/sessions/{id}",
            axum::routing::delete(handle_end_session),
        )
        .route("/sessions/{id}/pitches", post(handle_submit_pitch))
        .route("/sessions/{id}/report", get(handle_report))
        .route("/sessions/{id}/revisions", get(handle_revisions))
        .route("/sessions/{id}/delta", get(handle_delta))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(gateway.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(gateway.request_timeout_secs),
        ))
}

/// Run the HTTP gateway on `host:port`.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let evaluator = Arc::new(Evaluator::from_config(&config)?);
    let state = AppState {
        sessions: Arc::new(SessionManager::new(evaluator)),
    };
    run_gateway_with_listener(listener, state, &config.gateway).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    state: AppState,
    gateway: &GatewayConfig,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Gateway listening");
    println!("◆ pitchcoach gateway listening on http://{addr}");
    println!("  GET    /health");
    println!("  GET    /rubric");
    println!("  POST   /sessions");
    println!("  POST   /sessions/{{id}}/pitches");
    println!("  GET    /sessions/{{id}}/report | /revisions | /delta");
    println!("  DELETE /sessions/{{id}}");
    println!("  Press Ctrl+C to stop.\n");

    let app = router(state, gateway);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
