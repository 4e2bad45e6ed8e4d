use crate::scripted_provider::{ScriptedProvider, evaluator};
use pitchcoach::SessionManager;
use pitchcoach::config::{EngineConfig, GatewayConfig};
use pitchcoach::gateway::{AppState, router};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

const PITCH: &str = "Problem: Dentists lose hours to claims.\nSolution: We automate claim filing.";

struct TestGateway {
    base: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestGateway {
    async fn start() -> Self {
        let engine = EngineConfig {
            max_pitch_chars: 200,
            escalate_extraction: false,
            ..EngineConfig::default()
        };
        let gateway = GatewayConfig {
            max_body_bytes: 4096,
            ..GatewayConfig::default()
        };
        Self::start_with(engine, gateway).await
    }

    async fn start_with(engine: EngineConfig, gateway: GatewayConfig) -> Self {
        let manager = SessionManager::new(evaluator(Arc::new(ScriptedProvider::constant(60)), engine));
        let state = AppState {
            sessions: Arc::new(manager),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("listener should expose local address")
            .port();
        let app = router(state, &gateway);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("gateway should serve");
        });

        Self {
            base: format!("http://127.0.0.1:{port}"),
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn create_session(&self) -> String {
        let response = self.client.post(self.url("/sessions")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["session_id"].as_str().unwrap().to_string()
    }

    async fn submit(&self, id: &str, pitch: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/sessions/{id}/pitches")))
            .json(&json!({ "pitch": pitch }))
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_and_rubric_describe_the_engine() {
    let gateway = TestGateway::start().await;

    let health: Value = gateway
        .client
        .get(gateway.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["dimensions"], 7);

    let rubric: Value = gateway
        .client
        .get(gateway.url("/rubric"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = rubric["dimensions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids[0], "problem");
    assert_eq!(ids.len(), 7);
}

#[tokio::test]
async fn full_session_round_trip() {
    let gateway = TestGateway::start().await;
    let id = gateway.create_session().await;

    let response = gateway.submit(&id, PITCH).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = response.json().await.unwrap();
    assert_eq!(report["revision"], 1);
    assert_eq!(report["verdict"], "not_fundable_yet");
    assert_eq!(report["per_dimension"][0]["delta"]["kind"], "baseline");

    gateway.submit(&id, PITCH).await;
    let report: Value = gateway
        .client
        .get(gateway.url(&format!("/sessions/{id}/report")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["revision"], 2);

    let revisions: Value = gateway
        .client
        .get(gateway.url(&format!("/sessions/{id}/revisions")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(revisions.as_array().unwrap().len(), 2);
    assert_eq!(revisions[1]["sequence"], 2);

    let delta: Value = gateway
        .client
        .get(gateway.url(&format!("/sessions/{id}/delta")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(delta[0]["dimension_id"], "problem");
    assert_eq!(delta[0]["delta"], json!({ "kind": "change", "value": 0 }));

    let response = gateway
        .client
        .delete(gateway.url(&format!("/sessions/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = gateway
        .client
        .get(gateway.url(&format!("/sessions/{id}/report")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn error_statuses_follow_the_failure() {
    let gateway = TestGateway::start().await;
    let id = gateway.create_session().await;

    let response = gateway
        .client
        .get(gateway.url(&format!("/sessions/{id}/report")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("no revisions"));

    let response = gateway.submit(&id, "   ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = gateway.submit(&id, &"word ".repeat(60)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let response = gateway.submit("no-such-session", PITCH).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = gateway
        .client
        .post(gateway.url(&format!("/sessions/{id}/pitches")))
        .header("content-type", "application/json")
        .body("{\"text\": 1}")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    let response = gateway
        .client
        .delete(gateway.url("/sessions/no-such-session"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// `{"pitch": "..."}` with every character written as a `\u` surrogate pair.
fn escaped_emoji_body(chars: usize) -> String {
    format!("{{\"pitch\": \"{}\"}}", "\\ud83d\\ude80".repeat(chars))
}

#[tokio::test]
async fn default_limits_admit_a_fully_escaped_maximal_pitch() {
    let engine = EngineConfig {
        escalate_extraction: false,
        ..EngineConfig::default()
    };
    let max_chars = engine.max_pitch_chars;
    let gateway = TestGateway::start_with(engine, GatewayConfig::default()).await;
    let id = gateway.create_session().await;

    let post = |body: String| {
        gateway
            .client
            .post(gateway.url(&format!("/sessions/{id}/pitches")))
            .header("content-type", "application/json")
            .body(body)
            .send()
    };

    let response = post(escaped_emoji_body(max_chars)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = post(escaped_emoji_body(max_chars + 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert!(
        body["error"].as_str().unwrap().contains("pitch is too large"),
        "{body}"
    );
}
