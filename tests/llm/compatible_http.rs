use pitchcoach::error::LlmError;
use pitchcoach::llm::{OpenAiCompatibleProvider, Provider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::new("Mock", &server.uri(), Some("sk-test"), "test-model", 0.2)
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 8 }
    })
}

#[tokio::test]
async fn sends_bearer_auth_and_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 64,
            "messages": [{ "role": "user", "content": "Score this pitch" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"score": 72, "critique": "Clear problem."}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let reply = provider(&server).generate("Score this pitch", 64).await.unwrap();
    assert_eq!(reply, r#"{"score": 72, "critique": "Clear problem."}"#);
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let err = provider(&server).generate("hi", 16).await.unwrap_err();
    assert_eq!(
        err,
        LlmError::RateLimited {
            provider: "Mock".into(),
            retry_after_secs: 7
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unauthorized_maps_to_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = provider(&server).generate("hi", 16).await.unwrap_err();
    assert_eq!(err, LlmError::Auth { provider: "Mock".into() });
}

#[tokio::test]
async fn bad_request_is_rejected_with_scrubbed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("bad request for key sk-live-abcdefghijklmnopqrstuvwxyz"),
        )
        .mount(&server)
        .await;

    match provider(&server).generate("hi", 16).await.unwrap_err() {
        LlmError::Rejected { status, message, .. } => {
            assert_eq!(status, 400);
            assert!(!message.contains("abcdefghijklmnop"), "{message}");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_and_empty_choices_are_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = provider(&server);
    match provider.generate("hi", 16).await.unwrap_err() {
        LlmError::Unavailable { message, .. } => assert!(message.contains("503"), "{message}"),
        other => panic!("expected unavailable, got {other:?}"),
    }
    match provider.generate("hi", 16).await.unwrap_err() {
        LlmError::Unavailable { message, .. } => {
            assert!(message.contains("no choices"), "{message}");
        }
        other => panic!("expected unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn null_content_becomes_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": null } }]
        })))
        .mount(&server)
        .await;

    assert_eq!(provider(&server).generate("hi", 16).await.unwrap(), "");
}
