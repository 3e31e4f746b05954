//! Provider and retry tests against a mock upstream HTTP server.

use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use samvad::api::handlers::GatewayState;
use samvad::api::routes::app;
use samvad::config::LlmConfig;
use samvad::instruction::SystemInstruction;
use samvad::llm::anthropic::AnthropicProvider;
use samvad::llm::gemini::GeminiProvider;
use samvad::llm::openai::OpenAiProvider;
use samvad::llm::{LlmClient, LlmError, LlmProvider, RetryPolicy};

const GEMINI_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn gemini(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new(Client::new(), "test-key", "gemini-2.5-flash").with_base_url(&server.uri())
}

fn gemini_config(server: &MockServer, retry: RetryPolicy) -> LlmConfig {
    LlmConfig {
        provider: "gemini".to_string(),
        model: "gemini-2.5-flash".to_string(),
        api_key: "test-key".to_string(),
        base_url: Some(server.uri().parse().unwrap()),
        retry,
    }
}

fn gemini_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": text }] } }
        ]
    })
}

#[tokio::test]
async fn test_gemini_sends_single_user_turn_and_joins_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "Hello " }, { "text": "world\n" }]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini(&server).generate("hello").await.unwrap();
    assert_eq!(text, "Hello world\n");
}

#[tokio::test]
async fn test_gemini_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    match gemini(&server).generate("q").await {
        Err(err @ LlmError::Api { .. }) => {
            assert!(err.is_transient());
            if let LlmError::Api { status, body, .. } = err {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "overloaded");
            }
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_gemini_blocked_and_empty_answers_fail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "blocked" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "empty" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let provider = gemini(&server);
    assert!(matches!(
        provider.generate("blocked").await,
        Err(LlmError::Blocked { reason, .. }) if reason == "SAFETY"
    ));
    assert!(matches!(
        provider.generate("empty").await,
        Err(LlmError::EmptyResponse("gemini"))
    ));
}

#[tokio::test]
async fn test_openai_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer ok"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{ "role": "user", "content": "prompt" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "answer" } }]
        })))
        .mount(&server)
        .await;

    let provider =
        OpenAiProvider::new(Client::new(), "ok", "gpt-4o-mini").with_base_url(&server.uri());
    assert_eq!(provider.generate("prompt").await.unwrap(), "answer");
}

#[tokio::test]
async fn test_anthropic_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "ak"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "answer" }]
        })))
        .mount(&server)
        .await;

    let provider =
        AnthropicProvider::new(Client::new(), "ak", "claude").with_base_url(&server.uri());
    assert_eq!(provider.generate("prompt").await.unwrap(), "answer");
}

#[tokio::test]
async fn test_client_retries_transient_failures_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let retry = RetryPolicy::new(3, Duration::from_secs(5), Duration::from_millis(5));
    let client = LlmClient::from_config(&gemini_config(&server, retry)).unwrap();
    assert_eq!(client.generate("q").await.unwrap(), "recovered");
}

#[tokio::test]
async fn test_client_does_not_retry_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = LlmClient::from_config(&gemini_config(&server, RetryPolicy::default())).unwrap();
    assert!(client.generate("q").await.is_err());
}

#[tokio::test]
async fn test_client_times_out_slow_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_text("late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let retry = RetryPolicy::new(1, Duration::from_millis(50), Duration::from_millis(5));
    let client = LlmClient::from_config(&gemini_config(&server, retry)).unwrap();
    assert!(matches!(
        client.generate("q").await,
        Err(LlmError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_ask_endpoint_through_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("**Drink** water")))
        .mount(&server)
        .await;

    let client = LlmClient::from_config(&gemini_config(&server, RetryPolicy::default())).unwrap();
    let state = GatewayState::new(client, SystemInstruction::embedded().unwrap());
    let resp = app(state)
        .oneshot(
            Request::post("/ask")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"query": "dehydration", "lang": "hi-IN"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "reply": "**Drink** water" }));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.ends_with("\n\nUser question: dehydration"));
}
