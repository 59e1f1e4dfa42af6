//! Provider Integration Tests
//!
//! Drives `ketu_llm::invoke` against mock servers for every provider kind.

use ketu_llm::{invoke, LlmError, ProviderConfig, ProviderErrorKind, ProviderKind};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn openai_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(ProviderKind::OpenAI, "gpt-4")
        .with_api_key("sk-test")
        .with_endpoint(format!("{}/v1/chat/completions", server.uri()))
}

// ============================================================================
// Wire shapes
// ============================================================================

#[tokio::test]
async fn test_openai_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "say hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "hi"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(invoke("say hi", &openai_config(&server)).await.unwrap(), "hi");
}

#[tokio::test]
async fn test_anthropic_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-api-key", "sk-ant"))
        .and(body_partial_json(json!({"max_tokens": 2048})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "hello from claude"}]
        })))
        .mount(&server)
        .await;

    let config = ProviderConfig::new(ProviderKind::Anthropic, "claude-3-5-sonnet-20241022")
        .with_api_key("sk-ant")
        .with_endpoint(server.uri());
    assert_eq!(invoke("hi", &config).await.unwrap(), "hello from claude");
}

#[tokio::test]
async fn test_ollama_needs_no_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"model": "codellama", "prompt": "hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "local answer"})))
        .mount(&server)
        .await;

    let config = ProviderConfig::new(ProviderKind::Ollama, "codellama")
        .with_endpoint(format!("{}/api/generate", server.uri()));
    assert_eq!(invoke("hi", &config).await.unwrap(), "local answer");
}

#[tokio::test]
async fn test_custom_prefers_choices_over_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "from choices"}}],
            "response": "from response"
        })))
        .mount(&server)
        .await;

    let config = ProviderConfig::new(ProviderKind::Custom, "house")
        .with_api_key("k")
        .with_endpoint(server.uri());
    assert_eq!(invoke("hi", &config).await.unwrap(), "from choices");
}

#[tokio::test]
async fn test_custom_falls_back_to_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "plain text field"})))
        .mount(&server)
        .await;

    let config = ProviderConfig::new(ProviderKind::Custom, "house")
        .with_api_key("k")
        .with_endpoint(server.uri());
    assert_eq!(invoke("hi", &config).await.unwrap(), "plain text field");
}

// ============================================================================
// Error classification
// ============================================================================

#[tokio::test]
async fn test_status_classification() {
    let cases = [
        (401, ProviderErrorKind::Unauthorized),
        (403, ProviderErrorKind::Unauthorized),
        (429, ProviderErrorKind::Unauthorized),
        (500, ProviderErrorKind::Unreachable),
        (503, ProviderErrorKind::Unreachable),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;

        let err = invoke("hi", &openai_config(&server)).await.unwrap_err();
        assert_eq!(err.kind(), expected, "status {} classified as {}", status, err.kind());
    }
}

#[tokio::test]
async fn test_missing_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = invoke("hi", &openai_config(&server)).await.unwrap_err();
    assert!(matches!(err, LlmError::MissingField { .. }));
    assert_eq!(err.kind(), ProviderErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = invoke("hi", &openai_config(&server)).await.unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_invalid_configs_never_reach_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let no_key = ProviderConfig::new(ProviderKind::Groq, "llama3-70b-8192").with_endpoint(server.uri());
    let no_endpoint = ProviderConfig::new(ProviderKind::Custom, "house").with_api_key("k");

    for config in [no_key, no_endpoint] {
        let err = invoke("hi", &config).await.unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::Misconfigured);
    }
}
