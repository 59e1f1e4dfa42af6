//! Pipeline Integration Tests
//!
//! Complete turns through `AppState` and `Session`, with mock provider and
//! documentation servers and the simulated editor.

use ketu::{
    AppError, AppState, AssistantMode, EditorOperation, GuidanceTopic, MessageRole, MessageStatus,
    NotificationLevel, PipelineStage, SettingsUpdate, SimulatedEditorHost, TestOutcome,
};
use ketu_llm::{ProviderConfig, ProviderErrorKind, ProviderKind};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Address with nothing listening on it
const DEAD_DOCS_URL: &str = "http://127.0.0.1:9";

fn generated(code: &str, language: &str) -> serde_json::Value {
    let content = format!(
        "```json\n{}\n```",
        json!({"explanation": "Here is your code", "code": code, "language": language})
    );
    json!({"choices": [{"message": {"content": content}}]})
}

async fn mount_provider(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn update(provider: &MockServer, docs_url: &str) -> SettingsUpdate {
    SettingsUpdate {
        provider: Some(
            ProviderConfig::new(ProviderKind::OpenAI, "gpt-4")
                .with_api_key("sk-test")
                .with_endpoint(format!("{}/v1/chat/completions", provider.uri())),
        ),
        docs_base_url: Some(docs_url.to_string()),
        ..Default::default()
    }
}

async fn configured_state(editor: Arc<SimulatedEditorHost>, update: SettingsUpdate) -> AppState {
    let state = AppState::new(editor);
    state.configure(update).await.unwrap();
    state
}

// ============================================================================
// Retrieval
// ============================================================================

#[tokio::test]
async fn test_generation_proceeds_when_retrieval_is_down() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("This is a fallback documentation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generated("items.sort()", "python")))
        .expect(1)
        .mount(&provider)
        .await;

    let state = configured_state(Arc::new(SimulatedEditorHost::new()), update(&provider, DEAD_DOCS_URL)).await;
    let session = state.open_session().await.unwrap();

    let report = session.submit(AssistantMode::Plain, "sort a list").await.unwrap();
    assert!(report.succeeded());
    let result = report.result.unwrap();
    assert!(!result.code.is_empty());
    assert_eq!(result.language, "python");
}

#[tokio::test]
async fn test_retrieved_documents_reach_the_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/fetch-docs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": ["Array.prototype.sort sorts elements in place"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Array.prototype.sort sorts elements in place"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generated("arr.sort()", "javascript")))
        .expect(1)
        .mount(&server)
        .await;

    let editor = Arc::new(SimulatedEditorHost::new());
    let state = AppState::new(editor);
    let report = state.configure(update(&server, &server.uri())).await.unwrap();
    assert!(report.docs_reachable);

    let session = state.open_session().await.unwrap();
    let report = session.submit(AssistantMode::Plain, "sort an array").await.unwrap();
    assert_eq!(report.result.unwrap().language, "javascript");
}

#[tokio::test]
async fn test_repository_context_reaches_the_prompt() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("Repository: https://github.com/user/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generated("x = 1", "python")))
        .expect(1)
        .mount(&provider)
        .await;

    let mut settings = update(&provider, DEAD_DOCS_URL);
    settings.repository_enabled = Some(true);
    settings.repository_url = Some("https://github.com/user/repo".to_string());
    let state = configured_state(Arc::new(SimulatedEditorHost::new()), settings).await;

    let session = state.open_session().await.unwrap();
    assert!(session.submit(AssistantMode::Agent, "add a constant").await.unwrap().succeeded());
}

#[tokio::test]
async fn test_env_repository_context_reaches_the_prompt() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("Repository: https://github.com/user/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "```python\nx = 1\n```"})))
        .expect(1)
        .mount(&provider)
        .await;

    let endpoint = format!("{}/api/generate", provider.uri());
    let vars = [
        ("KETU_PROVIDER", "ollama"),
        ("KETU_MODEL", "codellama"),
        ("KETU_ENDPOINT", endpoint.as_str()),
        ("KETU_DOCS_URL", DEAD_DOCS_URL),
        ("KETU_REPO_URL", "https://github.com/user/repo"),
    ];
    let lookup = |key: &str| vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string());

    let editor = Arc::new(SimulatedEditorHost::new());
    let state = AppState::from_lookup(lookup, editor.clone()).await.unwrap();
    assert_eq!(editor.repository().await.as_deref(), Some("https://github.com/user/repo"));

    let session = state.open_session().await.unwrap();
    let report = session.submit(AssistantMode::Plain, "add a constant").await.unwrap();
    assert_eq!(report.result.unwrap().code, "x = 1");
}

// ============================================================================
// Auto mode
// ============================================================================

#[tokio::test]
async fn test_auto_mode_all_tests_pass() {
    let provider = MockServer::start().await;
    mount_provider(&provider, generated("print(sorted([3, 1, 2]))", "python")).await;

    let editor = Arc::new(SimulatedEditorHost::new());
    let state = configured_state(editor.clone(), update(&provider, DEAD_DOCS_URL)).await;
    let session = state.open_session().await.unwrap();

    let report = session.submit(AssistantMode::Auto, "sort a list").await.unwrap();
    assert_eq!(
        report.stages,
        vec![
            PipelineStage::Idle,
            PipelineStage::ContextFetch,
            PipelineStage::Generating,
            PipelineStage::InsertCode,
            PipelineStage::ExecuteCode,
            PipelineStage::RunTests,
            PipelineStage::Done,
        ]
    );
    assert_eq!(report.final_message.status, Some(MessageStatus::Success));
    assert_eq!(
        report.notification.map(|n| n.description),
        Some("Code generated, executed and tested successfully".to_string())
    );
    assert_eq!(editor.inserted_code().await, vec!["print(sorted([3, 1, 2]))"]);
    assert_eq!(editor.executed_languages().await, vec!["python"]);

    let messages = session.messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].test_results.as_ref().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_auto_mode_failing_test_marks_error() {
    let provider = MockServer::start().await;
    mount_provider(&provider, generated("def f(): pass", "python")).await;

    let editor = Arc::new(SimulatedEditorHost::new().with_test_outcomes(vec![
        TestOutcome::passed("Test 1: Basic functionality works correctly"),
        TestOutcome::failed("Test 2: Edge cases handled properly"),
        TestOutcome::passed("Test 3: Performance is within acceptable parameters"),
    ]));
    let state = configured_state(editor, update(&provider, DEAD_DOCS_URL)).await;
    let session = state.open_session().await.unwrap();

    let report = session.submit(AssistantMode::Auto, "write f").await.unwrap();
    assert_eq!(report.final_message.status, Some(MessageStatus::Error));
    assert_eq!(report.notification.unwrap().level, NotificationLevel::Warning);
}

#[tokio::test]
async fn test_auto_mode_provider_outage() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&provider)
        .await;

    let editor = Arc::new(SimulatedEditorHost::new());
    let state = configured_state(editor.clone(), update(&provider, DEAD_DOCS_URL)).await;
    let session = state.open_session().await.unwrap();

    let report = session.submit(AssistantMode::Auto, "sort a list").await.unwrap();
    assert_eq!(report.final_stage(), PipelineStage::Failed);
    assert!(editor.inserted_code().await.is_empty());

    let messages = session.messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, MessageRole::System);
    assert_eq!(messages[1].status, Some(MessageStatus::Error));
    assert!(messages[1].content.starts_with("Error: Server error (502)"));
}

#[tokio::test]
async fn test_auto_mode_insert_failure() {
    let provider = MockServer::start().await;
    mount_provider(&provider, generated("x", "text")).await;

    let editor = Arc::new(SimulatedEditorHost::new().failing(EditorOperation::InsertCode));
    let state = configured_state(editor.clone(), update(&provider, DEAD_DOCS_URL)).await;
    let session = state.open_session().await.unwrap();

    let report = session.submit(AssistantMode::Auto, "anything").await.unwrap();
    assert_eq!(report.failure.unwrap().stage, PipelineStage::InsertCode);
    assert!(editor.executed_languages().await.is_empty());
}

#[tokio::test]
async fn test_rejected_api_key_is_classified() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&provider)
        .await;

    let state = configured_state(Arc::new(SimulatedEditorHost::new()), update(&provider, DEAD_DOCS_URL)).await;
    let session = state.open_session().await.unwrap();

    let report = session.submit(AssistantMode::Plain, "sort a list").await.unwrap();
    let failure = report.failure.unwrap();
    assert_eq!(failure.stage, PipelineStage::Generating);
    assert_eq!(failure.provider_error, Some(ProviderErrorKind::Unauthorized));
    assert_eq!(report.notification.unwrap().description, "Failed to generate code");
}

#[tokio::test]
async fn test_session_recovers_after_provider_outage() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&provider)
        .await;
    mount_provider(&provider, generated("items.sort()", "python")).await;

    let state = configured_state(Arc::new(SimulatedEditorHost::new()), update(&provider, DEAD_DOCS_URL)).await;
    let session = state.open_session().await.unwrap();

    let failed = session.submit(AssistantMode::Auto, "sort a list").await.unwrap();
    assert_eq!(failed.final_stage(), PipelineStage::Failed);
    assert!(!session.is_busy());

    let report = session.submit(AssistantMode::Auto, "sort a list").await.unwrap();
    assert!(report.succeeded());
    assert!(!session.is_busy());

    let messages = session.messages().await;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[1].role, MessageRole::System);
    assert!(messages[1].content.starts_with("Error: "));
    assert_eq!(messages[2].role, MessageRole::User);
    assert_eq!(messages[3].role, MessageRole::Assistant);
    assert_eq!(messages[3].status, Some(MessageStatus::Success));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_submission_while_busy_is_rejected() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(generated("slow()", "python"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&provider)
        .await;

    let state = configured_state(Arc::new(SimulatedEditorHost::new()), update(&provider, DEAD_DOCS_URL)).await;
    let session = Arc::new(state.open_session().await.unwrap());

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.submit(AssistantMode::Plain, "first").await })
    };
    while !session.is_busy() {
        tokio::task::yield_now().await;
    }

    let err = session.submit(AssistantMode::Plain, "second").await.unwrap_err();
    assert!(matches!(err, AppError::Busy));
    assert!(session.messages().await.iter().all(|m| m.content != "second"));

    assert!(first.await.unwrap().unwrap().succeeded());
    assert!(!session.is_busy());

    // Free again once the first turn is done
    assert!(session.submit(AssistantMode::Plain, "third").await.unwrap().succeeded());
}

// ============================================================================
// Agent follow-up and guidance
// ============================================================================

#[tokio::test]
async fn test_agent_insert_follow_up() {
    let provider = MockServer::start().await;
    mount_provider(&provider, generated("console.log('hi')", "javascript")).await;

    let editor = Arc::new(SimulatedEditorHost::new());
    let state = configured_state(editor.clone(), update(&provider, DEAD_DOCS_URL)).await;
    let session = state.open_session().await.unwrap();

    let report = session.submit(AssistantMode::Agent, "log hi").await.unwrap();
    assert!(editor.inserted_code().await.is_empty());

    let notification = session.insert_code(&report.final_message.id).await.unwrap();
    assert_eq!(notification.level, NotificationLevel::Success);
    assert_eq!(editor.inserted_code().await, vec!["console.log('hi')"]);
}

#[tokio::test]
async fn test_deploy_guidance() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("I need deployment guidance for the following"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "1. Build a container image"}}]
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let state = configured_state(Arc::new(SimulatedEditorHost::new()), update(&provider, DEAD_DOCS_URL)).await;
    let session = state.open_session().await.unwrap();

    let report = session.ask(GuidanceTopic::Deploy, "a node api").await.unwrap();
    assert!(report.succeeded());
    assert_eq!(report.final_message.content, "1. Build a container image");
    assert_eq!(report.final_message.role, MessageRole::Assistant);
}
