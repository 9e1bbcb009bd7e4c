//! End-to-end tests for both chat clients against mocked HTTP servers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use askdesk::{
    AskQuestionUseCase, ChatClient, LocalConfig, OllamaChatClient, OpenAiChatClient, Question,
    RemoteConfig, Renderer, SYSTEM_PROMPT,
};

const UNREACHABLE: &str =
    "Error: Cannot connect to Ollama. Make sure Ollama is running on localhost:11434";

#[derive(Default)]
struct RecordingRenderer {
    documents: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    fn only_document(&self) -> String {
        let docs = self.documents.lock().unwrap();
        assert_eq!(docs.len(), 1, "expected exactly one rendered document");
        docs[0].clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, markdown: &str) {
        self.documents.lock().unwrap().push(markdown.to_string());
    }
}

async fn ask_and_render(client: Arc<dyn ChatClient>, question: &str) -> String {
    let renderer = Arc::new(RecordingRenderer::default());
    let use_case = AskQuestionUseCase::new(client, renderer.clone());
    let _ = use_case.execute(&Question::new(question)).await;
    renderer.only_document()
}

fn remote_client(server: &MockServer) -> Arc<dyn ChatClient> {
    let config = RemoteConfig::new("gpt-4o-mini", Some("sk-test".to_string()))
        .expect("explicit credential")
        .with_base_url(server.uri());
    Arc::new(OpenAiChatClient::new(config))
}

fn local_client(server: &MockServer) -> Arc<dyn ChatClient> {
    Arc::new(OllamaChatClient::new(LocalConfig::new("llama3.2", server.uri())))
}

async fn mount_healthy_probe(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
        .mount(server)
        .await;
}

// --- configuration ---

#[test]
fn remote_without_any_credential_fails() {
    let err = RemoteConfig::resolve(Some("gpt-4o-mini".into()), None, |_| None).unwrap_err();
    assert!(err.is_missing_credential());

    assert!(OpenAiChatClient::with_credential("gpt-4o-mini", None).is_err());
}

#[test]
fn remote_with_explicit_credential_ignores_environment() {
    let config = RemoteConfig::from_env(None, Some("sk-explicit".to_string())).unwrap();
    assert_eq!(config.credential(), "sk-explicit");

    let config = RemoteConfig::resolve(None, Some("sk-explicit".to_string()), |_| None).unwrap();
    assert_eq!(config.credential(), "sk-explicit");
}

// --- remote client ---

#[tokio::test]
async fn remote_renders_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "stream": false,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": "What is 6*7?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "42" } },
                { "index": 1, "message": { "role": "assistant", "content": "forty-two" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rendered = ask_and_render(remote_client(&server), "What is 6*7?").await;
    assert_eq!(rendered, "42");
}

#[tokio::test]
async fn remote_api_error_is_rendered_as_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let rendered = ask_and_render(remote_client(&server), "hi").await;
    assert!(rendered.starts_with("Error: "), "got {rendered}");
    assert!(rendered.contains("401"));
    assert!(rendered.contains("Incorrect API key provided"));
}

#[tokio::test]
async fn remote_malformed_body_is_rendered_as_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let rendered = ask_and_render(remote_client(&server), "hi").await;
    assert!(rendered.starts_with("Error: "), "got {rendered}");
}

#[tokio::test]
async fn remote_empty_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = remote_client(&server);
    let err = client.ask(&Question::new("hi")).await.unwrap_err();
    assert!(err.is_request_error());
}

#[tokio::test]
async fn remote_transport_failure_is_rendered_as_error_text() {
    let config = RemoteConfig::new("gpt-4o-mini", Some("sk-test".to_string()))
        .unwrap()
        .with_base_url("http://127.0.0.1:9");
    let client: Arc<dyn ChatClient> = Arc::new(OpenAiChatClient::new(config));

    let rendered = ask_and_render(client, "hi").await;
    assert!(rendered.starts_with("Error: "), "got {rendered}");
}

// --- local client ---

#[tokio::test]
async fn local_renders_generate_response() {
    let server = MockServer::start().await;
    mount_healthy_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "prompt": format!("{SYSTEM_PROMPT}\n\nQuestion: What is a borrow?"),
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "response": "X",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rendered = ask_and_render(local_client(&server), "What is a borrow?").await;
    assert_eq!(rendered, "X");
}

#[tokio::test]
async fn local_missing_response_field_renders_placeholder() {
    let server = MockServer::start().await;
    mount_healthy_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "done": true })))
        .mount(&server)
        .await;

    let rendered = ask_and_render(local_client(&server), "hi").await;
    assert_eq!(rendered, "No response received");
}

#[tokio::test]
async fn local_probe_non_200_skips_generate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "X" })))
        .expect(0)
        .mount(&server)
        .await;

    let rendered = ask_and_render(local_client(&server), "hi").await;
    assert_eq!(rendered, UNREACHABLE);
}

#[tokio::test]
async fn local_probe_other_success_status_counts_as_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = local_client(&server);
    let err = client.ask(&Question::new("hi")).await.unwrap_err();
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn local_probe_timeout_renders_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(7)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let rendered = ask_and_render(local_client(&server), "hi").await;
    assert_eq!(rendered, UNREACHABLE);
}

#[tokio::test]
async fn local_daemon_not_running_renders_unreachable() {
    let client: Arc<dyn ChatClient> = Arc::new(OllamaChatClient::new(LocalConfig::new(
        "llama3.2",
        "http://127.0.0.1:9",
    )));

    let rendered = ask_and_render(client, "hi").await;
    assert_eq!(rendered, UNREACHABLE);
}

#[tokio::test]
async fn local_generate_failure_status_is_rendered_as_error_text() {
    let server = MockServer::start().await;
    mount_healthy_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let rendered = ask_and_render(local_client(&server), "hi").await;
    assert!(rendered.starts_with("Error: "), "got {rendered}");
    assert!(rendered.contains("500"));
}

#[tokio::test]
async fn local_generate_invalid_json_is_rendered_as_error_text() {
    let server = MockServer::start().await;
    mount_healthy_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let rendered = ask_and_render(local_client(&server), "hi").await;
    assert!(rendered.starts_with("Error: "), "got {rendered}");
}

#[tokio::test]
async fn local_client_is_reused_without_history() {
    let server = MockServer::start().await;
    mount_healthy_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
        .expect(2)
        .mount(&server)
        .await;

    let client = local_client(&server);
    for q in ["first", "second"] {
        let answer = client.ask(&Question::new(q)).await.unwrap();
        assert_eq!(answer.text(), "ok");
    }

    let requests = server.received_requests().await.unwrap();
    let second_generate = requests
        .iter()
        .filter(|r| r.url.path() == "/api/generate")
        .nth(1)
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&second_generate.body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.ends_with("Question: second"));
    assert!(!prompt.contains("first"));
}
