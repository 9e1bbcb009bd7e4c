use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{Answer, AskError, LocalConfig, Question, SYSTEM_PROMPT};

const TAGS_PATH: &str = "/tags";
const GENERATE_PATH: &str = "/generate";
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);
const DAEMON_NAME: &str = "Ollama";
/// Reported in the unreachable message whatever the configured base URL is.
const DEFAULT_HOST_PORT: &str = "localhost:11434";
const NO_RESPONSE: &str = "No response received";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// HTTP client for a locally running Ollama daemon.
///
/// Before each question the client sends `GET /api/tags` with a 5-second
/// timeout. Anything other than a `200` (including connection refused or a
/// probe timeout) fails the ask with [`AskError::Unreachable`] without calling
/// the generate endpoint. The daemon is not retried.
pub struct OllamaChatClient {
    client: reqwest::Client,
    /// Liveness check with a short timeout.
    probe_client: reqwest::Client,
    model: String,
    /// `<base>/api`.
    api_url: String,
}

impl OllamaChatClient {
    pub fn new(config: LocalConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(GENERATE_TIMEOUT)
                .build()
                .unwrap_or_default(),
            probe_client: reqwest::Client::builder()
                .timeout(PROBE_TIMEOUT)
                .build()
                .unwrap_or_default(),
            model: config.model().to_string(),
            api_url: config.api_url(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn is_reachable(&self) -> bool {
        let url = format!("{}{TAGS_PATH}", self.api_url);
        match self.probe_client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                debug!("OllamaChatClient: probe returned {}", response.status());
                false
            }
            Err(e) => {
                debug!("OllamaChatClient: probe failed: {e}");
                false
            }
        }
    }

    fn build_prompt(question: &Question) -> String {
        format!("{SYSTEM_PROMPT}\n\nQuestion: {}", question.text())
    }

    async fn generate(&self, question: &Question) -> Result<Answer, AskError> {
        let prompt = Self::build_prompt(question);
        let request = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
        };
        let url = format!("{}{GENERATE_PATH}", self.api_url);

        debug!("OllamaChatClient: POST {url} model={}", self.model);

        let result = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AskError::request(e.to_string()))?
            .json::<GenerateResponse>()
            .await
            .map_err(|e| AskError::request(e.to_string()))?;

        Ok(Answer::new(
            result.response.unwrap_or_else(|| NO_RESPONSE.to_string()),
        ))
    }
}

impl Default for OllamaChatClient {
    fn default() -> Self {
        Self::new(LocalConfig::default())
    }
}

#[async_trait]
impl ChatClient for OllamaChatClient {
    async fn ask(&self, question: &Question) -> Result<Answer, AskError> {
        if !self.is_reachable().await {
            return Err(AskError::unreachable(DAEMON_NAME, DEFAULT_HOST_PORT));
        }

        self.generate(question).await
    }

    fn name(&self) -> &str {
        DAEMON_NAME
    }
}
