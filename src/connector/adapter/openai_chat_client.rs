use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{Answer, AskError, ConfigurationError, Question, RemoteConfig, SYSTEM_PROMPT};

const COMPLETIONS_PATH: &str = "/chat/completions";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for the OpenAI Chat Completions API (and compatible servers).
///
/// Sends the technical-assistant system message followed by the question as a
/// single non-streaming request. No timeout is set beyond reqwest's default.
///
/// The credential is checked when the [`RemoteConfig`] is built, so a value of
/// this type is always authenticated.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    model: String,
    credential: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenAiChatClient {
    pub fn new(config: RemoteConfig) -> Self {
        let url = format!("{}{COMPLETIONS_PATH}", config.base_url());
        Self {
            client: reqwest::Client::new(),
            model: config.model().to_string(),
            credential: config.credential().to_string(),
            url,
        }
    }

    /// Build a client from an explicit model and credential, without reading
    /// the environment.
    pub fn with_credential(
        model: impl Into<String>,
        credential: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::new(RemoteConfig::new(model, credential)?))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn error_detail(body: &str) -> String {
        serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string())
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn ask(&self, question: &Question) -> Result<Answer, AskError> {
        let request = ApiRequest {
            model: &self.model,
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ApiMessage {
                    role: "user",
                    content: question.text(),
                },
            ],
            stream: false,
        };

        debug!("OpenAiChatClient: POST {} model={}", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.credential)
            .json(&request)
            .send()
            .await
            .map_err(|e| AskError::request(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAiChatClient: API returned {status}: {body}");
            let detail = Self::error_detail(&body);
            return Err(if detail.is_empty() {
                AskError::request(format!("API returned {status}"))
            } else {
                AskError::request(format!("API returned {status}: {detail}"))
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| AskError::request(format!("failed to parse response: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AskError::request("response contained no choices"))?;

        Ok(Answer::new(choice.message.content.unwrap_or_default()))
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}
