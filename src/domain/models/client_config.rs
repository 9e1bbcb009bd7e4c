use serde::{Deserialize, Serialize};

use crate::domain::ConfigurationError;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";
pub const OLLAMA_BASE_URL_ENV: &str = "OLLAMA_BASE_URL";
pub const OLLAMA_MODEL_ENV: &str = "OLLAMA_MODEL";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Settings for the hosted chat-completion API.
///
/// A `RemoteConfig` always carries a credential; it can only be obtained
/// through [`RemoteConfig::new`] or one of the loaders, which fail with
/// [`ConfigurationError`] when none is available.
///
/// | Variable          | Default                     |
/// |-------------------|-----------------------------|
/// | `OPENAI_API_KEY`  | none (required)             |
/// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
/// | `OPENAI_MODEL`    | `gpt-4o-mini`               |
#[derive(Clone)]
pub struct RemoteConfig {
    model: String,
    base_url: String,
    credential: String,
}

impl RemoteConfig {
    pub fn new(
        model: impl Into<String>,
        credential: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        Self::resolve(Some(model.into()), credential, |_| None)
    }

    /// Read missing values from the process environment.
    pub fn from_env(
        model: Option<String>,
        credential: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        Self::resolve(model, credential, |key| std::env::var(key).ok())
    }

    /// Explicit values win; anything missing is looked up through `env`.
    pub fn resolve<F>(
        model: Option<String>,
        credential: Option<String>,
        env: F,
    ) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = credential
            .filter(|c| !c.is_empty())
            .or_else(|| env(OPENAI_API_KEY_ENV).filter(|c| !c.is_empty()))
            .ok_or_else(|| ConfigurationError::missing_credential(OPENAI_API_KEY_ENV))?;

        let model = model
            .or_else(|| env(OPENAI_MODEL_ENV))
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let base_url = env(OPENAI_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        Ok(Self {
            model,
            base_url: normalize_base_url(&base_url),
            credential,
        })
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }
}

// Keeps the key out of `{:?}` output and therefore out of logs.
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Settings for the local inference daemon. No credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawLocalConfig")]
pub struct LocalConfig {
    model: String,
    base_url: String,
}

/// Deserialized shape of [`LocalConfig`], normalized through [`LocalConfig::new`].
#[derive(Deserialize)]
struct RawLocalConfig {
    model: String,
    base_url: String,
}

impl From<RawLocalConfig> for LocalConfig {
    fn from(raw: RawLocalConfig) -> Self {
        Self::new(raw.model, raw.base_url)
    }
}

impl LocalConfig {
    pub fn new(model: impl Into<String>, base_url: impl AsRef<str>) -> Self {
        Self {
            model: model.into(),
            base_url: normalize_base_url(base_url.as_ref()),
        }
    }

    /// | Variable          | Default                  |
    /// |-------------------|--------------------------|
    /// | `OLLAMA_BASE_URL` | `http://localhost:11434` |
    /// | `OLLAMA_MODEL`    | `llama3.2`               |
    pub fn from_env(model: Option<String>, base_url: Option<String>) -> Self {
        let model = model
            .or_else(|| std::env::var(OLLAMA_MODEL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
        let base_url = base_url
            .or_else(|| std::env::var(OLLAMA_BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string());
        Self::new(model, base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/api`, the root of every daemon endpoint.
    pub fn api_url(&self) -> String {
        format!("{}/api", self.base_url)
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_BASE_URL)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
