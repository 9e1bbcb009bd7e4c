use thiserror::Error;

/// Raised while building a client. Unlike [`AskError`] this is never turned
/// into rendered content: a client that cannot be configured is not usable.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(
        "OpenAI API key is required. Set {env_var} environment variable or pass api_key parameter."
    )]
    MissingCredential { env_var: &'static str },
}

impl ConfigurationError {
    pub fn missing_credential(env_var: &'static str) -> Self {
        Self::MissingCredential { env_var }
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential { .. })
    }
}

/// Failure of a single question/answer exchange.
///
/// The `Display` form is the fault description only; [`AskError::to_answer_text`]
/// adds the `Error: ` prefix used when the failure is shown as the answer.
#[derive(Debug, Error)]
pub enum AskError {
    /// The local daemon did not pass its liveness probe.
    #[error("Cannot connect to {daemon}. Make sure {daemon} is running on {host_port}")]
    Unreachable {
        daemon: &'static str,
        host_port: &'static str,
    },

    /// Transport failure, non-success status or malformed body.
    #[error("{0}")]
    Request(String),
}

impl AskError {
    pub fn unreachable(daemon: &'static str, host_port: &'static str) -> Self {
        Self::Unreachable { daemon, host_port }
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    pub fn to_answer_text(&self) -> String {
        format!("Error: {self}")
    }
}
