use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ChatClient;
use crate::connector::DEFAULT_THEME;
use crate::domain::{Answer, AskError, Question};

#[derive(Parser)]
#[command(name = "askdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print answers without Markdown highlighting
    #[arg(long, global = true)]
    pub plain: bool,

    #[arg(long, global = true, default_value = DEFAULT_THEME)]
    pub theme: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the OpenAI chat completions API
    Remote {
        /// Question to ask; read line by line from stdin when omitted
        question: Option<String>,

        #[arg(short, long)]
        model: Option<String>,

        /// Overrides OPENAI_API_KEY
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        base_url: Option<String>,
    },

    /// Ask a local Ollama daemon
    Local {
        /// Question to ask; read line by line from stdin when omitted
        question: Option<String>,

        #[arg(short, long)]
        model: Option<String>,

        #[arg(long)]
        base_url: Option<String>,
    },
}

impl Commands {
    pub fn question(&self) -> Option<&str> {
        match self {
            Commands::Remote { question, .. } | Commands::Local { question, .. } => {
                question.as_deref()
            }
        }
    }
}

/// Shows a spinner on stderr while the wrapped client is waiting for an answer.
///
/// The spinner is cleared before the answer is returned, so it never
/// interleaves with the rendered document on stdout.
pub struct SpinnerChatClient {
    inner: Arc<dyn ChatClient>,
}

impl SpinnerChatClient {
    pub fn new(inner: Arc<dyn ChatClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ChatClient for SpinnerChatClient {
    async fn ask(&self, question: &Question) -> Result<Answer, AskError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Waiting for {}...", self.inner.name()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.inner.ask(question).await;

        spinner.finish_and_clear();
        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
