use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use askdesk::cli::{Cli, Commands, SpinnerChatClient};
use askdesk::{
    AskQuestionUseCase, ChatClient, LocalConfig, OllamaChatClient, OpenAiChatClient, Question,
    RemoteConfig, Renderer, TerminalRenderer,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let client: Arc<dyn ChatClient> = match &cli.command {
        Commands::Remote {
            model,
            api_key,
            base_url,
            ..
        } => {
            // A missing key is fatal here, before any question is read.
            let mut config = RemoteConfig::from_env(model.clone(), api_key.clone())?;
            if let Some(url) = base_url {
                config = config.with_base_url(url);
            }
            info!("Using OpenAI model {} at {}", config.model(), config.base_url());
            Arc::new(OpenAiChatClient::new(config))
        }
        Commands::Local {
            model, base_url, ..
        } => {
            let config = LocalConfig::from_env(model.clone(), base_url.clone());
            info!("Using Ollama model {} at {}", config.model(), config.base_url());
            Arc::new(OllamaChatClient::new(config))
        }
    };

    let renderer: Arc<dyn Renderer> = if cli.plain {
        Arc::new(TerminalRenderer::plain())
    } else {
        Arc::new(TerminalRenderer::with_theme(&cli.theme))
    };

    let use_case = AskQuestionUseCase::new(Arc::new(SpinnerChatClient::new(client)), renderer);

    if let Some(question) = cli.command.question() {
        return Ok(match use_case.execute(&Question::new(question)).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        });
    }

    // Session mode: one client, many independent questions.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let question = Question::new(line);
        if question.is_blank() {
            break;
        }
        // A failed ask is already rendered as the answer; keep reading questions.
        let _ = use_case.execute(&question).await;
    }

    Ok(ExitCode::SUCCESS)
}
