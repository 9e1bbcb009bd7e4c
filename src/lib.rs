pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{AskQuestionUseCase, ChatClient, Renderer};

pub use connector::{OllamaChatClient, OpenAiChatClient, TerminalRenderer};

pub use domain::{
    Answer, AskError, ConfigurationError, LocalConfig, Question, RemoteConfig, SYSTEM_PROMPT,
};
