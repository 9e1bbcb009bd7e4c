//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Chat clients (OpenAI chat completions, local Ollama daemon)
//! - Terminal rendering (syntect Markdown highlighting)

pub mod adapter;

pub use adapter::*;
