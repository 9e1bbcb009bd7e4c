mod ollama_chat_client;
mod openai_chat_client;
mod terminal_renderer;

pub use ollama_chat_client::*;
pub use openai_chat_client::*;
pub use terminal_renderer::*;
