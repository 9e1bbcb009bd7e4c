mod chat_client;
mod renderer;

pub use chat_client::*;
pub use renderer::*;
