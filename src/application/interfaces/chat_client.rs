use async_trait::async_trait;

use crate::domain::{Answer, AskError, Question};

/// Sends one question to a language model and returns its answer.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. Every exchange is independent: no conversation history is kept
/// between calls, so a single client can be reused for a whole session.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Ask `question` with the fixed technical-assistant instruction.
    ///
    /// Never panics on network or decode failures; they come back as
    /// [`AskError`] so the caller decides how to present them.
    async fn ask(&self, question: &Question) -> Result<Answer, AskError>;

    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;
}
