use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ChatClient, Renderer};
use crate::domain::{Answer, AskError, Question};

/// Asks a question and shows the outcome through a [`Renderer`].
///
/// A failed exchange is rendered as `Error: <description>` instead of
/// aborting, so an interactive session keeps going. The typed result is still
/// returned for callers that want to branch on it.
pub struct AskQuestionUseCase {
    client: Arc<dyn ChatClient>,
    renderer: Arc<dyn Renderer>,
}

impl AskQuestionUseCase {
    pub fn new(client: Arc<dyn ChatClient>, renderer: Arc<dyn Renderer>) -> Self {
        Self { client, renderer }
    }

    pub async fn execute(&self, question: &Question) -> Result<Answer, AskError> {
        debug!("Asking {}: {} chars", self.client.name(), question.text().len());

        let result = self.client.ask(question).await;
        match &result {
            Ok(answer) => self.renderer.render(answer.text()),
            Err(e) => {
                warn!("{} exchange failed: {e}", self.client.name());
                self.renderer.render(&e.to_answer_text());
            }
        }

        result
    }
}
