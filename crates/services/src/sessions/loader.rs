use std::sync::Arc;

use tracing::debug;

use practice_core::model::{PracticeMode, PreparedQuestion};

use crate::api::ExerciseApi;
use crate::error::LoadError;

/// Fetches the next question and normalizes it for the session.
#[derive(Clone)]
pub struct QuestionLoader {
    api: Arc<dyn ExerciseApi>,
}

impl QuestionLoader {
    #[must_use]
    pub fn new(api: Arc<dyn ExerciseApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `LoadError::AuthExpired` on HTTP 401, `LoadError::Backend` for other
    /// transport or server failures, and `LoadError::MalformedQuestion` when the
    /// payload violates the question invariants.
    pub async fn fetch(&self, mode: PracticeMode) -> Result<PreparedQuestion, LoadError> {
        let wire = match mode {
            PracticeMode::Topic(topic_id) => self.api.next_question(topic_id).await?,
            PracticeMode::Random => self.api.next_random_question().await?,
        };
        let question = PreparedQuestion::prepare(wire)?;
        debug!(text = question.text(), fraction = question.is_fraction(), "question loaded");
        Ok(question)
    }
}
