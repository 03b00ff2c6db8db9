use std::sync::Arc;

use tracing::debug;

use practice_core::model::{AnswerSubmission, AnswerVerdict};

use crate::api::ExerciseApi;
use crate::error::VerifyError;

/// Submits a selected answer for the backend's verdict.
#[derive(Clone)]
pub struct AnswerVerifier {
    api: Arc<dyn ExerciseApi>,
}

impl AnswerVerifier {
    #[must_use]
    pub fn new(api: Arc<dyn ExerciseApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `VerifyError::AuthExpired` on HTTP 401 and `VerifyError::Backend`
    /// for any other failure.
    pub async fn verify(&self, submission: &AnswerSubmission) -> Result<AnswerVerdict, VerifyError> {
        let verdict = self.api.submit_answer(submission).await?;
        debug!(
            correct = verdict.is_correct,
            level = verdict.current_level,
            "answer verified"
        );
        Ok(verdict)
    }
}
