use async_trait::async_trait;

use practice_core::model::{
    AnswerSubmission, AnswerVerdict, Question, TopicId, TopicLevels, UserProfile,
};

use crate::error::ApiError;

/// Backend contract consumed by the practice session.
#[async_trait]
pub trait ExerciseApi: Send + Sync {
    /// `GET /api/exercises/next?topicId=<id>`
    async fn next_question(&self, topic_id: TopicId) -> Result<Question, ApiError>;

    /// `GET /api/exercises/next-random`
    async fn next_random_question(&self) -> Result<Question, ApiError>;

    /// `POST /api/exercises/answer`
    async fn submit_answer(&self, submission: &AnswerSubmission)
    -> Result<AnswerVerdict, ApiError>;

    /// `GET /api/user`
    async fn user_profile(&self) -> Result<UserProfile, ApiError>;

    /// `GET /api/user/topics-levels`
    async fn topic_levels(&self) -> Result<TopicLevels, ApiError>;
}
