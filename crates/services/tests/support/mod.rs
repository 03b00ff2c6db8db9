#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use practice_core::model::{
    AnswerSubmission, AnswerVerdict, Question, TopicId, TopicLevels, UserProfile,
};
use services::{ApiError, ExerciseApi};

/// In-process backend double that replays queued responses.
#[derive(Default)]
pub struct ScriptedApi {
    questions: Mutex<VecDeque<Result<Question, ApiError>>>,
    verdicts: Mutex<VecDeque<Result<AnswerVerdict, ApiError>>>,
    profile: Mutex<Option<Result<UserProfile, ApiError>>>,
    levels: Mutex<Option<Result<TopicLevels, ApiError>>>,
    pub submissions: Mutex<Vec<AnswerSubmission>>,
    pub requested: Mutex<Vec<Option<TopicId>>>,
}

fn unavailable() -> ApiError {
    ApiError::HttpStatus {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        message: None,
    }
}

impl ScriptedApi {
    pub fn push_question(&self, question: Result<Question, ApiError>) -> &Self {
        self.questions.lock().unwrap().push_back(question);
        self
    }

    pub fn push_verdict(&self, verdict: Result<AnswerVerdict, ApiError>) -> &Self {
        self.verdicts.lock().unwrap().push_back(verdict);
        self
    }

    pub fn set_profile(&self, profile: Result<UserProfile, ApiError>) -> &Self {
        *self.profile.lock().unwrap() = Some(profile);
        self
    }

    pub fn set_levels(&self, levels: Result<TopicLevels, ApiError>) -> &Self {
        *self.levels.lock().unwrap() = Some(levels);
        self
    }

    fn next(&self, topic: Option<TopicId>) -> Result<Question, ApiError> {
        self.requested.lock().unwrap().push(topic);
        self.questions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}

#[async_trait]
impl ExerciseApi for ScriptedApi {
    async fn next_question(&self, topic_id: TopicId) -> Result<Question, ApiError> {
        self.next(Some(topic_id))
    }

    async fn next_random_question(&self) -> Result<Question, ApiError> {
        self.next(None)
    }

    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<AnswerVerdict, ApiError> {
        self.submissions.lock().unwrap().push(submission.clone());
        self.verdicts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn user_profile(&self) -> Result<UserProfile, ApiError> {
        self.profile
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(UserProfile::default()))
    }

    async fn topic_levels(&self) -> Result<TopicLevels, ApiError> {
        self.levels
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(TopicLevels::default()))
    }
}

pub fn question(json: serde_json::Value) -> Question {
    serde_json::from_value(json).unwrap()
}

pub fn multiplication() -> Question {
    question(serde_json::json!({
        "first": 3,
        "second": 4,
        "operationSign": "×",
        "answers": [7, 12, 1, 34],
        "correctAnswer": 12
    }))
}

pub fn fraction_addition() -> Question {
    question(serde_json::json!({
        "first": "1/6",
        "second": "1/6",
        "operationSign": "fracAdd",
        "answers": [2012, 1003, 1006, 2006],
        "correctAnswer": 1003,
        "topicId": 5
    }))
}

pub fn verdict(is_correct: bool, correct: i64, level: u32, message: Option<&str>) -> AnswerVerdict {
    serde_json::from_value(serde_json::json!({
        "isCorrect": is_correct,
        "correctAnswer": correct,
        "currentLevel": level,
        "levelChangeMessage": message
    }))
    .unwrap()
}
