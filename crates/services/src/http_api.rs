use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use practice_core::model::{
    AnswerSubmission, AnswerVerdict, Question, TopicId, TopicLevels, UserProfile,
};

use crate::api::ExerciseApi;
use crate::config::ApiConfig;
use crate::credentials::CredentialStore;
use crate::error::ApiError;

const NEXT_QUESTION_PATH: &str = "api/exercises/next";
const NEXT_RANDOM_PATH: &str = "api/exercises/next-random";
const ANSWER_PATH: &str = "api/exercises/answer";
const USER_PATH: &str = "api/user";
const TOPIC_LEVELS_PATH: &str = "api/user/topics-levels";

/// `ExerciseApi` over JSON/HTTP.
#[derive(Clone)]
pub struct HttpExerciseApi {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpExerciseApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.authorize(self.client.get(url)).send().await?;
        read_json(response).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        warn!("backend rejected credentials");
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty());
        warn!(%status, "backend request failed");
        return Err(ApiError::HttpStatus { status, message });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl ExerciseApi for HttpExerciseApi {
    #[instrument(skip(self), fields(topic_id = %topic_id))]
    async fn next_question(&self, topic_id: TopicId) -> Result<Question, ApiError> {
        let mut url = self.endpoint(NEXT_QUESTION_PATH)?;
        url.query_pairs_mut()
            .append_pair("topicId", &topic_id.to_string());
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn next_random_question(&self) -> Result<Question, ApiError> {
        let url = self.endpoint(NEXT_RANDOM_PATH)?;
        self.get_json(url).await
    }

    #[instrument(skip(self, submission), fields(answer = %submission.answer))]
    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<AnswerVerdict, ApiError> {
        let url = self.endpoint(ANSWER_PATH)?;
        debug!(%url, "POST");
        let response = self
            .authorize(self.client.post(url))
            .json(submission)
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(skip(self))]
    async fn user_profile(&self) -> Result<UserProfile, ApiError> {
        let url = self.endpoint(USER_PATH)?;
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn topic_levels(&self) -> Result<TopicLevels, ApiError> {
        let url = self.endpoint(TOPIC_LEVELS_PATH)?;
        self.get_json(url).await
    }
}
