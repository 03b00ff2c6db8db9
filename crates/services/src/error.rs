//! Shared error types for the services crate.

use thiserror::Error;

use practice_core::feedback::VERIFICATION_FAILED_MESSAGE;
use practice_core::model::QuestionError;

/// Errors emitted by `ExerciseApi` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("session expired (HTTP 401)")]
    Unauthorized,
    #[error("request failed with status {status}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: Option<String>,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Message supplied by the backend in an error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::HttpStatus {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Errors emitted by `QuestionLoader`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("authentication expired")]
    AuthExpired,
    #[error(transparent)]
    Backend(ApiError),
    #[error(transparent)]
    MalformedQuestion(#[from] QuestionError),
}

impl From<ApiError> for LoadError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => LoadError::AuthExpired,
            other => LoadError::Backend(other),
        }
    }
}

/// Errors emitted by `AnswerVerifier`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifyError {
    #[error("authentication expired")]
    AuthExpired,
    #[error(transparent)]
    Backend(ApiError),
}

impl From<ApiError> for VerifyError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => VerifyError::AuthExpired,
            other => VerifyError::Backend(other),
        }
    }
}

impl VerifyError {
    /// Inline text for the learner: the server's message, or a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            VerifyError::Backend(err) => err
                .server_message()
                .unwrap_or(VERIFICATION_FAILED_MESSAGE)
                .to_string(),
            VerifyError::AuthExpired => VERIFICATION_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Session actions rejected by the state machine. None of these change state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no answer selected")]
    NoSelection,
    #[error("answer check already in flight")]
    CheckPending,
    #[error("question already answered")]
    AlreadyAnswered,
    #[error("no question to act on")]
    NoQuestion,
    #[error("current question has not been checked yet")]
    NotAnswered,
    #[error("session signed out")]
    SignedOut,
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid api url {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api url must use http or https: {0}")]
    UnsupportedScheme(String),
    #[error("invalid timeout seconds: {0}")]
    InvalidTimeout(String),
}
