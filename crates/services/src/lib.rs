#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http_api;
pub mod sessions;

pub use practice_core::Clock;
pub use sessions as session;

pub use api::ExerciseApi;
pub use config::{ApiConfig, SessionConfig};
pub use credentials::{CredentialStore, InMemoryCredentials};
pub use error::{ApiError, ConfigError, LoadError, SessionError, VerifyError};
pub use http_api::HttpExerciseApi;
pub use sessions::{
    AnswerVerifier, Answered, CheckTicket, Completion, Delivery, HistoryLog, InFlight, LoadTicket,
    PracticeLoopService, PracticeSession, QuestionLoader, SessionPhase,
};
