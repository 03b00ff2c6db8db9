use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{info, warn};

use practice_core::Clock;
use practice_core::model::{AnswerVerdict, PracticeMode, PreparedQuestion};

use super::loader::QuestionLoader;
use super::service::{CheckTicket, Delivery, LoadTicket, PracticeSession};
use super::verifier::AnswerVerifier;
use crate::api::ExerciseApi;
use crate::config::SessionConfig;
use crate::credentials::CredentialStore;
use crate::error::{ApiError, LoadError, SessionError, VerifyError};

/// Result of a backend request started by `start_load` or `start_check`.
#[derive(Debug)]
pub enum Completion {
    Loaded(LoadTicket, Result<PreparedQuestion, LoadError>),
    Checked(CheckTicket, Result<AnswerVerdict, VerifyError>),
}

/// A backend request that does not borrow the session.
pub type InFlight = Pin<Box<dyn Future<Output = Completion> + Send>>;

/// Drives a `PracticeSession` against the backend, one awaited call at a time.
#[derive(Clone)]
pub struct PracticeLoopService {
    clock: Clock,
    api: Arc<dyn ExerciseApi>,
    credentials: Arc<dyn CredentialStore>,
    loader: QuestionLoader,
    verifier: AnswerVerifier,
    config: SessionConfig,
}

impl PracticeLoopService {
    #[must_use]
    pub fn new(api: Arc<dyn ExerciseApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            clock: Clock::default(),
            loader: QuestionLoader::new(Arc::clone(&api)),
            verifier: AnswerVerifier::new(Arc::clone(&api)),
            api,
            credentials,
            config: SessionConfig::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// A fresh session in `Loading`, without any backend calls.
    #[must_use]
    pub fn session(&self, mode: PracticeMode) -> PracticeSession {
        PracticeSession::new(
            mode,
            Arc::clone(&self.credentials),
            self.config.clone(),
            self.clock,
        )
    }

    /// Create a session, refresh profile data, and load the first question.
    pub async fn mount(&self, mode: PracticeMode) -> PracticeSession {
        let mut session = self.session(mode);
        self.refresh(&mut session).await;
        if let Err(err) = self.load_next(&mut session).await {
            warn!(error = %err, "initial question load not started");
        }
        session
    }

    /// Switch topic or random mode: reset, refresh, and load.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SignedOut` if the session already expired.
    pub async fn switch_mode(
        &self,
        session: &mut PracticeSession,
        mode: PracticeMode,
    ) -> Result<Delivery, SessionError> {
        if session.is_signed_out() {
            return Err(SessionError::SignedOut);
        }
        session.reset(mode);
        self.refresh(session).await;
        self.load_next(session).await
    }

    /// Refresh the explanation preference and cached skill level.
    ///
    /// A 401 expires the session; other failures keep the current values.
    pub async fn refresh(&self, session: &mut PracticeSession) {
        if session.is_signed_out() {
            return;
        }
        match self.api.user_profile().await {
            Ok(profile) => session.apply_profile(&profile),
            Err(ApiError::Unauthorized) => {
                session.expire();
                return;
            }
            Err(err) => warn!(error = %err, "user profile unavailable, keeping defaults"),
        }
        match self.api.topic_levels().await {
            Ok(levels) => session.apply_topic_levels(&levels),
            Err(ApiError::Unauthorized) => session.expire(),
            Err(err) => warn!(error = %err, "topic levels unavailable"),
        }
    }

    /// Fetch the next question ("next" action, or first load on mount).
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the session does not allow loading right now.
    pub async fn load_next(&self, session: &mut PracticeSession) -> Result<Delivery, SessionError> {
        let request = self.start_load(session)?;
        Ok(self.complete(session, request.await))
    }

    /// Verify the selected answer ("check" action).
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when there is nothing to check.
    pub async fn check(&self, session: &mut PracticeSession) -> Result<Delivery, SessionError> {
        let request = self.start_check(session)?;
        Ok(self.complete(session, request.await))
    }

    /// Move the session to `Loading` and return the fetch without awaiting it.
    ///
    /// The session stays usable while the request runs; hand the result to
    /// `complete`. Starting another load makes this one stale.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the session does not allow loading right now.
    pub fn start_load(&self, session: &mut PracticeSession) -> Result<InFlight, SessionError> {
        let ticket = session.begin_load()?;
        info!(generation = ticket.generation(), mode = ?ticket.mode(), "loading question");
        let loader = self.loader.clone();
        Ok(Box::pin(async move {
            let result = loader.fetch(ticket.mode()).await;
            Completion::Loaded(ticket, result)
        }))
    }

    /// Move the session to `Checking` and return the verification without awaiting it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when there is nothing to check.
    pub fn start_check(&self, session: &mut PracticeSession) -> Result<InFlight, SessionError> {
        let ticket = session.begin_check()?;
        let verifier = self.verifier.clone();
        Ok(Box::pin(async move {
            let result = verifier.verify(ticket.submission()).await;
            Completion::Checked(ticket, result)
        }))
    }

    /// Apply a finished request. Results from an older generation are dropped.
    pub fn complete(&self, session: &mut PracticeSession, completion: Completion) -> Delivery {
        match completion {
            Completion::Loaded(ticket, result) => session.finish_load(ticket, result),
            Completion::Checked(ticket, result) => session.finish_check(ticket, result),
        }
    }

    #[must_use]
    pub fn loader(&self) -> &QuestionLoader {
        &self.loader
    }

    #[must_use]
    pub fn verifier(&self) -> &AnswerVerifier {
        &self.verifier
    }
}
