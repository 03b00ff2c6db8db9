use std::fmt;
use std::mem;
use std::sync::Arc;

use tracing::{info, warn};

use practice_core::explain;
use practice_core::feedback::{self, LOAD_FAILED_MESSAGE, NO_SELECTION_MESSAGE};
use practice_core::model::{
    AnswerSubmission, AnswerVerdict, HistoryEntry, PracticeMode, PreparedQuestion, TopicLevels,
    UserProfile,
};
use practice_core::{Clock, Cue, Presentation};

use super::history::HistoryLog;
use super::phase::{Answered, SessionPhase};
use crate::config::SessionConfig;
use crate::credentials::CredentialStore;
use crate::error::{LoadError, SessionError, VerifyError};

//
// ─── TICKETS ───────────────────────────────────────────────────────────────────
//

/// Issued when a fetch starts; hand it back with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    mode: PracticeMode,
}

impl LoadTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.mode
    }
}

/// Issued when a verification starts; carries the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckTicket {
    generation: u64,
    submission: AnswerSubmission,
}

impl CheckTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn submission(&self) -> &AnswerSubmission {
        &self.submission
    }
}

/// Whether a late result was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Stale,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine for one practice screen.
///
/// `Loading → Ready → Checking → Answered → Loading …`. Network work happens outside:
/// each `begin_*` call hands out a ticket and each `finish_*` call applies the result
/// only if the ticket's generation is still current.
pub struct PracticeSession {
    mode: PracticeMode,
    phase: SessionPhase,
    generation: u64,
    skill_level: Option<u32>,
    explanations_enabled: bool,
    history: HistoryLog,
    cues: Vec<Cue>,
    credentials: Arc<dyn CredentialStore>,
    config: SessionConfig,
    clock: Clock,
}

impl PracticeSession {
    #[must_use]
    pub fn new(
        mode: PracticeMode,
        credentials: Arc<dyn CredentialStore>,
        config: SessionConfig,
        clock: Clock,
    ) -> Self {
        Self {
            mode,
            phase: SessionPhase::Loading,
            generation: 0,
            skill_level: None,
            explanations_enabled: true,
            history: HistoryLog::new(),
            cues: Vec::new(),
            credentials,
            config,
            clock,
        }
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cached skill level for the active topic, if known.
    #[must_use]
    pub fn skill_level(&self) -> Option<u32> {
        self.skill_level
    }

    #[must_use]
    pub fn explanations_enabled(&self) -> bool {
        self.explanations_enabled
    }

    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    #[must_use]
    pub fn is_signed_out(&self) -> bool {
        matches!(self.phase, SessionPhase::SignedOut)
    }

    /// The check control is enabled only while a question awaits an answer.
    #[must_use]
    pub fn check_enabled(&self) -> bool {
        matches!(self.phase, SessionPhase::Ready { .. })
    }

    /// The next control is enabled once the question is answered or the fetch failed.
    #[must_use]
    pub fn next_enabled(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Answered(_) | SessionPhase::LoadFailed { .. }
        )
    }

    /// Take the pending cues, oldest first.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        mem::take(&mut self.cues)
    }

    //
    // ─── MOUNT DATA ────────────────────────────────────────────────────────────
    //

    pub fn apply_profile(&mut self, profile: &UserProfile) {
        self.explanations_enabled = profile.explanations_enabled();
    }

    pub fn apply_topic_levels(&mut self, levels: &TopicLevels) {
        if let Some(topic_id) = self.mode.topic_id() {
            self.skill_level = levels.level_for(topic_id).or(self.skill_level);
        }
    }

    /// Enter a new topic or random mode. Drops history, pending cues, and any
    /// in-flight result.
    pub fn reset(&mut self, mode: PracticeMode) {
        if self.is_signed_out() {
            return;
        }
        info!(?mode, "practice session reset");
        self.mode = mode;
        self.generation += 1;
        self.skill_level = None;
        self.history.clear();
        self.cues.clear();
        self.phase = SessionPhase::Loading;
    }

    /// Clear credentials and stop. Any 401 from the backend lands here.
    pub fn expire(&mut self) {
        if self.is_signed_out() {
            return;
        }
        warn!("authentication expired, clearing credentials");
        self.credentials.clear();
        self.generation += 1;
        self.phase = SessionPhase::SignedOut;
        self.cues.push(Cue::RedirectToLogin);
    }

    //
    // ─── LOADING ───────────────────────────────────────────────────────────────
    //

    /// Start fetching the next question.
    ///
    /// Allowed on mount, after an answer, after a failed fetch, and while another
    /// fetch is outstanding (the older one becomes stale).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAnswered` while a question is unanswered and
    /// `SessionError::SignedOut` after expiry.
    pub fn begin_load(&mut self) -> Result<LoadTicket, SessionError> {
        match self.phase {
            SessionPhase::SignedOut => return Err(SessionError::SignedOut),
            SessionPhase::Ready { .. } | SessionPhase::Checking { .. } => {
                return Err(SessionError::NotAnswered);
            }
            SessionPhase::Loading
            | SessionPhase::LoadFailed { .. }
            | SessionPhase::Answered(_) => {}
        }
        self.generation += 1;
        self.phase = SessionPhase::Loading;
        Ok(LoadTicket {
            generation: self.generation,
            mode: self.mode,
        })
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<PreparedQuestion, LoadError>,
    ) -> Delivery {
        if ticket.generation != self.generation
            || !matches!(self.phase, SessionPhase::Loading)
        {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale question response"
            );
            return Delivery::Stale;
        }

        match result {
            Ok(question) => {
                info!(generation = self.generation, "question ready");
                self.phase = SessionPhase::Ready {
                    question,
                    selected: None,
                    notice: None,
                };
            }
            Err(LoadError::AuthExpired) => self.expire(),
            Err(err) => {
                warn!(error = %err, "failed to load question");
                self.phase = SessionPhase::LoadFailed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
                self.cues.push(Cue::Alert(LOAD_FAILED_MESSAGE.to_string()));
            }
        }
        Delivery::Applied
    }

    //
    // ─── ANSWERING ─────────────────────────────────────────────────────────────
    //

    /// Select an answer slot. Ignored unless a question is awaiting an answer.
    pub fn select(&mut self, index: usize) -> bool {
        match &mut self.phase {
            SessionPhase::Ready {
                selected, notice, ..
            } if index < 4 => {
                *selected = Some(index);
                *notice = None;
                true
            }
            _ => false,
        }
    }

    /// Start verifying the selected answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` (and queues an alert) when nothing is
    /// selected, `CheckPending` while a verification is outstanding,
    /// `AlreadyAnswered` after the verdict, and `NoQuestion` otherwise.
    pub fn begin_check(&mut self) -> Result<CheckTicket, SessionError> {
        let (question, selected) = match mem::replace(&mut self.phase, SessionPhase::Loading) {
            SessionPhase::Ready {
                question,
                selected: Some(selected),
                notice,
            } => match question.answer(selected) {
                Some(_) => (question, selected),
                None => {
                    self.phase = SessionPhase::Ready {
                        question,
                        selected: None,
                        notice,
                    };
                    return Err(SessionError::NoSelection);
                }
            },
            other => {
                let rejection = match &other {
                    SessionPhase::Ready { .. } => {
                        self.cues.push(Cue::Alert(NO_SELECTION_MESSAGE.to_string()));
                        SessionError::NoSelection
                    }
                    SessionPhase::Checking { .. } => SessionError::CheckPending,
                    SessionPhase::Answered(_) => SessionError::AlreadyAnswered,
                    SessionPhase::SignedOut => SessionError::SignedOut,
                    SessionPhase::Loading | SessionPhase::LoadFailed { .. } => {
                        SessionError::NoQuestion
                    }
                };
                self.phase = other;
                return Err(rejection);
            }
        };

        let submission = AnswerSubmission {
            answer: question.wire().answers[selected],
            question: question.wire().clone(),
        };
        self.phase = SessionPhase::Checking { question, selected };
        Ok(CheckTicket {
            generation: self.generation,
            submission,
        })
    }

    pub fn finish_check(
        &mut self,
        ticket: CheckTicket,
        result: Result<AnswerVerdict, VerifyError>,
    ) -> Delivery {
        let (question, selected) = match mem::replace(&mut self.phase, SessionPhase::Loading) {
            SessionPhase::Checking { question, selected } if ticket.generation == self.generation => {
                (question, selected)
            }
            other => {
                self.phase = other;
                warn!(
                    ticket = ticket.generation,
                    current = self.generation,
                    "discarding stale verdict"
                );
                return Delivery::Stale;
            }
        };

        match result {
            Ok(verdict) => self.record_verdict(question, selected, ticket.submission, &verdict),
            Err(VerifyError::AuthExpired) => self.expire(),
            Err(err) => {
                warn!(error = %err, "answer verification failed");
                self.phase = SessionPhase::Ready {
                    question,
                    selected: Some(selected),
                    notice: Some(err.user_message()),
                };
            }
        }
        Delivery::Applied
    }

    fn record_verdict(
        &mut self,
        question: PreparedQuestion,
        selected: usize,
        submission: AnswerSubmission,
        verdict: &AnswerVerdict,
    ) {
        let feedback = feedback::classify(verdict, &question, self.config.regression_markers());
        let level = verdict.current_level;
        self.skill_level = Some(level);

        self.history.append(HistoryEntry {
            question_text: question.text().to_string(),
            user_answer_display: question.display_value(submission.answer),
            correct: verdict.is_correct,
            answered_at: self.clock.now(),
        });

        let explanation = if self.explanations_enabled {
            explain::select(&question, level)
        } else {
            None
        };

        info!(outcome = ?feedback.outcome, level, "answer checked");
        if let Some(cue) = feedback.cue.clone() {
            self.cues.push(cue);
        }
        self.phase = SessionPhase::Answered(Answered {
            question,
            selected,
            modal_open: feedback.presentation == Presentation::Modal,
            feedback,
            level,
            explanation,
            explanation_open: false,
        });
    }

    //
    // ─── POST-ANSWER ───────────────────────────────────────────────────────────
    //

    /// Close the level-change modal. The session stays answered.
    pub fn dismiss_modal(&mut self) {
        if let SessionPhase::Answered(answered) = &mut self.phase {
            answered.modal_open = false;
        }
    }

    /// Show or hide the explanation. Returns the new visibility.
    pub fn toggle_explanation(&mut self) -> bool {
        match &mut self.phase {
            SessionPhase::Answered(answered) if answered.explanation.is_some() => {
                answered.explanation_open = !answered.explanation_open;
                answered.explanation_open
            }
            _ => false,
        }
    }
}

impl fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("mode", &self.mode)
            .field("phase", &self.phase.name())
            .field("generation", &self.generation)
            .field("skill_level", &self.skill_level)
            .field("history_len", &self.history.len())
            .field("pending_cues", &self.cues.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
