use practice_core::Feedback;
use practice_core::explain::Explanation;
use practice_core::model::PreparedQuestion;

/// Where the current question is in its lifecycle. Exactly one variant is active,
/// so flags like "checking while answered" cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    /// A question fetch is outstanding.
    Loading,
    /// The last fetch failed; the learner must trigger "next" again.
    LoadFailed { message: String },
    /// A question is shown and can be answered.
    Ready {
        question: PreparedQuestion,
        selected: Option<usize>,
        /// Inline message from a failed verification attempt.
        notice: Option<String>,
    },
    /// The selected answer is being verified.
    Checking {
        question: PreparedQuestion,
        selected: usize,
    },
    Answered(Answered),
    /// Credentials were cleared after a 401. Terminal.
    SignedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answered {
    pub question: PreparedQuestion,
    pub selected: usize,
    pub feedback: Feedback,
    pub level: u32,
    pub modal_open: bool,
    pub explanation: Option<Explanation>,
    pub explanation_open: bool,
}

impl SessionPhase {
    #[must_use]
    pub fn question(&self) -> Option<&PreparedQuestion> {
        match self {
            SessionPhase::Ready { question, .. } | SessionPhase::Checking { question, .. } => {
                Some(question)
            }
            SessionPhase::Answered(answered) => Some(&answered.question),
            SessionPhase::Loading | SessionPhase::LoadFailed { .. } | SessionPhase::SignedOut => {
                None
            }
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        match self {
            SessionPhase::Ready { selected, .. } => *selected,
            SessionPhase::Checking { selected, .. } => Some(*selected),
            SessionPhase::Answered(answered) => Some(answered.selected),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Loading => "loading",
            SessionPhase::LoadFailed { .. } => "load_failed",
            SessionPhase::Ready { .. } => "ready",
            SessionPhase::Checking { .. } => "checking",
            SessionPhase::Answered(_) => "answered",
            SessionPhase::SignedOut => "signed_out",
        }
    }
}
