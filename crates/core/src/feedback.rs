//! Maps a backend verdict to exactly one presentation outcome.

use crate::model::{AnswerVerdict, LevelTransition, PreparedQuestion};

/// Prefix for correct answers.
pub const CORRECT_PREFIX: &str = "תשובה נכונה!";
/// Prefix for incorrect answers.
pub const INCORRECT_PREFIX: &str = "תשובה שגויה!";
/// Shown when no selection was made before checking.
pub const NO_SELECTION_MESSAGE: &str = "יש לבחור תשובה תחילה.";
/// Fallback when answer verification fails without a server message.
pub const VERIFICATION_FAILED_MESSAGE: &str = "אירעה שגיאה בבדיקת התשובה. נסו שוב.";
/// Shown when a question cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "טעינת השאלה נכשלה. לחצו על \"שאלה הבאה\" כדי לנסות שוב.";

/// Substring the backend uses in level-down messages.
pub const DEFAULT_REGRESSION_MARKER: &str = "ירד";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Correct,
    LevelUp,
    Incorrect,
    IncorrectWithNote,
    LevelDown,
}

impl Outcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Outcome::Correct | Outcome::LevelUp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackColor {
    #[default]
    Neutral,
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Inline,
    Modal,
}

/// One-shot side effect for the shell to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Celebrate,
    SuccessPulse,
    FailureHaptic,
    /// Blocking alert with a message.
    Alert(String),
    /// Credentials were cleared; the shell must hand over to login.
    RedirectToLogin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub outcome: Outcome,
    pub message: String,
    pub color: FeedbackColor,
    pub presentation: Presentation,
    /// Only celebrations, successes, and level-downs play a cue.
    pub cue: Option<Cue>,
}

/// Classify a verdict.
///
/// A correct answer with a level-change message is always a level-up. For an
/// incorrect answer with a message, an explicit `levelTransition` decides whether it
/// is a level-down; without one, the message must contain one of `regression_markers`.
#[must_use]
pub fn classify(
    verdict: &AnswerVerdict,
    question: &PreparedQuestion,
    regression_markers: &[String],
) -> Feedback {
    let message = verdict.level_change_message();

    if verdict.is_correct {
        return match message {
            Some(message) => Feedback {
                outcome: Outcome::LevelUp,
                message: message.to_string(),
                color: FeedbackColor::Success,
                presentation: Presentation::Modal,
                cue: Some(Cue::Celebrate),
            },
            _ => Feedback {
                outcome: Outcome::Correct,
                message: format!("{CORRECT_PREFIX} רמה נוכחית: {}", verdict.current_level),
                color: FeedbackColor::Success,
                presentation: Presentation::Inline,
                cue: Some(Cue::SuccessPulse),
            },
        };
    }

    match message {
        Some(message) if is_regression(verdict, message, regression_markers) => Feedback {
            outcome: Outcome::LevelDown,
            message: message.to_string(),
            color: FeedbackColor::Failure,
            presentation: Presentation::Modal,
            cue: Some(Cue::FailureHaptic),
        },
        Some(message) => Feedback {
            outcome: Outcome::IncorrectWithNote,
            message: message.to_string(),
            color: FeedbackColor::Failure,
            presentation: Presentation::Inline,
            cue: None,
        },
        None => {
            let correct = verdict.correct_answer.unwrap_or(question.correct_answer());
            Feedback {
                outcome: Outcome::Incorrect,
                message: format!(
                    "{INCORRECT_PREFIX} התשובה הנכונה היא {}",
                    question.display_value(correct)
                ),
                color: FeedbackColor::Failure,
                presentation: Presentation::Inline,
                cue: None,
            }
        }
    }
}

fn is_regression(verdict: &AnswerVerdict, message: &str, markers: &[String]) -> bool {
    match verdict.level_transition {
        Some(transition) => transition == LevelTransition::Down,
        None => markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .any(|marker| message.contains(marker.as_str())),
    }
}
