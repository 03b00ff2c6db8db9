use practice_core::model::PreparedQuestion;
use practice_core::{FeedbackColor, Presentation};
use services::{Answered, PracticeSession, SessionPhase};

use super::topic_vm::topic_title;

const LOADING_LABEL: &str = "טוען שאלה...";
const SIGNED_OUT_LABEL: &str = "פג תוקף ההתחברות. יש להתחבר מחדש.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenStatus {
    Loading,
    LoadFailed(String),
    Question,
    SignedOut,
}

impl ScreenStatus {
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            ScreenStatus::Loading => Some(LOADING_LABEL),
            ScreenStatus::LoadFailed(message) => Some(message.as_str()),
            ScreenStatus::SignedOut => Some(SIGNED_OUT_LABEL),
            ScreenStatus::Question => None,
        }
    }
}

/// How an answer button is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerHighlight {
    None,
    Selected,
    /// The right answer, revealed after checking.
    Correct,
    /// The learner's pick, when it was wrong.
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerButtonVm {
    pub index: usize,
    pub label: String,
    pub highlight: AnswerHighlight,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackLineVm {
    pub message: String,
    pub color: FeedbackColor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalVm {
    pub message: String,
    pub color: FeedbackColor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplanationVm {
    pub open: bool,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionScreenVm {
    pub title: String,
    pub level_label: Option<String>,
    pub status: ScreenStatus,
    pub question_text: Option<String>,
    pub answers: Vec<AnswerButtonVm>,
    pub check_enabled: bool,
    pub next_enabled: bool,
    pub checking: bool,
    pub feedback: Option<FeedbackLineVm>,
    pub modal: Option<ModalVm>,
    pub explanation: Option<ExplanationVm>,
    pub notice: Option<String>,
}

#[must_use]
pub fn map_question_screen(session: &PracticeSession) -> QuestionScreenVm {
    let mut vm = QuestionScreenVm {
        title: topic_title(session.mode()),
        level_label: session.skill_level().map(|level| format!("רמה {level}")),
        status: ScreenStatus::Question,
        question_text: session.phase().question().map(|q| q.text().to_string()),
        answers: Vec::new(),
        check_enabled: session.check_enabled(),
        next_enabled: session.next_enabled(),
        checking: false,
        feedback: None,
        modal: None,
        explanation: None,
        notice: None,
    };

    match session.phase() {
        SessionPhase::Loading => vm.status = ScreenStatus::Loading,
        SessionPhase::LoadFailed { message } => {
            vm.status = ScreenStatus::LoadFailed(message.clone());
        }
        SessionPhase::SignedOut => vm.status = ScreenStatus::SignedOut,
        SessionPhase::Ready {
            question,
            selected,
            notice,
        } => {
            vm.answers = pending_buttons(question, *selected, true);
            vm.notice.clone_from(notice);
        }
        SessionPhase::Checking { question, selected } => {
            vm.checking = true;
            vm.answers = pending_buttons(question, Some(*selected), false);
        }
        SessionPhase::Answered(answered) => fill_answered(&mut vm, answered),
    }
    vm
}

fn pending_buttons(
    question: &PreparedQuestion,
    selected: Option<usize>,
    enabled: bool,
) -> Vec<AnswerButtonVm> {
    question
        .answer_labels()
        .iter()
        .enumerate()
        .map(|(index, label)| AnswerButtonVm {
            index,
            label: label.clone(),
            highlight: if selected == Some(index) {
                AnswerHighlight::Selected
            } else {
                AnswerHighlight::None
            },
            enabled,
        })
        .collect()
}

fn fill_answered(vm: &mut QuestionScreenVm, answered: &Answered) {
    let correct_index = answered.question.correct_index();
    vm.answers = answered
        .question
        .answer_labels()
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let highlight = if index == correct_index {
                AnswerHighlight::Correct
            } else if index == answered.selected {
                AnswerHighlight::Incorrect
            } else {
                AnswerHighlight::None
            };
            AnswerButtonVm {
                index,
                label: label.clone(),
                highlight,
                enabled: false,
            }
        })
        .collect();

    vm.level_label = Some(format!("רמה {}", answered.level));
    vm.feedback = Some(FeedbackLineVm {
        message: answered.feedback.message.clone(),
        color: answered.feedback.color,
    });
    if answered.feedback.presentation == Presentation::Modal && answered.modal_open {
        vm.modal = Some(ModalVm {
            message: answered.feedback.message.clone(),
            color: answered.feedback.color,
        });
    }
    vm.explanation = answered.explanation.as_ref().map(|explanation| ExplanationVm {
        open: answered.explanation_open,
        lines: explanation.render_lines(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::test_support::{answered_session, loaded_session, multiplication, verdict};
    use practice_core::model::PracticeMode;

    #[test]
    fn ready_question_enables_answers_and_check() {
        let mut session = loaded_session(PracticeMode::Random, multiplication());
        session.select(2);

        let vm = map_question_screen(&session);

        assert_eq!(vm.title, "תרגול אקראי");
        assert_eq!(vm.status, ScreenStatus::Question);
        assert_eq!(vm.question_text.as_deref(), Some("3 × 4 = ?"));
        assert_eq!(vm.answers.len(), 4);
        assert!(vm.answers.iter().all(|button| button.enabled));
        assert_eq!(vm.answers[2].highlight, AnswerHighlight::Selected);
        assert!(vm.check_enabled);
        assert!(!vm.next_enabled);
        assert!(vm.feedback.is_none());
    }

    #[test]
    fn wrong_answer_marks_pick_and_reveals_correct() {
        let session = answered_session(multiplication(), 0, verdict(false, 12, 1, None));

        let vm = map_question_screen(&session);

        assert_eq!(vm.answers[0].highlight, AnswerHighlight::Incorrect);
        assert_eq!(vm.answers[1].highlight, AnswerHighlight::Correct);
        assert!(vm.answers.iter().all(|button| !button.enabled));
        assert!(!vm.check_enabled);
        assert!(vm.next_enabled);
        let feedback = vm.feedback.unwrap();
        assert_eq!(feedback.color, FeedbackColor::Failure);
        assert!(feedback.message.ends_with("12"));
        assert!(vm.modal.is_none());
        assert_eq!(vm.level_label.as_deref(), Some("רמה 1"));
    }

    #[test]
    fn level_up_opens_modal_until_dismissed() {
        let mut session =
            answered_session(multiplication(), 1, verdict(true, 12, 2, Some("עלית לרמה 2!")));

        let vm = map_question_screen(&session);
        assert_eq!(
            vm.modal,
            Some(ModalVm {
                message: "עלית לרמה 2!".to_string(),
                color: FeedbackColor::Success,
            })
        );

        session.dismiss_modal();
        let vm = map_question_screen(&session);
        assert!(vm.modal.is_none());
        assert!(vm.feedback.is_some());
    }

    #[test]
    fn explanation_lines_follow_toggle() {
        let mut session = answered_session(multiplication(), 1, verdict(true, 12, 1, None));

        let closed = map_question_screen(&session).explanation.unwrap();
        assert!(!closed.open);
        assert_eq!(closed.lines.last().map(String::as_str), Some("4 × 3 = 12"));

        assert!(session.toggle_explanation());
        assert!(map_question_screen(&session).explanation.unwrap().open);
    }

    #[test]
    fn loading_and_failed_states_have_no_answers() {
        let session = crate::vm::test_support::session(PracticeMode::Random);
        let vm = map_question_screen(&session);
        assert_eq!(vm.status, ScreenStatus::Loading);
        assert_eq!(vm.status.label(), Some(LOADING_LABEL));
        assert!(vm.answers.is_empty());
        assert!(!vm.check_enabled);
    }
}
