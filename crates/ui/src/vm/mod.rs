mod history_vm;
mod question_vm;
mod time_fmt;
mod topic_vm;

pub use history_vm::{HistoryRowVm, HistoryVm, map_history};
pub use question_vm::{
    AnswerButtonVm, AnswerHighlight, ExplanationVm, FeedbackLineVm, ModalVm, QuestionScreenVm,
    ScreenStatus, map_question_screen,
};
pub use time_fmt::format_clock_time;
pub use topic_vm::topic_title;

#[cfg(test)]
pub(crate) mod test_support;
