pub mod vm;

pub use vm::{
    AnswerButtonVm, AnswerHighlight, ExplanationVm, FeedbackLineVm, HistoryRowVm, HistoryVm,
    ModalVm, QuestionScreenVm, ScreenStatus, map_history, map_question_screen, topic_title,
};
