mod history;
mod ids;
mod question;
mod topic;
mod verdict;

pub use history::HistoryEntry;
pub use ids::{ParseIdError, TopicId};
pub use question::{Operand, Operation, PreparedQuestion, Question, QuestionError, WireOperand};
pub use topic::{PracticeMode, Topic};
pub use verdict::{AnswerSubmission, AnswerVerdict, LevelTransition, TopicLevel, TopicLevels, UserProfile};

#[cfg(test)]
pub(crate) use question::fixtures;
