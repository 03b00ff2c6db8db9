use chrono::{DateTime, Utc};

/// One answered question within a practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub question_text: String,
    pub user_answer_display: String,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}
