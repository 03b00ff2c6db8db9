use services::HistoryLog;

use super::time_fmt::format_clock_time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub question: String,
    pub answer: String,
    pub correct: bool,
    pub mark: &'static str,
    pub time_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryVm {
    pub rows: Vec<HistoryRowVm>,
    pub summary_label: String,
    pub hidden_count: usize,
}

/// Map the last `limit` history entries, oldest first.
#[must_use]
pub fn map_history(log: &HistoryLog, limit: usize) -> HistoryVm {
    let recent = log.recent(limit);
    let rows = recent
        .iter()
        .map(|entry| HistoryRowVm {
            question: entry.question_text.clone(),
            answer: entry.user_answer_display.clone(),
            correct: entry.correct,
            mark: if entry.correct { "✓" } else { "✗" },
            time_label: format_clock_time(entry.answered_at),
        })
        .collect();

    HistoryVm {
        rows,
        summary_label: format!("{}/{} נכונות", log.correct_count(), log.len()),
        hidden_count: log.len() - recent.len(),
    }
}
