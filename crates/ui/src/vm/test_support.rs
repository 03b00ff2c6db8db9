use std::sync::Arc;

use practice_core::model::{AnswerVerdict, PracticeMode, PreparedQuestion, Question};
use practice_core::time::fixed_clock;
use services::{InMemoryCredentials, PracticeSession, SessionConfig};

pub(crate) fn session(mode: PracticeMode) -> PracticeSession {
    PracticeSession::new(
        mode,
        Arc::new(InMemoryCredentials::with_token("token")),
        SessionConfig::default(),
        fixed_clock(),
    )
}

pub(crate) fn multiplication() -> Question {
    serde_json::from_value(serde_json::json!({
        "first": 3,
        "second": 4,
        "operationSign": "×",
        "answers": [7, 12, 1, 34],
        "correctAnswer": 12
    }))
    .unwrap()
}

pub(crate) fn verdict(
    is_correct: bool,
    correct: i64,
    level: u32,
    message: Option<&str>,
) -> AnswerVerdict {
    serde_json::from_value(serde_json::json!({
        "isCorrect": is_correct,
        "correctAnswer": correct,
        "currentLevel": level,
        "levelChangeMessage": message
    }))
    .unwrap()
}

pub(crate) fn loaded_session(mode: PracticeMode, question: Question) -> PracticeSession {
    let mut session = session(mode);
    let ticket = session.begin_load().unwrap();
    session.finish_load(ticket, Ok(PreparedQuestion::prepare(question).unwrap()));
    session
}

pub(crate) fn answered_session(
    question: Question,
    selected: usize,
    verdict: AnswerVerdict,
) -> PracticeSession {
    let mut session = loaded_session(PracticeMode::Random, question);
    assert!(session.select(selected));
    let ticket = session.begin_check().unwrap();
    session.finish_check(ticket, Ok(verdict));
    session
}
