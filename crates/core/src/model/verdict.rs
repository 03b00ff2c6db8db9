use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec::EncodedValue;
use crate::model::ids::TopicId;
use crate::model::question::Question;

/// Body of `POST /api/exercises/answer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerSubmission {
    pub answer: EncodedValue,
    pub question: Question,
}

/// Direction of a skill-level change, when the backend reports it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelTransition {
    Up,
    Down,
}

/// Backend verdict for a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerVerdict {
    pub is_correct: bool,
    #[serde(default)]
    pub correct_answer: Option<EncodedValue>,
    pub current_level: u32,
    #[serde(default)]
    pub level_change_message: Option<String>,
    #[serde(default)]
    pub level_transition: Option<LevelTransition>,
}

impl AnswerVerdict {
    /// The level-change message, treating blank text as absent.
    #[must_use]
    pub fn level_change_message(&self) -> Option<&str> {
        self.level_change_message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

/// Subset of `GET /api/user` this client reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub detailed_solutions: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Explanations are offered unless the profile explicitly opts out.
    #[must_use]
    pub fn explanations_enabled(&self) -> bool {
        self.detailed_solutions.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicLevel {
    pub topic_id: TopicId,
    pub level: u32,
}

/// Body of `GET /api/user/topics-levels`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicLevels {
    #[serde(default)]
    pub topics: Vec<TopicLevel>,
}

impl TopicLevels {
    #[must_use]
    pub fn level_for(&self, topic_id: TopicId) -> Option<u32> {
        self.topics
            .iter()
            .find(|entry| entry.topic_id == topic_id)
            .map(|entry| entry.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_parses_minimal_payload() {
        let verdict: AnswerVerdict = serde_json::from_value(serde_json::json!({
            "isCorrect": false,
            "currentLevel": 2
        }))
        .unwrap();
        assert!(!verdict.is_correct);
        assert_eq!(verdict.correct_answer, None);
        assert_eq!(verdict.level_change_message(), None);
        assert_eq!(verdict.level_transition, None);
    }

    #[test]
    fn blank_message_counts_as_absent() {
        let verdict: AnswerVerdict = serde_json::from_value(serde_json::json!({
            "isCorrect": true,
            "correctAnswer": 12,
            "currentLevel": 3,
            "levelChangeMessage": "  ",
            "levelTransition": "up"
        }))
        .unwrap();
        assert_eq!(verdict.level_change_message(), None);
        assert_eq!(verdict.level_transition, Some(LevelTransition::Up));
    }

    #[test]
    fn profile_defaults_to_explanations_on() {
        let profile: UserProfile =
            serde_json::from_value(serde_json::json!({ "username": "dana" })).unwrap();
        assert!(profile.explanations_enabled());

        let profile: UserProfile =
            serde_json::from_value(serde_json::json!({ "detailedSolutions": false })).unwrap();
        assert!(!profile.explanations_enabled());
    }

    #[test]
    fn topic_levels_lookup() {
        let levels: TopicLevels = serde_json::from_value(serde_json::json!({
            "topics": [{ "topicId": 1, "level": 4 }, { "topicId": 5, "level": 1 }]
        }))
        .unwrap();
        assert_eq!(levels.level_for(TopicId::new(5)), Some(1));
        assert_eq!(levels.level_for(TopicId::new(2)), None);
    }

    #[test]
    fn submission_serializes_answer_and_question() {
        let question = crate::model::question::fixtures::wire(1, "+", 2, [3, 4, 5, 6], 3);
        let body = serde_json::to_value(AnswerSubmission {
            answer: EncodedValue::new(4),
            question,
        })
        .unwrap();
        assert_eq!(body["answer"], 4);
        assert_eq!(body["question"]["operationSign"], "+");
        assert_eq!(body["question"]["correctAnswer"], 3);
    }
}
