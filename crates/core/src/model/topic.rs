use std::fmt;

use crate::model::ids::TopicId;

/// Known practice topics and their backend ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    FractionAddition,
    FractionSubtraction,
    FractionMultiplication,
    FractionDivision,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Addition,
        Topic::Subtraction,
        Topic::Multiplication,
        Topic::Division,
        Topic::FractionAddition,
        Topic::FractionSubtraction,
        Topic::FractionMultiplication,
        Topic::FractionDivision,
    ];

    #[must_use]
    pub fn id(self) -> TopicId {
        let raw = match self {
            Topic::Addition => 1,
            Topic::Subtraction => 2,
            Topic::Multiplication => 3,
            Topic::Division => 4,
            Topic::FractionAddition => 5,
            Topic::FractionSubtraction => 6,
            Topic::FractionMultiplication => 7,
            Topic::FractionDivision => 8,
        };
        TopicId::new(raw)
    }

    /// Returns `None` for ids the catalogue does not know about.
    #[must_use]
    pub fn from_id(id: TopicId) -> Option<Self> {
        Self::ALL.into_iter().find(|topic| topic.id() == id)
    }

    #[must_use]
    pub fn is_fraction(self) -> bool {
        matches!(
            self,
            Topic::FractionAddition
                | Topic::FractionSubtraction
                | Topic::FractionMultiplication
                | Topic::FractionDivision
        )
    }

    /// Learner-facing name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Topic::Addition => "חיבור",
            Topic::Subtraction => "חיסור",
            Topic::Multiplication => "כפל",
            Topic::Division => "חילוק",
            Topic::FractionAddition => "חיבור שברים",
            Topic::FractionSubtraction => "חיסור שברים",
            Topic::FractionMultiplication => "כפל שברים",
            Topic::FractionDivision => "חילוק שברים",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Where the next question comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeMode {
    Topic(TopicId),
    Random,
}

impl PracticeMode {
    #[must_use]
    pub fn topic_id(self) -> Option<TopicId> {
        match self {
            PracticeMode::Topic(id) => Some(id),
            PracticeMode::Random => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_catalogue() {
        for topic in Topic::ALL {
            assert_eq!(Topic::from_id(topic.id()), Some(topic));
        }
        assert_eq!(Topic::from_id(TopicId::new(99)), None);
    }

    #[test]
    fn fraction_topics_start_at_five() {
        let fractions: Vec<_> = Topic::ALL
            .into_iter()
            .filter(|topic| topic.is_fraction())
            .map(|topic| topic.id().value())
            .collect();
        assert_eq!(fractions, vec![5, 6, 7, 8]);
    }
}
