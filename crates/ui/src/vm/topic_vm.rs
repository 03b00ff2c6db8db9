use practice_core::model::{PracticeMode, Topic};

const RANDOM_TITLE: &str = "תרגול אקראי";

/// Screen title for a practice mode. Unknown topic ids fall back to the raw id.
#[must_use]
pub fn topic_title(mode: PracticeMode) -> String {
    match mode {
        PracticeMode::Random => RANDOM_TITLE.to_string(),
        PracticeMode::Topic(id) => Topic::from_id(id)
            .map_or_else(|| format!("נושא {id}"), |topic| topic.display_name().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::TopicId;

    #[test]
    fn titles_known_and_unknown_topics() {
        assert_eq!(topic_title(PracticeMode::Topic(TopicId::new(3))), "כפל");
        assert_eq!(topic_title(PracticeMode::Topic(TopicId::new(42))), "נושא 42");
        assert_eq!(topic_title(PracticeMode::Random), RANDOM_TITLE);
    }
}
