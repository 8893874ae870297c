use std::ops::Range;

use crate::models::Topic;

/// Questions offered by default when a topic is chosen.
pub const DEFAULT_QUESTION_COUNT: usize = 30;

/// Inclusive, 1-indexed question range of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    pub start: usize,
    pub count: usize,
}

impl QuizConfig {
    pub fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    pub fn for_topic(topic: &Topic) -> Self {
        Self::new(1, DEFAULT_QUESTION_COUNT.min(topic.question_count)).clamped(topic.question_count)
    }

    /// Clamps start into `[1, available]` and count into what remains from
    /// there, never below one question. Nothing is clamped up when
    /// `available` is zero.
    pub fn clamped(self, available: usize) -> Self {
        if available == 0 {
            return Self::new(1, 0);
        }
        let start = self.start.clamp(1, available);
        let remaining = available - start + 1;
        Self::new(start, self.count.clamp(1, remaining))
    }

    /// Last question number of the range.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.count).saturating_sub(1)
    }

    /// The range as 0-based slice indices.
    pub fn indices(&self) -> Range<usize> {
        let first = self.start.saturating_sub(1);
        first..first.saturating_add(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(question_count: usize) -> Topic {
        Topic {
            id: "t".to_string(),
            name: "Topic".to_string(),
            description: String::new(),
            file_name: "t.json".to_string(),
            question_count,
            icon: None,
        }
    }

    #[test]
    fn test_count_is_clamped_to_remaining_questions() {
        let config = QuizConfig::new(8, 10).clamped(10);
        assert_eq!(config, QuizConfig::new(8, 3));
        assert_eq!(config.end(), 10);
        assert_eq!(config.indices(), 7..10);
    }

    #[test]
    fn test_start_is_clamped_into_range() {
        assert_eq!(QuizConfig::new(0, 5).clamped(10), QuizConfig::new(1, 5));
        assert_eq!(QuizConfig::new(25, 5).clamped(10), QuizConfig::new(10, 1));
    }

    #[test]
    fn test_count_floors_at_one() {
        assert_eq!(QuizConfig::new(3, 0).clamped(10), QuizConfig::new(3, 1));
    }

    #[test]
    fn test_nothing_available() {
        assert_eq!(QuizConfig::new(4, 4).clamped(0), QuizConfig::new(1, 0));
    }

    #[test]
    fn test_huge_values_saturate() {
        let config = QuizConfig::new(usize::MAX, usize::MAX);
        assert_eq!(config.end(), usize::MAX - 1);
        assert_eq!(config.indices(), usize::MAX - 1..usize::MAX);
        assert_eq!(config.clamped(10), QuizConfig::new(10, 1));
    }

    #[test]
    fn test_topic_default() {
        assert_eq!(QuizConfig::for_topic(&topic(4)), QuizConfig::new(1, 4));
        assert_eq!(QuizConfig::for_topic(&topic(120)), QuizConfig::new(1, 30));
    }
}
