//! Aggregate report of a finished session.

use std::collections::HashMap;

use crate::models::{Question, QuestionResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Percentage in `[0, 100]`.
    pub score: f64,
    /// One result per question, in quiz order.
    pub results: Vec<QuestionResult>,
}

/// Performance band shown with the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Perfect,
    Excellent,
    Good,
    KeepPracticing,
}

impl Performance {
    pub fn message(&self) -> &'static str {
        match self {
            Performance::Perfect => "Perfect Score! Outstanding!",
            Performance::Excellent => "Excellent Work!",
            Performance::Good => "Good Job!",
            Performance::KeepPracticing => "Keep Practicing!",
        }
    }
}

impl Summary {
    pub fn performance(&self) -> Performance {
        if self.total > 0 && self.correct == self.total {
            Performance::Perfect
        } else if self.score >= 80.0 {
            Performance::Excellent
        } else if self.score >= 60.0 {
            Performance::Good
        } else {
            Performance::KeepPracticing
        }
    }
}

/// Folds the recorded results over the question sequence. Questions without
/// a result count as incorrect.
pub fn generate(questions: &[Question], results: &HashMap<String, QuestionResult>) -> Summary {
    let results: Vec<QuestionResult> = questions
        .iter()
        .map(|question| {
            results
                .get(&question.id)
                .cloned()
                .unwrap_or_else(|| QuestionResult::unanswered(question))
        })
        .collect();

    let total = results.len();
    let correct = results.iter().filter(|result| result.is_correct).count();

    Summary {
        total,
        correct,
        incorrect: total - correct,
        score: score_percent(correct, total),
        results,
    }
}

/// `0.0` for an empty quiz.
pub fn score_percent(correct: usize, total: usize) -> f64 {
    if total > 0 {
        (correct as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
