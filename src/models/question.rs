use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::shuffle::shuffled;

/// One selectable answer of a standard question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizOption {
    pub id: String,
    /// Display letter, e.g. "A".
    pub label: String,
    pub text: String,
}

/// A step of an ordering question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingStep {
    pub step_number: u32,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// A scenario of a matching question. Candidates are shared by the question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingScenario {
    pub id: u32,
    pub text: String,
    pub correct_answer: String,
}

/// Discriminant of [`QuestionKind`], as written in question files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Standard,
    Ordering,
    Matching,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::Standard => "standard",
            QuestionType::Ordering => "ordering",
            QuestionType::Matching => "matching",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// Single or multi select over a list of options.
    Standard {
        options: Vec<QuizOption>,
        correct_answers: Vec<String>,
        multiple_choice: bool,
    },
    /// Every step picks its answer from its own candidates.
    Ordering { steps: Vec<OrderingStep> },
    /// Every scenario picks its answer from `matching_options`.
    Matching {
        scenarios: Vec<MatchingScenario>,
        matching_options: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub kind: QuestionKind,
    pub explanation: String,
}

/// A question whose answer key contradicts its own payload.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("question `{id}`: {reason}")]
pub struct InvalidQuestion {
    pub id: String,
    pub reason: String,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::Standard { .. } => QuestionType::Standard,
            QuestionKind::Ordering { .. } => QuestionType::Ordering,
            QuestionKind::Matching { .. } => QuestionType::Matching,
        }
    }

    pub fn is_multiple_choice(&self) -> bool {
        matches!(
            self.kind,
            QuestionKind::Standard {
                multiple_choice: true,
                ..
            }
        )
    }

    /// Options of a standard question, empty for the other kinds.
    pub fn options(&self) -> &[QuizOption] {
        match &self.kind {
            QuestionKind::Standard { options, .. } => options,
            _ => &[],
        }
    }

    /// Number of independently graded entries (steps or scenarios).
    pub fn entry_count(&self) -> usize {
        match &self.kind {
            QuestionKind::Standard { .. } => 0,
            QuestionKind::Ordering { steps } => steps.len(),
            QuestionKind::Matching { scenarios, .. } => scenarios.len(),
        }
    }

    /// Returns a copy with standard options in random order.
    ///
    /// Ordering and matching questions are returned unchanged: their answers
    /// are keyed by step or scenario, not by option position.
    pub fn with_shuffled_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Question {
        let mut question = self.clone();
        if let QuestionKind::Standard { options, .. } = &mut question.kind {
            *options = shuffled(options, rng);
        }
        question
    }

    fn validate(&self) -> Result<(), String> {
        match &self.kind {
            QuestionKind::Standard {
                options,
                correct_answers,
                ..
            } => {
                if options.is_empty() {
                    return Err("standard question has no options".to_string());
                }
                let mut ids = HashSet::new();
                for option in options {
                    if !ids.insert(option.id.as_str()) {
                        return Err(format!("duplicate option id `{}`", option.id));
                    }
                }
                if correct_answers.is_empty() {
                    return Err("standard question has no correct answers".to_string());
                }
                if let Some(missing) = correct_answers.iter().find(|id| !ids.contains(id.as_str())) {
                    return Err(format!("correct answer `{}` is not an option", missing));
                }
            }
            QuestionKind::Ordering { steps } => {
                if steps.is_empty() {
                    return Err("ordering question has no steps".to_string());
                }
                let mut numbers = HashSet::new();
                for step in steps {
                    if !numbers.insert(step.step_number) {
                        return Err(format!("duplicate step number {}", step.step_number));
                    }
                    if !step.options.contains(&step.correct_answer) {
                        return Err(format!(
                            "step {} answer `{}` is not one of its options",
                            step.step_number, step.correct_answer
                        ));
                    }
                }
            }
            QuestionKind::Matching {
                scenarios,
                matching_options,
            } => {
                if scenarios.is_empty() {
                    return Err("matching question has no scenarios".to_string());
                }
                if matching_options.is_empty() {
                    return Err("matching question has no matching options".to_string());
                }
                let mut ids = HashSet::new();
                for scenario in scenarios {
                    if !ids.insert(scenario.id) {
                        return Err(format!("duplicate scenario id {}", scenario.id));
                    }
                    if !matching_options.contains(&scenario.correct_answer) {
                        return Err(format!(
                            "scenario {} answer `{}` is not a matching option",
                            scenario.id, scenario.correct_answer
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Wire shape of a question: every variant's fields are optional.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    id: String,
    text: String,
    #[serde(default)]
    question_type: QuestionType,
    #[serde(default)]
    options: Vec<QuizOption>,
    #[serde(default)]
    correct_answers: Vec<String>,
    #[serde(default)]
    steps: Vec<OrderingStep>,
    #[serde(default)]
    scenarios: Vec<MatchingScenario>,
    #[serde(default)]
    matching_options: Vec<String>,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    is_multiple_choice: bool,
}

impl TryFrom<RawQuestion> for Question {
    type Error = InvalidQuestion;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        let kind = match raw.question_type {
            QuestionType::Standard => QuestionKind::Standard {
                options: raw.options,
                correct_answers: raw.correct_answers,
                multiple_choice: raw.is_multiple_choice,
            },
            QuestionType::Ordering => QuestionKind::Ordering { steps: raw.steps },
            QuestionType::Matching => QuestionKind::Matching {
                scenarios: raw.scenarios,
                matching_options: raw.matching_options,
            },
        };

        let question = Question {
            id: raw.id,
            text: raw.text,
            kind,
            explanation: raw.explanation,
        };

        question.validate().map_err(|reason| InvalidQuestion {
            id: question.id.clone(),
            reason,
        })?;

        Ok(question)
    }
}
