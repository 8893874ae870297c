//! Per-question grading.
//!
//! Grading is pure: it compares a complete submission with the question's
//! answer key and reports the aggregate verdict plus, for ordering and
//! matching questions, the verdict of every step or scenario.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::models::{MatchingScenario, OrderingStep, Question, QuestionKind, QuestionType};

/// A user's submission for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Selected option ids of a standard question.
    Options(Vec<String>),
    /// Step number to chosen candidate.
    Steps(BTreeMap<u32, String>),
    /// Scenario id to chosen candidate.
    Scenarios(BTreeMap<u32, String>),
}

impl Answer {
    fn name(&self) -> &'static str {
        match self {
            Answer::Options(_) => "options",
            Answer::Steps(_) => "steps",
            Answer::Scenarios(_) => "scenarios",
        }
    }
}

/// Verdict for a single step or scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryGrade {
    /// Step number or scenario id.
    pub key: u32,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub is_correct: bool,
    /// Empty for standard questions.
    pub entries: Vec<EntryGrade>,
}

/// A submission that must not be graded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradeError {
    #[error("a {answer} answer cannot grade a {question} question")]
    KindMismatch {
        question: QuestionType,
        answer: &'static str,
    },
    #[error("no option selected")]
    EmptySelection,
    #[error("step {0} has no selection")]
    MissingStep(u32),
    #[error("step {0} does not belong to the question")]
    UnknownStep(u32),
    #[error("scenario {0} has no selection")]
    MissingScenario(u32),
    #[error("scenario {0} does not belong to the question")]
    UnknownScenario(u32),
}

pub fn grade(question: &Question, answer: &Answer) -> Result<Grade, GradeError> {
    match (&question.kind, answer) {
        (
            QuestionKind::Standard {
                correct_answers, ..
            },
            Answer::Options(selected),
        ) => grade_standard(correct_answers, selected),
        (QuestionKind::Ordering { steps }, Answer::Steps(selected)) => {
            grade_ordering(steps, selected)
        }
        (QuestionKind::Matching { scenarios, .. }, Answer::Scenarios(selected)) => {
            grade_matching(scenarios, selected)
        }
        _ => Err(GradeError::KindMismatch {
            question: question.question_type(),
            answer: answer.name(),
        }),
    }
}

/// Set equality between the selection and the key. Repeated ids count once.
pub fn grade_standard(correct: &[String], selected: &[String]) -> Result<Grade, GradeError> {
    if selected.is_empty() {
        return Err(GradeError::EmptySelection);
    }

    let selected: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
    let correct: BTreeSet<&str> = correct.iter().map(String::as_str).collect();

    Ok(Grade {
        is_correct: selected == correct,
        entries: Vec::new(),
    })
}

pub fn grade_ordering(
    steps: &[OrderingStep],
    selected: &BTreeMap<u32, String>,
) -> Result<Grade, GradeError> {
    let keyed = steps
        .iter()
        .map(|step| (step.step_number, step.correct_answer.as_str()));
    grade_entries(keyed, selected, GradeError::MissingStep, GradeError::UnknownStep)
}

pub fn grade_matching(
    scenarios: &[MatchingScenario],
    selected: &BTreeMap<u32, String>,
) -> Result<Grade, GradeError> {
    let keyed = scenarios
        .iter()
        .map(|scenario| (scenario.id, scenario.correct_answer.as_str()));
    grade_entries(
        keyed,
        selected,
        GradeError::MissingScenario,
        GradeError::UnknownScenario,
    )
}

fn grade_entries<'a>(
    key: impl Iterator<Item = (u32, &'a str)> + Clone,
    selected: &BTreeMap<u32, String>,
    missing: fn(u32) -> GradeError,
    unknown: fn(u32) -> GradeError,
) -> Result<Grade, GradeError> {
    if let Some(extra) = selected
        .keys()
        .find(|k| !key.clone().any(|(entry, _)| entry == **k))
    {
        return Err(unknown(*extra));
    }

    let mut entries = Vec::new();
    for (entry, expected) in key {
        let chosen = match selected.get(&entry) {
            Some(chosen) if !chosen.is_empty() => chosen,
            _ => return Err(missing(entry)),
        };
        entries.push(EntryGrade {
            key: entry,
            is_correct: chosen == expected,
        });
    }

    Ok(Grade {
        is_correct: entries.iter().all(|e| e.is_correct),
        entries,
    })
}

/// Display texts of the answer key.
pub fn correct_answer_texts(question: &Question) -> Vec<String> {
    match &question.kind {
        QuestionKind::Standard {
            options,
            correct_answers,
            ..
        } => options
            .iter()
            .filter(|option| correct_answers.contains(&option.id))
            .map(|option| option.text.clone())
            .collect(),
        QuestionKind::Ordering { steps } => steps
            .iter()
            .map(|step| format!("Step {}: {}", step.step_number, step.correct_answer))
            .collect(),
        QuestionKind::Matching { scenarios, .. } => scenarios
            .iter()
            .map(|scenario| format!("Scenario {}: {}", scenario.id, scenario.correct_answer))
            .collect(),
    }
}

/// Display texts of a submission, in the question's own order.
pub fn answer_texts(question: &Question, answer: &Answer) -> Vec<String> {
    match (&question.kind, answer) {
        (QuestionKind::Standard { options, .. }, Answer::Options(selected)) => options
            .iter()
            .filter(|option| selected.contains(&option.id))
            .map(|option| option.text.clone())
            .collect(),
        (QuestionKind::Ordering { steps }, Answer::Steps(selected)) => steps
            .iter()
            .filter_map(|step| {
                selected
                    .get(&step.step_number)
                    .map(|chosen| format!("Step {}: {}", step.step_number, chosen))
            })
            .collect(),
        (QuestionKind::Matching { scenarios, .. }, Answer::Scenarios(selected)) => scenarios
            .iter()
            .filter_map(|scenario| {
                selected
                    .get(&scenario.id)
                    .map(|chosen| format!("Scenario {}: {}", scenario.id, chosen))
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuizOption;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn standard_question() -> Question {
        Question {
            id: "s".to_string(),
            text: "Which are serverless?".to_string(),
            kind: QuestionKind::Standard {
                options: ["a", "b", "c", "d"]
                    .iter()
                    .enumerate()
                    .map(|(i, id)| QuizOption {
                        id: id.to_string(),
                        label: id.to_uppercase(),
                        text: format!("option {}", i + 1),
                    })
                    .collect(),
                correct_answers: ids(&["a", "c"]),
                multiple_choice: true,
            },
            explanation: String::new(),
        }
    }

    fn ordering_question() -> Question {
        let candidates = ids(&["plan", "build", "ship"]);
        Question {
            id: "o".to_string(),
            text: "Order the release".to_string(),
            kind: QuestionKind::Ordering {
                steps: ["plan", "build", "ship"]
                    .iter()
                    .enumerate()
                    .map(|(i, answer)| OrderingStep {
                        step_number: i as u32 + 1,
                        options: candidates.clone(),
                        correct_answer: answer.to_string(),
                    })
                    .collect(),
            },
            explanation: String::new(),
        }
    }

    fn matching_question() -> Question {
        Question {
            id: "m".to_string(),
            text: "Match the service".to_string(),
            kind: QuestionKind::Matching {
                scenarios: vec![
                    MatchingScenario {
                        id: 1,
                        text: "store files".to_string(),
                        correct_answer: "S3".to_string(),
                    },
                    MatchingScenario {
                        id: 2,
                        text: "run code".to_string(),
                        correct_answer: "Lambda".to_string(),
                    },
                ],
                matching_options: ids(&["S3", "Lambda", "EC2"]),
            },
            explanation: String::new(),
        }
    }

    fn steps(values: &[(u32, &str)]) -> BTreeMap<u32, String> {
        values.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_standard_exact_set_in_any_order() {
        let question = standard_question();
        for selection in [ids(&["a", "c"]), ids(&["c", "a"])] {
            let grade = grade(&question, &Answer::Options(selection)).unwrap();
            assert!(grade.is_correct);
            assert!(grade.entries.is_empty());
        }
    }

    #[test]
    fn test_standard_unequal_sets_are_wrong() {
        let question = standard_question();
        let wrong = [
            ids(&["a"]),
            ids(&["a", "b", "c"]),
            ids(&["b", "d"]),
            ids(&["a", "d"]),
        ];
        for selection in wrong {
            let grade = grade(&question, &Answer::Options(selection.clone())).unwrap();
            assert!(!grade.is_correct, "{:?} should be wrong", selection);
        }
    }

    #[test]
    fn test_standard_duplicates_are_deduplicated() {
        let question = standard_question();
        let grade = grade(&question, &Answer::Options(ids(&["a", "c", "a"]))).unwrap();
        assert!(grade.is_correct);
    }

    #[test]
    fn test_standard_empty_selection_is_refused() {
        let question = standard_question();
        assert_eq!(
            grade(&question, &Answer::Options(Vec::new())),
            Err(GradeError::EmptySelection)
        );
    }

    #[test]
    fn test_ordering_single_wrong_step_flips_aggregate_only() {
        let question = ordering_question();
        let right = grade(
            &question,
            &Answer::Steps(steps(&[(1, "plan"), (2, "build"), (3, "ship")])),
        )
        .unwrap();
        assert!(right.is_correct);
        assert!(right.entries.iter().all(|e| e.is_correct));

        let one_off = grade(
            &question,
            &Answer::Steps(steps(&[(1, "plan"), (2, "ship"), (3, "ship")])),
        )
        .unwrap();
        assert!(!one_off.is_correct);
        assert_eq!(
            one_off.entries,
            vec![
                EntryGrade { key: 1, is_correct: true },
                EntryGrade { key: 2, is_correct: false },
                EntryGrade { key: 3, is_correct: true },
            ]
        );
    }

    #[test]
    fn test_ordering_partial_submission_is_refused() {
        let question = ordering_question();
        assert_eq!(
            grade(&question, &Answer::Steps(steps(&[(1, "plan"), (3, "ship")]))),
            Err(GradeError::MissingStep(2))
        );
        assert_eq!(
            grade(
                &question,
                &Answer::Steps(steps(&[(1, "plan"), (2, ""), (3, "ship")]))
            ),
            Err(GradeError::MissingStep(2))
        );
        assert_eq!(
            grade(
                &question,
                &Answer::Steps(steps(&[(1, "plan"), (2, "build"), (3, "ship"), (9, "x")]))
            ),
            Err(GradeError::UnknownStep(9))
        );
    }

    #[test]
    fn test_matching_is_and_over_scenarios() {
        let question = matching_question();
        let right = grade(
            &question,
            &Answer::Scenarios(steps(&[(1, "S3"), (2, "Lambda")])),
        )
        .unwrap();
        assert!(right.is_correct);

        let wrong = grade(
            &question,
            &Answer::Scenarios(steps(&[(1, "S3"), (2, "EC2")])),
        )
        .unwrap();
        assert!(!wrong.is_correct);
        assert!(wrong.entries[0].is_correct);
        assert!(!wrong.entries[1].is_correct);

        assert_eq!(
            grade(&question, &Answer::Scenarios(steps(&[(1, "S3")]))),
            Err(GradeError::MissingScenario(2))
        );
        assert_eq!(
            grade(
                &question,
                &Answer::Scenarios(steps(&[(1, "S3"), (2, "Lambda"), (7, "EC2")]))
            ),
            Err(GradeError::UnknownScenario(7))
        );
    }

    #[test]
    fn test_kind_mismatch_is_refused() {
        let question = matching_question();
        assert_eq!(
            grade(&question, &Answer::Options(ids(&["a"]))),
            Err(GradeError::KindMismatch {
                question: QuestionType::Matching,
                answer: "options",
            })
        );
    }

    #[test]
    fn test_display_texts() {
        assert_eq!(
            correct_answer_texts(&standard_question()),
            vec!["option 1", "option 3"]
        );
        assert_eq!(
            correct_answer_texts(&ordering_question()),
            vec!["Step 1: plan", "Step 2: build", "Step 3: ship"]
        );
        assert_eq!(
            correct_answer_texts(&matching_question()),
            vec!["Scenario 1: S3", "Scenario 2: Lambda"]
        );
        assert_eq!(
            answer_texts(
                &standard_question(),
                &Answer::Options(ids(&["d", "b"]))
            ),
            vec!["option 2", "option 4"]
        );
    }
}
