use crate::grader::{self, Answer, EntryGrade, Grade};
use crate::models::{Question, QuestionKind, QuizOption};

/// Recorded outcome of one question within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub question_id: String,
    pub question_text: String,
    /// `None` when the question was never answered.
    pub answer: Option<Answer>,
    pub user_answer_texts: Vec<String>,
    pub correct_answer_texts: Vec<String>,
    /// Correct option ids, standard questions only.
    pub correct_answer_ids: Vec<String>,
    pub is_correct: bool,
    /// Per step or scenario verdicts, empty for standard questions.
    pub entries: Vec<EntryGrade>,
    pub multiple_choice: bool,
    /// Options in display order, standard questions only.
    pub options: Vec<QuizOption>,
    pub explanation: String,
}

impl QuestionResult {
    pub fn graded(question: &Question, answer: Answer, grade: Grade) -> Self {
        Self {
            user_answer_texts: grader::answer_texts(question, &answer),
            answer: Some(answer),
            is_correct: grade.is_correct,
            entries: grade.entries,
            ..Self::unanswered(question)
        }
    }

    pub fn unanswered(question: &Question) -> Self {
        Self {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            answer: None,
            user_answer_texts: Vec::new(),
            correct_answer_texts: grader::correct_answer_texts(question),
            correct_answer_ids: match &question.kind {
                QuestionKind::Standard {
                    correct_answers, ..
                } => correct_answers.clone(),
                _ => Vec::new(),
            },
            is_correct: false,
            entries: Vec::new(),
            multiple_choice: question.is_multiple_choice(),
            options: question.options().to_vec(),
            explanation: question.explanation.clone(),
        }
    }

    /// Verdict of a step or scenario, if it was graded.
    pub fn entry_correct(&self, key: u32) -> Option<bool> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.is_correct)
    }

    /// Option ids the user picked, empty for other kinds.
    pub fn selected_option_ids(&self) -> &[String] {
        match &self.answer {
            Some(Answer::Options(ids)) => ids,
            _ => &[],
        }
    }
}
