//! Quiz session engine.
//!
//! A session moves through `Unconfigured -> Loading -> InProgress ->
//! Completed` and back to `Unconfigured` on restart. It owns the
//! materialized question sequence, the current position and one recorded
//! result per answered question.

use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;

use crate::config::QuizConfig;
use crate::data::{LoadError, QuestionStore};
use crate::grader::{self, Answer, GradeError};
use crate::models::{Question, QuestionResult, Topic};
use crate::shuffle::shuffled;
use crate::summary::{self, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No topic loaded.
    Unconfigured,
    /// Waiting for the topic's questions.
    Loading,
    InProgress,
    Completed,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {operation} while the session is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    #[error("question `{0}` is not part of this session")]
    QuestionNotFound(String),
    #[error("question `{0}` is not the current question")]
    NotCurrentQuestion(String),
    #[error("refusing to grade question `{question_id}`: {source}")]
    Grade {
        question_id: String,
        #[source]
        source: GradeError,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("topic `{0}` has no questions in the selected range")]
    NoQuestions(String),
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    state: SessionState,
    topic: Option<Topic>,
    config: Option<QuizConfig>,
    questions: Vec<Question>,
    position: usize,
    results: HashMap<String, QuestionResult>,
    elapsed_secs: u64,
    summary: Option<Summary>,
    load_error: Option<String>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unconfigured,
            topic: None,
            config: None,
            questions: Vec::new(),
            position: 0,
            results: HashMap::new(),
            elapsed_secs: 0,
            summary: None,
            load_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    /// Range in effect, clamped against the questions actually loaded once
    /// the session is in progress.
    pub fn config(&self) -> Option<QuizConfig> {
        self.config
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.position + 1 == self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    pub fn result_for(&self, question_id: &str) -> Option<&QuestionResult> {
        self.results.get(question_id)
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.results.contains_key(question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.results.len()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Generated once, when the last question is left.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Message of the most recent failed load.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Marks the session as waiting for `topic`'s questions.
    pub fn begin_load(&mut self, topic: Topic, config: QuizConfig) -> Result<(), SessionError> {
        self.expect_state(SessionState::Unconfigured, "start loading")?;

        let config = config.clamped(topic.question_count);
        log::info!(
            "loading topic `{}` (questions {}..={})",
            topic.id,
            config.start,
            config.end()
        );
        self.config = Some(config);
        self.topic = Some(topic);
        self.load_error = None;
        self.elapsed_secs = 0;
        self.state = SessionState::Loading;
        Ok(())
    }

    /// Materializes the question sequence: shuffles the question order,
    /// slices the configured range and shuffles the options of standard
    /// questions.
    pub fn complete_load<R: Rng + ?Sized>(
        &mut self,
        questions: Vec<Question>,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        self.expect_state(SessionState::Loading, "complete loading")?;

        let requested = self.config.unwrap_or(QuizConfig::new(1, questions.len()));
        let config = requested.clamped(questions.len());
        let sequence: Vec<Question> = shuffled(&questions, rng)
            .get(config.indices())
            .unwrap_or_default()
            .iter()
            .map(|question| question.with_shuffled_options(rng))
            .collect();

        if sequence.is_empty() {
            let topic_id = self.topic.as_ref().map(|t| t.id.clone()).unwrap_or_default();
            self.fail_load(format!("topic `{}` has no questions", topic_id));
            return Err(SessionError::NoQuestions(topic_id));
        }

        log::info!(
            "session started with {} of {} questions",
            sequence.len(),
            questions.len()
        );
        self.config = Some(config);
        self.questions = sequence;
        self.position = 0;
        self.results.clear();
        self.summary = None;
        self.elapsed_secs = 0;
        self.state = SessionState::InProgress;
        Ok(())
    }

    /// Abandons a pending load and returns to `Unconfigured`. Ignored when no
    /// load is pending.
    pub fn fail_load<S: Into<String>>(&mut self, message: S) {
        if self.state != SessionState::Loading {
            log::warn!("ignoring load failure outside of loading state");
            return;
        }

        let message = message.into();
        log::error!("question load failed: {}", message);
        *self = Self::new();
        self.load_error = Some(message);
    }

    /// Loads and materializes `topic` in one step.
    pub fn configure<R: Rng + ?Sized>(
        &mut self,
        topic: Topic,
        config: QuizConfig,
        questions: Vec<Question>,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        self.begin_load(topic, config)?;
        self.complete_load(questions, rng)
    }

    /// Fetches `topic`'s questions from `store` and materializes them.
    pub async fn load_and_configure<S, R>(
        &mut self,
        store: &S,
        topic: Topic,
        config: QuizConfig,
        rng: &mut R,
    ) -> Result<(), SessionError>
    where
        S: QuestionStore + ?Sized,
        R: Rng + ?Sized,
    {
        let file_name = topic.file_name.clone();
        self.begin_load(topic, config)?;

        match store.load_questions(&file_name).await {
            Ok(questions) => self.complete_load(questions, rng),
            Err(err) => {
                self.fail_load(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Moves to the next question, or completes the session from the last
    /// one. No-op unless in progress.
    pub fn advance(&mut self) -> SessionState {
        if self.state != SessionState::InProgress {
            return self.state;
        }

        if self.position + 1 < self.questions.len() {
            self.position += 1;
        } else {
            let summary = summary::generate(&self.questions, &self.results);
            log::info!(
                "session completed: {}/{} correct ({:.1}%)",
                summary.correct,
                summary.total,
                summary.score
            );
            self.summary = Some(summary);
            self.state = SessionState::Completed;
        }
        self.state
    }

    /// Moves to the previous question. No-op on the first question and
    /// unless in progress.
    pub fn retreat(&mut self) {
        if self.state == SessionState::InProgress && self.position > 0 {
            self.position -= 1;
        }
    }

    /// Grades `answer` against the current question and records the result,
    /// replacing an earlier one for the same question. Any other id is
    /// refused.
    pub fn submit_answer(
        &mut self,
        question_id: &str,
        answer: Answer,
    ) -> Result<&QuestionResult, SessionError> {
        self.expect_state(SessionState::InProgress, "submit an answer")?;

        let question = self
            .current_question()
            .filter(|question| question.id == question_id)
            .ok_or_else(|| {
                if self.questions.iter().any(|question| question.id == question_id) {
                    SessionError::NotCurrentQuestion(question_id.to_string())
                } else {
                    SessionError::QuestionNotFound(question_id.to_string())
                }
            })?;

        let grade = grader::grade(question, &answer).map_err(|source| {
            log::warn!("refused to grade `{}`: {}", question_id, source);
            SessionError::Grade {
                question_id: question_id.to_string(),
                source,
            }
        })?;

        log::debug!("question `{}` graded correct={}", question_id, grade.is_correct);
        let result = QuestionResult::graded(question, answer, grade);
        self.results.insert(question_id.to_string(), result);
        Ok(&self.results[question_id])
    }

    /// Counts one second of quiz time while in progress.
    pub fn tick(&mut self) {
        if self.state == SessionState::InProgress {
            self.elapsed_secs += 1;
        }
    }

    /// Discards everything and returns to `Unconfigured`.
    pub fn restart(&mut self) {
        if self.state != SessionState::Unconfigured {
            log::info!("session restarted");
        }
        *self = Self::new();
    }

    fn expect_state(&self, expected: SessionState, operation: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
