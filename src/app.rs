use std::collections::{BTreeMap, HashSet};

use rand::Rng;

use crate::config::QuizConfig;
use crate::data::LoadError;
use crate::grader::Answer;
use crate::models::{Question, QuestionKind, QuestionResult, Topic};
use crate::session::{QuizSession, SessionState};
use crate::summary::Summary;

/// Longest number accepted while typing into a configuration field.
const MAX_INPUT_DIGITS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TopicSelection,
    Configuration,
    Loading,
    Quiz,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Start,
    Count,
}

/// Range being edited on the configuration screen.
#[derive(Debug, Clone)]
pub struct ConfigDraft {
    topic: Topic,
    config: QuizConfig,
    field: ConfigField,
    input: String,
}

impl ConfigDraft {
    pub fn new(topic: Topic) -> Self {
        Self {
            config: QuizConfig::for_topic(&topic),
            topic,
            field: ConfigField::Start,
            input: String::new(),
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn config(&self) -> QuizConfig {
        self.config
    }

    pub fn field(&self) -> ConfigField {
        self.field
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            ConfigField::Start => ConfigField::Count,
            ConfigField::Count => ConfigField::Start,
        };
        self.input.clear();
    }

    pub fn increment(&mut self) {
        self.input.clear();
        self.set(self.value() + 1);
    }

    pub fn decrement(&mut self) {
        self.input.clear();
        self.set(self.value().saturating_sub(1));
    }

    pub fn push_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() || self.input.len() >= MAX_INPUT_DIGITS {
            return;
        }
        self.input.push(digit);
        let value = self.input.parse().unwrap_or(1);
        self.set(value);
    }

    pub fn pop_digit(&mut self) {
        self.input.pop();
        if let Ok(value) = self.input.parse() {
            self.set(value);
        }
    }

    fn value(&self) -> usize {
        match self.field {
            ConfigField::Start => self.config.start,
            ConfigField::Count => self.config.count,
        }
    }

    fn set(&mut self, value: usize) {
        let requested = match self.field {
            ConfigField::Start => QuizConfig::new(value, self.config.count),
            ConfigField::Count => QuizConfig::new(self.config.start, value),
        };
        self.config = requested.clamped(self.topic.question_count);
    }
}

/// In-progress input for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Empty,
    /// Standard question: highlighted option and chosen ids in pick order.
    Options { cursor: usize, chosen: Vec<String> },
    /// Ordering or matching question: highlighted entry and the candidate
    /// index chosen per step or scenario.
    Entries {
        cursor: usize,
        chosen: BTreeMap<u32, usize>,
    },
}

/// How an option is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    Idle,
    Selected,
    /// Answered: correct and picked.
    Correct,
    /// Answered: picked but not correct.
    WrongPick,
    /// Answered: correct but not picked.
    Missed,
}

pub struct App {
    topics: Vec<Topic>,
    topic_cursor: usize,
    draft: Option<ConfigDraft>,
    session: QuizSession,
    selection: Selection,
    summary_cursor: usize,
    expanded: HashSet<String>,
}

impl App {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self {
            topics,
            topic_cursor: 0,
            draft: None,
            session: QuizSession::new(),
            selection: Selection::Empty,
            summary_cursor: 0,
            expanded: HashSet::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        match self.session.state() {
            SessionState::Unconfigured if self.draft.is_some() => Screen::Configuration,
            SessionState::Unconfigured => Screen::TopicSelection,
            SessionState::Loading => Screen::Loading,
            SessionState::InProgress => Screen::Quiz,
            SessionState::Completed => Screen::Summary,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic_cursor(&self) -> usize {
        self.topic_cursor
    }

    pub fn draft(&self) -> Option<&ConfigDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut ConfigDraft> {
        self.draft.as_mut()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn load_error(&self) -> Option<&str> {
        self.session.load_error()
    }

    pub fn select_next_topic(&mut self) {
        if !self.topics.is_empty() {
            self.topic_cursor = (self.topic_cursor + 1) % self.topics.len();
        }
    }

    pub fn select_previous_topic(&mut self) {
        if !self.topics.is_empty() {
            self.topic_cursor = (self.topic_cursor + self.topics.len() - 1) % self.topics.len();
        }
    }

    pub fn choose_topic(&mut self) {
        if let Some(topic) = self.topics.get(self.topic_cursor) {
            self.draft = Some(ConfigDraft::new(topic.clone()));
        }
    }

    pub fn back_to_topics(&mut self) {
        self.draft = None;
    }

    /// Starts loading the drafted quiz and returns the file to fetch.
    pub fn start_quiz(&mut self) -> Option<String> {
        let draft = self.draft.take()?;
        match self.session.begin_load(draft.topic.clone(), draft.config) {
            Ok(()) => Some(draft.topic.file_name),
            Err(err) => {
                log::warn!("cannot start quiz: {}", err);
                self.draft = Some(draft);
                None
            }
        }
    }

    pub fn finish_load<R: Rng + ?Sized>(
        &mut self,
        loaded: Result<Vec<Question>, LoadError>,
        rng: &mut R,
    ) {
        match loaded {
            Ok(questions) => {
                if let Err(err) = self.session.complete_load(questions, rng) {
                    log::warn!("quiz did not start: {}", err);
                }
            }
            Err(err) => self.session.fail_load(err.to_string()),
        }
        self.reset_selection();
    }

    /// Gives up on a load that will never report back.
    pub fn abandon_load<S: Into<String>>(&mut self, message: S) {
        self.session.fail_load(message);
    }

    pub fn tick(&mut self) {
        self.session.tick();
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    pub fn current_result(&self) -> Option<&QuestionResult> {
        self.current_question()
            .and_then(|question| self.session.result_for(&question.id))
    }

    pub fn is_current_answered(&self) -> bool {
        self.current_result().is_some()
    }

    pub fn move_cursor_down(&mut self) {
        self.move_cursor(1);
    }

    pub fn move_cursor_up(&mut self) {
        self.move_cursor(-1);
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = match self.current_question() {
            Some(question) => match &question.kind {
                QuestionKind::Standard { options, .. } => options.len(),
                _ => question.entry_count(),
            },
            None => return,
        };
        if len == 0 {
            return;
        }

        if let Selection::Options { cursor, .. } | Selection::Entries { cursor, .. } =
            &mut self.selection
        {
            *cursor = wrap(*cursor, delta, len);
        }
    }

    /// Picks or unpicks the highlighted option. Multi-select questions
    /// toggle, single-select questions replace.
    pub fn toggle_option(&mut self) {
        if self.is_current_answered() {
            return;
        }
        let Some(question) = self.session.current_question() else {
            return;
        };
        let multiple = question.is_multiple_choice();
        let Selection::Options { cursor, chosen } = &mut self.selection else {
            return;
        };
        let Some(option) = question.options().get(*cursor) else {
            return;
        };

        if multiple {
            if let Some(index) = chosen.iter().position(|id| *id == option.id) {
                chosen.remove(index);
            } else {
                chosen.push(option.id.clone());
            }
        } else {
            *chosen = vec![option.id.clone()];
        }
    }

    /// Steps the highlighted entry's choice through its candidates.
    pub fn cycle_choice(&mut self, forward: bool) {
        if self.is_current_answered() {
            return;
        }
        let Some(question) = self.session.current_question() else {
            return;
        };
        let Selection::Entries { cursor, chosen } = &mut self.selection else {
            return;
        };
        let Some(key) = entry_keys(question).get(*cursor).copied() else {
            return;
        };
        let count = candidates(question, key).len();
        if count == 0 {
            return;
        }

        let next = match chosen.get(&key) {
            Some(index) => wrap(*index, if forward { 1 } else { -1 }, count),
            None if forward => 0,
            None => count - 1,
        };
        chosen.insert(key, next);
    }

    /// Clears the highlighted entry's choice.
    pub fn clear_choice(&mut self) {
        if self.is_current_answered() {
            return;
        }
        let Some(question) = self.session.current_question() else {
            return;
        };
        if let Selection::Entries { cursor, chosen } = &mut self.selection {
            if let Some(key) = entry_keys(question).get(*cursor) {
                chosen.remove(key);
            }
        }
    }

    /// Whether the current input is complete and not yet submitted.
    pub fn can_submit(&self) -> bool {
        if self.is_current_answered() {
            return false;
        }
        match (&self.selection, self.current_question()) {
            (Selection::Options { chosen, .. }, Some(_)) => !chosen.is_empty(),
            (Selection::Entries { chosen, .. }, Some(question)) => {
                chosen.len() == question.entry_count()
            }
            _ => false,
        }
    }

    /// Grades the current input. Returns whether a result was recorded.
    pub fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        let Some(question) = self.session.current_question() else {
            return false;
        };
        let Some(answer) = build_answer(question, &self.selection) else {
            return false;
        };
        let question_id = question.id.clone();

        match self.session.submit_answer(&question_id, answer) {
            Ok(_) => true,
            Err(err) => {
                log::error!("submission rejected: {}", err);
                false
            }
        }
    }

    /// Leaves an answered question, completing the quiz after the last one.
    pub fn next_question(&mut self) {
        if !self.is_current_answered() {
            return;
        }
        match self.session.advance() {
            SessionState::InProgress => self.reset_selection(),
            SessionState::Completed => {
                self.selection = Selection::Empty;
                self.summary_cursor = 0;
                self.expanded.clear();
            }
            _ => {}
        }
    }

    pub fn previous_question(&mut self) {
        self.session.retreat();
        self.reset_selection();
    }

    /// Display status of an option of the current question.
    pub fn option_status(&self, option_id: &str) -> OptionStatus {
        let picked = match &self.selection {
            Selection::Options { chosen, .. } => chosen.iter().any(|id| id == option_id),
            _ => false,
        };
        let Some(question) = self.current_question() else {
            return OptionStatus::Idle;
        };
        if !self.is_current_answered() {
            return if picked {
                OptionStatus::Selected
            } else {
                OptionStatus::Idle
            };
        }

        let correct = match &question.kind {
            QuestionKind::Standard {
                correct_answers, ..
            } => correct_answers.iter().any(|id| id == option_id),
            _ => false,
        };
        match (correct, picked) {
            (true, true) => OptionStatus::Correct,
            (true, false) => OptionStatus::Missed,
            (false, true) => OptionStatus::WrongPick,
            (false, false) => OptionStatus::Idle,
        }
    }

    /// Candidate chosen for a step or scenario of the current question.
    pub fn chosen_for(&self, key: u32) -> Option<&str> {
        let question = self.current_question()?;
        let Selection::Entries { chosen, .. } = &self.selection else {
            return None;
        };
        let index = *chosen.get(&key)?;
        candidates(question, key).get(index).map(String::as_str)
    }

    /// Verdict of a step or scenario once the current question is answered.
    pub fn entry_status(&self, key: u32) -> Option<bool> {
        self.current_result()?.entry_correct(key)
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.session.summary()
    }

    pub fn summary_cursor(&self) -> usize {
        self.summary_cursor
    }

    pub fn summary_next(&mut self) {
        let len = self.summary().map_or(0, |summary| summary.results.len());
        if self.summary_cursor + 1 < len {
            self.summary_cursor += 1;
        }
    }

    pub fn summary_previous(&mut self) {
        self.summary_cursor = self.summary_cursor.saturating_sub(1);
    }

    pub fn is_expanded(&self, question_id: &str) -> bool {
        self.expanded.contains(question_id)
    }

    /// Shows or hides the details of the highlighted result.
    pub fn toggle_details(&mut self) {
        let Some(id) = self
            .summary()
            .and_then(|summary| summary.results.get(self.summary_cursor))
            .map(|result| result.question_id.clone())
        else {
            return;
        };
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    /// Drops the session and returns to topic selection.
    pub fn restart(&mut self) {
        self.session.restart();
        self.draft = None;
        self.selection = Selection::Empty;
        self.summary_cursor = 0;
        self.expanded.clear();
    }

    fn reset_selection(&mut self) {
        let Some(question) = self.session.current_question() else {
            self.selection = Selection::Empty;
            return;
        };
        let answer = self
            .session
            .result_for(&question.id)
            .and_then(|result| result.answer.as_ref());

        self.selection = match (&question.kind, answer) {
            (QuestionKind::Standard { .. }, Some(Answer::Options(ids))) => Selection::Options {
                cursor: 0,
                chosen: ids.clone(),
            },
            (QuestionKind::Standard { .. }, _) => Selection::Options {
                cursor: 0,
                chosen: Vec::new(),
            },
            (_, Some(Answer::Steps(picks) | Answer::Scenarios(picks))) => Selection::Entries {
                cursor: 0,
                chosen: picks
                    .iter()
                    .filter_map(|(key, pick)| {
                        candidates(question, *key)
                            .iter()
                            .position(|candidate| candidate == pick)
                            .map(|index| (*key, index))
                    })
                    .collect(),
            },
            _ => Selection::Entries {
                cursor: 0,
                chosen: BTreeMap::new(),
            },
        };
    }
}

/// Step numbers or scenario ids, in display order.
pub fn entry_keys(question: &Question) -> Vec<u32> {
    match &question.kind {
        QuestionKind::Standard { .. } => Vec::new(),
        QuestionKind::Ordering { steps } => steps.iter().map(|step| step.step_number).collect(),
        QuestionKind::Matching { scenarios, .. } => {
            scenarios.iter().map(|scenario| scenario.id).collect()
        }
    }
}

/// Choices offered for a step or scenario.
pub fn candidates(question: &Question, key: u32) -> &[String] {
    match &question.kind {
        QuestionKind::Standard { .. } => &[],
        QuestionKind::Ordering { steps } => steps
            .iter()
            .find(|step| step.step_number == key)
            .map(|step| step.options.as_slice())
            .unwrap_or(&[]),
        QuestionKind::Matching {
            matching_options, ..
        } => matching_options,
    }
}

fn build_answer(question: &Question, selection: &Selection) -> Option<Answer> {
    match (&question.kind, selection) {
        (QuestionKind::Standard { .. }, Selection::Options { chosen, .. }) => {
            Some(Answer::Options(chosen.clone()))
        }
        (QuestionKind::Ordering { .. }, Selection::Entries { chosen, .. }) => {
            Some(Answer::Steps(picked_texts(question, chosen)))
        }
        (QuestionKind::Matching { .. }, Selection::Entries { chosen, .. }) => {
            Some(Answer::Scenarios(picked_texts(question, chosen)))
        }
        _ => None,
    }
}

fn picked_texts(question: &Question, chosen: &BTreeMap<u32, usize>) -> BTreeMap<u32, String> {
    chosen
        .iter()
        .filter_map(|(key, index)| {
            candidates(question, *key)
                .get(*index)
                .map(|text| (*key, text.clone()))
        })
        .collect()
}

fn wrap(index: usize, delta: isize, len: usize) -> usize {
    (index as isize + delta).rem_euclid(len as isize) as usize
}
