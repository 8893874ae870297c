//! # quiz-maker
//!
//! A terminal quiz application: pick a topic, choose a range of its
//! questions, answer standard, ordering and matching questions, then review
//! a graded summary.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_maker::{Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // Topics and question files live next to each other
//!     let quiz = Quiz::from_catalog("data/topics.json", None)?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run().await?;
//!
//!     Ok(())
//! }
//! ```

mod app;
mod config;
mod data;
mod grader;
pub mod logging;
mod models;
mod session;
mod shuffle;
mod summary;
pub mod terminal;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, MissedTickBehavior};

pub use app::{App, ConfigField, Screen, Selection};
pub use config::{DEFAULT_QUESTION_COUNT, QuizConfig};
pub use data::{
    DEFAULT_TOPICS_PATH, InMemoryQuestionStore, JsonQuestionStore, LoadError, QuestionStore,
    load_topics_from_json,
};
pub use grader::{Answer, EntryGrade, Grade, GradeError, grade};
pub use models::{
    MatchingScenario, OrderingStep, Question, QuestionKind, QuestionResult, QuestionType,
    QuizOption, Topic,
};
pub use session::{QuizSession, SessionError, SessionState};
pub use summary::{Performance, Summary};

use terminal::{QuizTerminal, TerminalGuard};

const TICK_RATE: Duration = Duration::from_secs(1);

type PendingLoad = JoinHandle<Result<Vec<Question>, LoadError>>;

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load quiz data: {0}")]
    Load(#[from] LoadError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
    store: Arc<dyn QuestionStore>,
}

impl Quiz {
    /// Create a quiz over a topic catalog, loading question sets from `store`.
    pub fn new(topics: Vec<Topic>, store: Arc<dyn QuestionStore>) -> Self {
        Self {
            app: App::new(topics),
            store,
        }
    }

    /// Load the topic catalog and serve question files from `data_dir`, or
    /// from the catalog's own directory when none is given.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use quiz_maker::Quiz;
    ///
    /// let quiz = Quiz::from_catalog("data/topics.json", None).expect("Failed to load topics");
    /// ```
    pub fn from_catalog<P: AsRef<Path>>(
        topics_path: P,
        data_dir: Option<PathBuf>,
    ) -> Result<Self, QuizError> {
        let topics_path = topics_path.as_ref();
        let topics = load_topics_from_json(topics_path)?;
        let root = data_dir.unwrap_or_else(|| {
            topics_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        });
        log::info!(
            "loaded {} topics from {}, questions under {}",
            topics.len(),
            topics_path.display(),
            root.display()
        );

        Ok(Self::new(topics, Arc::new(JsonQuestionStore::new(root))))
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut guard = TerminalGuard::enter()?;
        run_event_loop(guard.terminal(), &mut self.app, self.store).await
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
    /// Fetch the named question file in the background.
    Load(String),
}

async fn run_event_loop(
    terminal: &mut QuizTerminal,
    app: &mut App,
    store: Arc<dyn QuestionStore>,
) -> Result<(), QuizError> {
    let mut events = EventStream::new();
    let mut ticker = time::interval(TICK_RATE);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut pending: Option<PendingLoad> = None;

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else {
                    break;
                };
                let Event::Key(key) = event? else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match handle_input(app, key.code) {
                    Action::Continue => {}
                    Action::Quit => break,
                    Action::Load(file_name) => {
                        log::debug!("loading `{}`", file_name);
                        let store = Arc::clone(&store);
                        pending = Some(tokio::spawn(async move {
                            store.load_questions(&file_name).await
                        }));
                    }
                }
            }
            _ = ticker.tick() => app.tick(),
            joined = wait_for_load(&mut pending) => {
                pending = None;
                match joined {
                    Ok(loaded) => app.finish_load(loaded, &mut rand::thread_rng()),
                    Err(err) => app.abandon_load(format!("question load did not finish: {}", err)),
                }
            }
        }
    }

    if let Some(handle) = pending {
        handle.abort();
    }
    Ok(())
}

async fn wait_for_load(
    pending: &mut Option<PendingLoad>,
) -> Result<Result<Vec<Question>, LoadError>, JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn handle_input(app: &mut App, key: KeyCode) -> Action {
    match app.screen() {
        Screen::TopicSelection => handle_topic_input(app, key),
        Screen::Configuration => handle_configuration_input(app, key),
        Screen::Loading => match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
            _ => Action::Continue,
        },
        Screen::Quiz => handle_quiz_input(app, key),
        Screen::Summary => handle_summary_input(app, key),
    }
}

fn handle_topic_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_topic(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_topic(),
        KeyCode::Enter => app.choose_topic(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
        _ => {}
    }
    Action::Continue
}

fn handle_configuration_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Enter => {
            return app.start_quiz().map_or(Action::Continue, Action::Load);
        }
        KeyCode::Esc => {
            app.back_to_topics();
            return Action::Continue;
        }
        _ => {}
    }

    let Some(draft) = app.draft_mut() else {
        return Action::Continue;
    };
    match key {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => draft.toggle_field(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => draft.increment(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => draft.decrement(),
        KeyCode::Backspace => draft.pop_digit(),
        KeyCode::Char(c) if c.is_ascii_digit() => draft.push_digit(c),
        _ => {}
    }
    Action::Continue
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor_down(),
        KeyCode::Char(' ') => match app.selection() {
            Selection::Options { .. } => app.toggle_option(),
            Selection::Entries { .. } => app.cycle_choice(true),
            Selection::Empty => {}
        },
        KeyCode::Right | KeyCode::Char('l') => app.cycle_choice(true),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_choice(false),
        KeyCode::Char('x') | KeyCode::Backspace => app.clear_choice(),
        KeyCode::Enter => {
            if app.is_current_answered() {
                app.next_question();
            } else {
                app.submit();
            }
        }
        KeyCode::Char('n') => app.next_question(),
        KeyCode::Char('p') => app.previous_question(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        _ => {}
    }
    Action::Continue
}

fn handle_summary_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.summary_next(),
        KeyCode::Up | KeyCode::Char('k') => app.summary_previous(),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_details(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        _ => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn topic() -> Topic {
        Topic {
            id: "aws".to_string(),
            name: "AWS".to_string(),
            description: String::new(),
            file_name: "aws.json".to_string(),
            question_count: 2,
            icon: None,
        }
    }

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            kind: QuestionKind::Standard {
                options: vec![QuizOption {
                    id: "a".to_string(),
                    label: "A".to_string(),
                    text: "Only".to_string(),
                }],
                correct_answers: vec!["a".to_string()],
                multiple_choice: false,
            },
            explanation: String::new(),
        }
    }

    fn press(app: &mut App, keys: &[KeyCode]) -> Action {
        let mut last = Action::Continue;
        for key in keys {
            last = handle_input(app, *key);
        }
        last
    }

    #[test]
    fn test_configuration_enter_requests_load() {
        let mut app = App::new(vec![topic()]);
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.screen(), Screen::Configuration);

        press(&mut app, &[KeyCode::Tab, KeyCode::Char('h')]);
        assert_eq!(app.draft().unwrap().config(), QuizConfig::new(1, 1));

        let action = press(&mut app, &[KeyCode::Enter]);
        assert_eq!(action, Action::Load("aws.json".to_string()));
        assert_eq!(app.screen(), Screen::Loading);
    }

    #[test]
    fn test_escape_returns_to_topics() {
        let mut app = App::new(vec![topic()]);
        press(&mut app, &[KeyCode::Enter, KeyCode::Esc]);
        assert_eq!(app.screen(), Screen::TopicSelection);
        assert_eq!(press(&mut app, &[KeyCode::Char('q')]), Action::Quit);
    }

    #[test]
    fn test_from_catalog_lists_bundled_topics() {
        let catalog = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_TOPICS_PATH);
        let quiz = Quiz::from_catalog(&catalog, None).unwrap();

        assert_eq!(quiz.app().screen(), Screen::TopicSelection);
        assert_eq!(quiz.app().topics()[0].file_name, "aws-basics.json");
    }

    #[test]
    fn test_from_catalog_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Quiz::from_catalog(dir.path().join("topics.json"), None)
            .err()
            .unwrap();
        assert!(matches!(err, QuizError::Load(LoadError::Io { .. })));
    }

    #[test]
    fn test_answer_through_to_summary_and_restart() {
        let mut app = App::new(vec![topic()]);
        press(&mut app, &[KeyCode::Enter, KeyCode::Enter]);
        app.finish_load(
            Ok(vec![question("1"), question("2")]),
            &mut StdRng::seed_from_u64(3),
        );
        assert_eq!(app.screen(), Screen::Quiz);

        // enter without a selection does nothing
        press(&mut app, &[KeyCode::Enter]);
        assert!(!app.is_current_answered());

        press(&mut app, &[KeyCode::Char(' '), KeyCode::Enter]);
        assert!(app.is_current_answered());
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.session().position(), 1);

        press(&mut app, &[KeyCode::Char(' '), KeyCode::Enter, KeyCode::Enter]);
        assert_eq!(app.screen(), Screen::Summary);
        assert_eq!(app.summary().unwrap().correct, 2);

        press(&mut app, &[KeyCode::Char('r')]);
        assert_eq!(app.screen(), Screen::TopicSelection);
    }

    #[test]
    fn test_quit_while_loading() {
        let mut app = App::new(vec![topic()]);
        press(&mut app, &[KeyCode::Enter, KeyCode::Enter]);
        assert_eq!(app.screen(), Screen::Loading);
        assert_eq!(press(&mut app, &[KeyCode::Enter]), Action::Continue);
        assert_eq!(press(&mut app, &[KeyCode::Char('q')]), Action::Quit);
    }

    #[tokio::test]
    async fn test_wait_for_load_returns_spawned_result() {
        let store: Arc<dyn QuestionStore> =
            Arc::new(InMemoryQuestionStore::new().with_questions("aws.json", vec![question("1")]));
        let mut pending: Option<PendingLoad> = Some(tokio::spawn(async move {
            store.load_questions("aws.json").await
        }));

        let loaded = wait_for_load(&mut pending).await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
    }
}
