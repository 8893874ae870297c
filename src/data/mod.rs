mod loader;

pub use loader::{
    load_topics_from_json, InMemoryQuestionStore, JsonQuestionStore, LoadError, QuestionStore,
    DEFAULT_TOPICS_PATH,
};
