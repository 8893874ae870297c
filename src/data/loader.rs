use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Question, Topic};

pub const DEFAULT_TOPICS_PATH: &str = "data/topics.json";

const QUESTION_FILE_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must contain at least one entry", .path.display())]
    Empty { path: PathBuf },
    #[error("cannot resolve question file `{0}`")]
    Unresolved(String),
}

/// Source of a topic's questions.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Loads every question referenced by a topic's `file_name`.
    async fn load_questions(&self, file_name: &str) -> Result<Vec<Question>, LoadError>;
}

/// Question files stored as JSON arrays under one directory.
#[derive(Debug, Clone)]
pub struct JsonQuestionStore {
    root: PathBuf,
}

impl JsonQuestionStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Maps a file reference to a path below the root, adding the `.json`
    /// extension when it is missing.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf, LoadError> {
        let relative = Path::new(file_name);
        let plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if file_name.is_empty() || !plain {
            return Err(LoadError::Unresolved(file_name.to_string()));
        }

        let mut path = self.root.join(relative);
        if path.extension().is_none_or(|ext| ext != QUESTION_FILE_EXTENSION) {
            let mut name = path.as_os_str().to_owned();
            name.push(".");
            name.push(QUESTION_FILE_EXTENSION);
            path = PathBuf::from(name);
        }
        Ok(path)
    }
}

#[async_trait]
impl QuestionStore for JsonQuestionStore {
    async fn load_questions(&self, file_name: &str) -> Result<Vec<Question>, LoadError> {
        let path = self.resolve(file_name)?;
        log::debug!("loading questions from {}", path.display());

        let json_content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;

        parse_non_empty(&json_content, path)
    }
}

/// Fixed question sets keyed by file reference.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionStore {
    sets: HashMap<String, Vec<Question>>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions<S: Into<String>>(mut self, file_name: S, questions: Vec<Question>) -> Self {
        self.sets.insert(file_name.into(), questions);
        self
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn load_questions(&self, file_name: &str) -> Result<Vec<Question>, LoadError> {
        match self.sets.get(file_name) {
            Some(questions) if questions.is_empty() => Err(LoadError::Empty {
                path: PathBuf::from(file_name),
            }),
            Some(questions) => Ok(questions.clone()),
            None => Err(LoadError::Unresolved(file_name.to_string())),
        }
    }
}

/// Reads the topic catalog.
pub fn load_topics_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Topic>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_non_empty(&json_content, path.to_path_buf())
}

fn parse_non_empty<T: serde::de::DeserializeOwned>(
    json_content: &str,
    path: PathBuf,
) -> Result<Vec<T>, LoadError> {
    let items: Vec<T> = match serde_json::from_str(json_content) {
        Ok(items) => items,
        Err(source) => return Err(LoadError::Parse { path, source }),
    };

    if items.is_empty() {
        return Err(LoadError::Empty { path });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_QUESTIONS: &str = r#"[
        {
            "id": "1",
            "text": "What stores objects?",
            "options": [
                {"id": "a", "label": "A", "text": "S3"},
                {"id": "b", "label": "B", "text": "IAM"}
            ],
            "correctAnswers": ["a"],
            "explanation": "S3 is object storage.",
            "isMultipleChoice": false
        },
        {
            "id": "2",
            "text": "Order it",
            "questionType": "ordering",
            "steps": [{"stepNumber": 1, "options": ["x"], "correctAnswer": "x"}],
            "explanation": ""
        }
    ]"#;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_resolve_adds_extension() {
        let store = JsonQuestionStore::new("/data");
        assert_eq!(
            store.resolve("aws-basics").unwrap(),
            PathBuf::from("/data/aws-basics.json")
        );
        assert_eq!(
            store.resolve("aws-basics.json").unwrap(),
            PathBuf::from("/data/aws-basics.json")
        );
    }

    #[test]
    fn test_resolve_rejects_escaping_references() {
        let store = JsonQuestionStore::new("/data");
        for reference in ["", "../secret.json", "/etc/passwd", "a/../../b"] {
            assert!(
                matches!(store.resolve(reference), Err(LoadError::Unresolved(_))),
                "{} should not resolve",
                reference
            );
        }
    }

    #[tokio::test]
    async fn test_json_store_loads_questions() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "basics.json", TWO_QUESTIONS);

        let store = JsonQuestionStore::new(dir.path());
        let questions = store.load_questions("basics").await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].entry_count(), 1);
    }

    #[tokio::test]
    async fn test_json_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonQuestionStore::new(dir.path());
        let err = store.load_questions("nope.json").await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[tokio::test]
    async fn test_json_store_rejects_empty_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "empty.json", "[]");
        write_file(dir.path(), "broken.json", "{ not json");

        let store = JsonQuestionStore::new(dir.path());
        assert!(matches!(
            store.load_questions("empty.json").await,
            Err(LoadError::Empty { .. })
        ));
        assert!(matches!(
            store.load_questions("broken.json").await,
            Err(LoadError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let questions: Vec<Question> = serde_json::from_str(TWO_QUESTIONS).unwrap();
        let store = InMemoryQuestionStore::new().with_questions("basics.json", questions);

        assert_eq!(store.load_questions("basics.json").await.unwrap().len(), 2);
        assert!(matches!(
            store.load_questions("other.json").await,
            Err(LoadError::Unresolved(_))
        ));
    }

    #[test]
    fn test_load_topics() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "topics.json",
            r#"[{"id": "t", "name": "T", "description": "d", "fileName": "t.json", "questionCount": 2}]"#,
        );

        let topics = load_topics_from_json(dir.path().join("topics.json")).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].question_count, 2);
    }

    #[tokio::test]
    async fn test_bundled_catalog_matches_question_files() {
        let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let topics = load_topics_from_json(data_dir.join("topics.json")).unwrap();
        let store = JsonQuestionStore::new(&data_dir);

        for topic in topics {
            let questions = store.load_questions(&topic.file_name).await.unwrap();
            assert_eq!(questions.len(), topic.question_count, "{}", topic.file_name);
        }
    }
}
