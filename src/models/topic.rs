use serde::Deserialize;

/// A named, independently loadable set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Reference handed to the question store.
    pub file_name: String,
    pub question_count: usize,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Topic {
    /// Name prefixed with the icon, when there is one.
    pub fn title(&self) -> String {
        match &self.icon {
            Some(icon) => format!("{} {}", icon, self.name),
            None => self.name.clone(),
        }
    }
}
