mod question;
mod result;
mod topic;

pub use question::{
    InvalidQuestion, MatchingScenario, OrderingStep, Question, QuestionKind, QuestionType,
    QuizOption,
};
pub use result::QuestionResult;
pub use topic::Topic;
