pub mod patch;
pub mod question;
pub mod timestamp;

pub use question::{Question, QuestionType};

/// Recorded questionnaire answers, keyed by `question_id`.
///
/// Answer values are arbitrary JSON: usually a string or a list of strings,
/// but nothing checks them against the question's type.
pub type Answers = rocket::serde::json::serde_json::Map<String, rocket::serde::json::Value>;
