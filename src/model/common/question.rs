use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::api::valid::{CheckFields, Fields, Presence};

/// The kinds of question a questionnaire may ask.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    YesNo,
    ShortText,
    MultipleChoice,
    MultipleSelection,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YesNo => "yes_no",
            Self::ShortText => "short_text",
            Self::MultipleChoice => "multiple_choice",
            Self::MultipleSelection => "multiple_selection",
        }
    }
}

impl Display for QuestionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single questionnaire question, stored inline in its event.
///
/// `question_id` is chosen by the caller and is the key answers are recorded
/// under. Nothing checks that it is unique within the event, nor that
/// `options` agrees with `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl CheckFields for Question {
    fn check_fields(fields: &mut Fields<'_>) {
        fields.decode::<String>("question_id", Presence::Required);
        fields.decode::<String>("prompt", Presence::Required);
        fields.decode::<QuestionType>("type", Presence::Required);
        fields.decode::<Vec<String>>("options", Presence::Optional);
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Question {
        pub fn example_yes_no() -> Self {
            Self {
                question_id: "q1".to_string(),
                prompt: "Will you attend the after-party?".to_string(),
                kind: QuestionType::YesNo,
                options: None,
            }
        }

        pub fn example_choice() -> Self {
            Self {
                question_id: "q2".to_string(),
                prompt: "Which track interests you most?".to_string(),
                kind: QuestionType::MultipleChoice,
                options: Some(vec![
                    "Payments".to_string(),
                    "Infrastructure".to_string(),
                    "Design".to_string(),
                ]),
            }
        }

        pub fn example_selection() -> Self {
            Self {
                question_id: "q3".to_string(),
                prompt: "Which sessions will you join?".to_string(),
                kind: QuestionType::MultipleSelection,
                options: Some(vec!["Keynote".to_string(), "Workshop".to_string()]),
            }
        }
    }
}
