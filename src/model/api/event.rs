use chrono::{DateTime, Utc};
use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    api::{
        id::ApiId,
        valid::{CheckFields, Fields, Presence},
    },
    common::{patch, timestamp, Question, QuestionType},
    db::event::{Event, NewEvent},
};

/// An event, as submitted for creation. The ID and creation time are
/// assigned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSpec {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_by: String,
    pub active: bool,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
}

/// The fields shared by creation and update bodies. `required` applies to
/// the fields an event cannot exist without.
fn check_event_fields(fields: &mut Fields<'_>, required: Presence) {
    fields.decode::<String>("title", required);
    fields.decode::<String>("description", Presence::Optional);
    fields.decode::<String>("created_by", required);
    fields.decode::<bool>("active", required);
    for name in ["start_time", "end_time"] {
        fields.decode_with(name, required, |value| timestamp::deserialize(value));
    }
    fields.each::<Question>("questions", Presence::Optional);
}

impl CheckFields for EventSpec {
    fn check_fields(fields: &mut Fields<'_>) {
        check_event_fields(fields, Presence::Required);
    }
}

impl EventSpec {
    pub fn into_new_event(self, created_at: DateTime<Utc>) -> NewEvent {
        NewEvent {
            title: self.title,
            description: self.description,
            created_by: self.created_by,
            active: self.active,
            start_time: self.start_time,
            end_time: self.end_time,
            created_at,
            questions: self.questions,
        }
    }
}

/// A partial update to an event. Omitted fields are left untouched; an
/// explicit `null` clears `description` or `questions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    #[serde(default, deserialize_with = "patch::present::deserialize")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "patch::nullable::deserialize")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::present::deserialize")]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "patch::present::deserialize")]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "timestamp::present::deserialize")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::present::deserialize")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "patch::nullable::deserialize")]
    pub questions: Option<Option<Vec<Question>>>,
}

impl CheckFields for EventPatch {
    fn check_fields(fields: &mut Fields<'_>) {
        check_event_fields(fields, Presence::NotNull);
    }
}

impl EventPatch {
    /// The fields to overwrite, in their stored representation.
    pub fn into_fields(self) -> Result<Document> {
        let mut fields = Document::new();
        if let Some(title) = self.title {
            fields.insert("title", title);
        }
        if let Some(description) = self.description {
            fields.insert("description", description);
        }
        if let Some(created_by) = self.created_by {
            fields.insert("created_by", created_by);
        }
        if let Some(active) = self.active {
            fields.insert("active", active);
        }
        if let Some(start_time) = self.start_time {
            fields.insert("start_time", bson::DateTime::from_chrono(start_time));
        }
        if let Some(end_time) = self.end_time {
            fields.insert("end_time", bson::DateTime::from_chrono(end_time));
        }
        if let Some(questions) = self.questions {
            let questions = match questions {
                Some(questions) => bson::to_bson(&questions)?,
                None => Bson::Null,
            };
            fields.insert("questions", questions);
        }
        Ok(fields)
    }
}

/// An API-friendly question. Absent options are rendered as an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDescription {
    pub question_id: String,
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub options: Vec<String>,
}

impl From<Question> for QuestionDescription {
    fn from(question: Question) -> Self {
        Self {
            question_id: question.question_id,
            prompt: question.prompt,
            kind: question.kind,
            options: question.options.unwrap_or_default(),
        }
    }
}

/// An API-friendly event description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescription {
    pub id: ApiId,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub active: bool,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub questions: Vec<QuestionDescription>,
}

impl From<Event> for EventDescription {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.into(),
            title: event.title,
            description: event.description.unwrap_or_default(),
            created_by: event.created_by,
            active: event.active,
            start_time: event.start_time,
            end_time: event.end_time,
            created_at: event.created_at,
            questions: event
                .questions
                .unwrap_or_default()
                .into_iter()
                .map(QuestionDescription::from)
                .collect(),
        }
    }
}
