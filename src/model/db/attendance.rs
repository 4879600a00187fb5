use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::Answers, mongodb::Id};

/// A record of a user attending an event, without an ID.
///
/// Neither `user_id` nor `event_id` is checked against its collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub user_id: String,
    pub event_id: String,
    /// Always assigned by the server.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub attended_at: DateTime<Utc>,
    #[serde(default)]
    pub questionnaire_answers: Option<Answers>,
}

/// An attendance record from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(rename = "_id")]
    pub id: Id,
    pub user_id: String,
    pub event_id: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub attended_at: DateTime<Utc>,
    #[serde(default)]
    pub questionnaire_answers: Option<Answers>,
}
