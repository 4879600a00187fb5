use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    api::{
        id::ApiId,
        valid::{CheckFields, Fields, Presence},
    },
    common::{timestamp, Answers},
    db::attendance::{Attendance, NewAttendance},
};

/// An attendance record, as submitted. The ID and attendance time are
/// assigned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSpec {
    pub user_id: String,
    pub event_id: String,
    #[serde(default)]
    pub questionnaire_answers: Option<Answers>,
}

impl CheckFields for AttendanceSpec {
    fn check_fields(fields: &mut Fields<'_>) {
        fields.decode::<String>("user_id", Presence::Required);
        fields.decode::<String>("event_id", Presence::Required);
        fields.decode::<Answers>("questionnaire_answers", Presence::Optional);
    }
}

impl AttendanceSpec {
    pub fn into_new_attendance(self, attended_at: DateTime<Utc>) -> NewAttendance {
        NewAttendance {
            user_id: self.user_id,
            event_id: self.event_id,
            attended_at,
            questionnaire_answers: self.questionnaire_answers,
        }
    }
}

/// An API-friendly attendance record. Absent answers are rendered as an
/// empty mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDescription {
    pub id: ApiId,
    pub user_id: String,
    pub event_id: String,
    #[serde(with = "timestamp")]
    pub attended_at: DateTime<Utc>,
    pub questionnaire_answers: Answers,
}

impl From<Attendance> for AttendanceDescription {
    fn from(attendance: Attendance) -> Self {
        Self {
            id: attendance.id.into(),
            user_id: attendance.user_id,
            event_id: attendance.event_id,
            attended_at: attendance.attended_at,
            questionnaire_answers: attendance.questionnaire_answers.unwrap_or_default(),
        }
    }
}
