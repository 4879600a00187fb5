use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::model::{
    api::{
        id::ApiId,
        valid::{CheckFields, Fields, Presence},
    },
    common::patch,
    db::user::{NewUser, User},
};

const INVALID_EMAIL: &str = "value is not a valid email address";

/// Check an email field, if it is there to check.
fn check_email(fields: &mut Fields<'_>, presence: Presence) {
    if let Some(email) = fields.decode::<String>("email", presence) {
        fields.rule("email", email.validate_email(), INVALID_EMAIL);
    }
}

/// A user, as submitted for creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSpec {
    pub name: String,
    pub email: String,
}

impl CheckFields for UserSpec {
    fn check_fields(fields: &mut Fields<'_>) {
        fields.decode::<String>("name", Presence::Required);
        check_email(fields, Presence::Required);
    }
}

impl From<UserSpec> for NewUser {
    fn from(spec: UserSpec) -> Self {
        Self {
            name: spec.name,
            email: spec.email,
        }
    }
}

/// A partial update to a user. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "patch::present::deserialize")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "patch::present::deserialize")]
    pub email: Option<String>,
}

impl CheckFields for UserPatch {
    fn check_fields(fields: &mut Fields<'_>) {
        fields.decode::<String>("name", Presence::NotNull);
        check_email(fields, Presence::NotNull);
    }
}

impl UserPatch {
    /// The fields to overwrite.
    pub fn into_fields(self) -> Document {
        let mut fields = Document::new();
        if let Some(name) = self.name {
            fields.insert("name", name);
        }
        if let Some(email) = self.email {
            fields.insert("email", email);
        }
        fields
    }
}

/// An API-friendly user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDescription {
    pub id: ApiId,
    pub name: String,
    pub email: String,
}

impl From<User> for UserDescription {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            name: user.name,
            email: user.email,
        }
    }
}
