use serde::{Deserialize, Serialize};

use crate::model::{api::id::ApiId, mongodb::Id};

/// Confirmation of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Confirmation of a successful insert, carrying the assigned ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub message: String,
    pub id: ApiId,
}

impl Created {
    pub fn new(message: impl Into<String>, id: Id) -> Self {
        Self {
            message: message.into(),
            id: id.into(),
        }
    }
}
