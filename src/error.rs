use log::{error, warn};
use mongodb::bson::{de::Error as BsonDeError, ser::Error as BsonSerError};
use mongodb::error::Error as DbError;
use rocket::{
    http::Status,
    response::{status::Custom, Responder},
    serde::json::Json,
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::RequestId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Failed to encode document: {0}")]
    BsonSer(#[from] BsonSerError),
    #[error("Failed to decode document: {0}")]
    BsonDe(#[from] BsonDeError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The entity with the requested identifier does not exist.
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound(entity)
    }

    pub fn status(&self) -> Status {
        match self {
            Self::NotFound(_) => Status::NotFound,
            Self::Db(_) | Self::BsonSer(_) | Self::BsonDe(_) | Self::Internal(_) => {
                Status::InternalServerError
            }
        }
    }
}

/// JSON body of every error response that isn't a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        let id = req.local_cache(RequestId::next);
        let status = self.status();
        let detail = if status == Status::InternalServerError {
            // Storage failures are not described to the caller.
            error!("req{id} failed: {self}");
            ErrorDetail::new("Internal Server Error")
        } else {
            warn!("req{id}: {self}");
            ErrorDetail::new(self.to_string())
        };
        Custom(status, Json(detail)).respond_to(req)
    }
}
