use std::marker::PhantomData;

use log::error;
use mongodb::bson::{self, Document};
use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::model::db::{
    attendance::{Attendance, NewAttendance},
    event::{Event, NewEvent},
    user::{NewUser, User},
};

use super::{Id, SharedStore};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A typed handle on one collection of the shared store.
pub struct Coll<T> {
    store: SharedStore,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Coll<T>
where
    T: MongoCollection,
{
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Coll<T>
where
    T: MongoCollection + Serialize,
{
    pub async fn insert_one(&self, value: &T) -> Result<Id> {
        let document = bson::to_document(value)?;
        self.store.insert_one(T::NAME, document).await
    }
}

impl<T> Coll<T>
where
    T: MongoCollection + DeserializeOwned,
{
    pub async fn find(&self, filter: Document) -> Result<Vec<T>> {
        self.store
            .find(T::NAME, filter)
            .await?
            .into_iter()
            .map(|document| Ok(bson::from_document(document)?))
            .collect()
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        match self.store.find_one(T::NAME, filter).await? {
            Some(document) => Ok(Some(bson::from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_id(&self, id: Id) -> Result<Option<T>> {
        self.find_one(id.as_doc()).await
    }
}

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// See [`super::DocumentStore::set_fields`].
    pub async fn set_fields(&self, id: Id, fields: Document) -> Result<bool> {
        self.store.set_fields(T::NAME, id, fields).await
    }

    pub async fn delete_one(&self, id: Id) -> Result<bool> {
        self.store.delete_one(T::NAME, id).await
    }
}

#[rocket::async_trait]
impl<'r, T> FromRequest<'r> for Coll<T>
where
    T: MongoCollection,
{
    type Error = ();

    /// Get the store from the managed state and wrap it in a collection.
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match req.rocket().state::<SharedStore>() {
            Some(store) => request::Outcome::Success(Coll::new(store.clone())),
            None => {
                error!("Document store is not in managed state");
                request::Outcome::Error((Status::InternalServerError, ()))
            }
        }
    }
}

// User collections
impl MongoCollection for User {
    const NAME: &'static str = super::USERS;
}
impl MongoCollection for NewUser {
    const NAME: &'static str = super::USERS;
}

// Event collections
impl MongoCollection for Event {
    const NAME: &'static str = super::EVENTS;
}
impl MongoCollection for NewEvent {
    const NAME: &'static str = super::EVENTS;
}

// Attendance collections
impl MongoCollection for Attendance {
    const NAME: &'static str = super::ATTENDANCE;
}
impl MongoCollection for NewAttendance {
    const NAME: &'static str = super::ATTENDANCE;
}
