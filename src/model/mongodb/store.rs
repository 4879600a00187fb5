use std::sync::Arc;

use log::debug;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Database, IndexModel,
};
use rocket::futures::TryStreamExt;

use crate::error::{Error, Result};

use super::Id;

/// The storage client shared by every request.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Raw document storage, grouped into named collections.
///
/// Every method is a single storage operation. Filters are exact matches on
/// top-level fields.
#[rocket::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning the identifier assigned to it.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<Id>;

    /// All documents matching the filter, in insertion order.
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>>;

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>>;

    /// Overwrite the given top-level fields of one document, leaving the rest
    /// untouched. Returns whether a document with that ID exists.
    async fn set_fields(&self, collection: &str, id: Id, fields: Document) -> Result<bool>;

    /// Returns whether a document was removed.
    async fn delete_one(&self, collection: &str, id: Id) -> Result<bool>;
}

/// A [`DocumentStore`] backed by a MongoDB database.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(self)
    }
}

#[rocket::async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<Id> {
        let result = self
            .db
            .collection::<Document>(collection)
            .insert_one(document, None)
            .await?;
        result
            .inserted_id
            .as_object_id()
            .map(Id::from)
            .ok_or_else(|| {
                Error::Internal(format!(
                    "Inserted into {collection} but got a non-ObjectId identifier"
                ))
            })
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>> {
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>> {
        Ok(self
            .db
            .collection::<Document>(collection)
            .find_one(filter, None)
            .await?)
    }

    async fn set_fields(&self, collection: &str, id: Id, fields: Document) -> Result<bool> {
        let coll = self.db.collection::<Document>(collection);
        // MongoDB rejects an empty `$set`.
        if fields.is_empty() {
            let count = coll.count_documents(id.as_doc(), None).await?;
            return Ok(count > 0);
        }
        let update = doc! { "$set": fields };
        let result = coll.update_one(id.as_doc(), update, None).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, collection: &str, id: Id) -> Result<bool> {
        let result = self
            .db
            .collection::<Document>(collection)
            .delete_one(id.as_doc(), None)
            .await?;
        Ok(result.deleted_count > 0)
    }
}

/// Ensure the lookup indexes for the filtered listings exist.
///
/// None of them are unique. This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> std::result::Result<(), mongodb::error::Error> {
    debug!("Ensuring collection indexes exist");

    let lookups = [
        (super::EVENTS, "created_by"),
        (super::ATTENDANCE, "event_id"),
        (super::ATTENDANCE, "user_id"),
    ];
    for (collection, field) in lookups {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(false).build())
            .build();
        db.collection::<Document>(collection)
            .create_index(index, None)
            .await?;
    }

    Ok(())
}
