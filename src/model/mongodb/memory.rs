use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mongodb::bson::Document;

use crate::error::{Error, Result};

use super::{DocumentStore, Id, SharedStore};

/// An in-memory [`DocumentStore`] for tests, mirroring the MongoDB semantics
/// the handlers rely on.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn shared() -> SharedStore {
        Arc::new(Self::default())
    }

    fn with<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut Vec<Document>) -> T,
    ) -> Result<T> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))?;
        Ok(f(collections.entry(collection.to_string()).or_default()))
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

fn has_id(document: &Document, id: Id) -> bool {
    document.get_object_id("_id").map_or(false, |oid| oid == *id)
}

#[rocket::async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<Id> {
        let id = match document.get_object_id("_id") {
            Ok(oid) => Id::from(oid),
            Err(_) => {
                let id = Id::new();
                document.insert("_id", id);
                id
            }
        };
        self.with(collection, |docs| docs.push(document))?;
        Ok(id)
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>> {
        self.with(collection, |docs| {
            docs.iter()
                .filter(|doc| matches(doc, &filter))
                .cloned()
                .collect()
        })
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>> {
        self.with(collection, |docs| {
            docs.iter().find(|doc| matches(doc, &filter)).cloned()
        })
    }

    async fn set_fields(&self, collection: &str, id: Id, fields: Document) -> Result<bool> {
        self.with(collection, |docs| {
            match docs.iter_mut().find(|doc| has_id(doc, id)) {
                Some(doc) => {
                    for (key, value) in fields {
                        doc.insert(key, value);
                    }
                    true
                }
                None => false,
            }
        })
    }

    async fn delete_one(&self, collection: &str, id: Id) -> Result<bool> {
        self.with(collection, |docs| {
            let before = docs.len();
            docs.retain(|doc| !has_id(doc, id));
            docs.len() < before
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mongodb::bson::doc;

    #[rocket::async_test]
    async fn set_fields_overwrites_only_given_keys() {
        let store = MemoryStore::default();
        let id = store
            .insert_one("things", doc! { "a": 1, "b": "two" })
            .await
            .unwrap();

        assert!(store.set_fields("things", id, doc! { "a": 5 }).await.unwrap());
        let doc = store.find_one("things", id.as_doc()).await.unwrap().unwrap();
        assert_eq!(doc.get_i32("a").unwrap(), 5);
        assert_eq!(doc.get_str("b").unwrap(), "two");

        assert!(!store
            .set_fields("things", Id::new(), doc! { "a": 6 })
            .await
            .unwrap());
    }

    #[rocket::async_test]
    async fn find_keeps_insertion_order() {
        let store = MemoryStore::default();
        for n in 0..5 {
            let parity = if n % 2 == 0 { "even" } else { "odd" };
            store
                .insert_one("numbers", doc! { "n": n, "parity": parity })
                .await
                .unwrap();
        }

        let evens = store
            .find("numbers", doc! { "parity": "even" })
            .await
            .unwrap();
        let ns: Vec<i32> = evens.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(ns, vec![0, 2, 4]);
        assert!(store.find("missing", doc! {}).await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = MemoryStore::default();
        let id = store.insert_one("things", doc! {}).await.unwrap();
        assert!(store.delete_one("things", id).await.unwrap());
        assert!(!store.delete_one("things", id).await.unwrap());
    }
}
