mod bson;
mod collection;
#[cfg(test)]
mod memory;
mod store;

pub use bson::Id;
pub use collection::{Coll, MongoCollection};
#[cfg(test)]
pub use memory::MemoryStore;
pub use store::{ensure_indexes_exist, DocumentStore, MongoStore, SharedStore};

pub const USERS: &str = "users";
pub const EVENTS: &str = "events";
pub const ATTENDANCE: &str = "attendance";
