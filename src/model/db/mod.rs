//! Documents as they are stored in the database.
//!
//! Each entity has a `New*` form, inserted without an `_id`, and a full form
//! read back with the storage-assigned `_id`.

pub mod attendance;
pub mod event;
pub mod user;
