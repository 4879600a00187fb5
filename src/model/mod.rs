//! Data types. `db` holds the stored documents, `api` the request and
//! response bodies, and `common` what both share.

pub mod api;
pub mod common;
pub mod db;
pub mod mongodb;
