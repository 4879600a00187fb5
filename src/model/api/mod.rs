//! API-compatible types.
//!
//! Request types carry validation rules; response types are serialised in an
//! API-friendly way:
//!
//! - IDs are serialised as hex strings.
//! - Datetimes are serialised as RFC 3339 strings.
//! - Absent optional fields are serialised as empty values, never omitted.

pub mod attendance;
pub mod event;
pub mod id;
pub mod message;
pub mod user;
pub mod valid;
