//! Serde helpers for partial-update payloads.
//!
//! Both are used with `#[serde(default, deserialize_with = "...")]`, so an
//! omitted field stays `None`.

use serde::{Deserialize, Deserializer};

/// A required field: present becomes `Some`, and an explicit `null` is an error.
pub mod present {
    use super::*;

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Some)
    }
}

/// An optional field: present becomes `Some(value)`, and `null` becomes
/// `Some(None)`, which clears the stored value.
pub mod nullable {
    use super::*;

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
