//! Serde support for PATCH fields that distinguish "absent" from "null".

use serde::{Deserialize, Deserializer};

/// Use with `#[serde(default, deserialize_with = "tcm_core::nullable::deserialize")]`
/// on an `Option<Option<T>>`: a missing key stays `None`, an explicit `null`
/// becomes `Some(None)`.
pub fn deserialize<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}
