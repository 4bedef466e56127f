//! Decoding helpers for client API documents.
//!
//! The API is decoded strictly per item: an item with a missing key or an
//! unknown enum value is rejected as a whole. Lists of items are decoded
//! leniently, dropping (and logging) the items that fail.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::CardkitError;

/// Decode `value`, logging and discarding failures.
pub(crate) fn decode_or_log<T: DeserializeOwned>(value: Value, document: &str) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::warn!(document, "dropping undecodable document: {err}");
            None
        }
    }
}

/// Decode `value`, turning failures into [`CardkitError::Decode`].
pub(crate) fn decode_document<T: DeserializeOwned>(value: Value, document: &str) -> crate::Result<T> {
    serde_json::from_value(value).map_err(|err| {
        tracing::warn!(document, "undecodable document: {err}");
        CardkitError::decode(document, err)
    })
}

/// Deserialize a list, skipping entries that do not decode.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let document = short_type_name::<T>();
    Ok(raw
        .into_iter()
        .filter_map(|item| decode_or_log(item, document))
        .collect())
}

/// Identifiers arrive as JSON strings or numbers; both become strings.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
