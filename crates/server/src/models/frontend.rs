//! Frontend key filtering.
//!
//! Server-side records carry bookkeeping columns the game client must not
//! see. Types that are sent to the client list the keys it may receive; the
//! filter serializes the value and keeps only those keys, so a newly added
//! column stays private until it is explicitly exposed.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A type whose serialized form is filtered before reaching the client.
pub trait FrontendKeys: Serialize {
    /// Serialized keys the client is allowed to receive.
    const FRONTEND_KEYS: &'static [&'static str];
}

/// Errors raised while filtering a value for the client.
#[derive(Debug, Error)]
pub enum FrontendFilterError {
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Serialize `value` and strip every key not listed in [`FrontendKeys::FRONTEND_KEYS`].
///
/// # Errors
///
/// Returns an error if the value fails to serialize or does not serialize
/// to a JSON object.
pub fn filter_frontend_keys<T: FrontendKeys>(
    value: &T,
) -> Result<Map<String, Value>, FrontendFilterError> {
    let Value::Object(mut fields) = serde_json::to_value(value)? else {
        return Err(FrontendFilterError::NotAnObject("a non-object value"));
    };

    fields.retain(|key, _| T::FRONTEND_KEYS.contains(&key.as_str()));
    Ok(fields)
}
