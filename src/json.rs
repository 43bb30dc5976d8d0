//! JSON helpers shared by the runner and the callback primitives.
//!
//! Everything here works on [`Dictionary`] (a JSON object) or on JSON arrays,
//! the only two top-level shapes the platform exchanges with actions.
//! Serialized output is always compact and never contains a raw line break,
//! because the platform reads the action result from a single stdout line.

use serde_json::Value;

use crate::errors::WhiskError;
use crate::Dictionary;

/// Top-level shape of a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Dictionary,
    Array,
    Undefined,
}

/// How string values are treated before a dictionary is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteEscaping {
    /// Rely on serde_json's escaping. Output round-trips exactly.
    #[default]
    Standard,
    /// Run [`escape`] first, reproducing the output of earlier runtimes
    /// whose serializer left quotes unescaped.
    Legacy,
}

/// Classify raw bytes by their top-level JSON shape.
pub fn json_type(data: &[u8]) -> JsonType {
    match serde_json::from_slice::<Value>(data) {
        Ok(Value::Object(_)) => JsonType::Dictionary,
        Ok(Value::Array(_)) => JsonType::Array,
        Ok(_) => JsonType::Undefined,
        Err(e) => {
            tracing::debug!(error = %e, "error converting json data");
            JsonType::Undefined
        }
    }
}

pub fn data_to_dictionary(data: &[u8]) -> Option<Dictionary> {
    match serde_json::from_slice::<Value>(data) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "error converting json data to dictionary");
            None
        }
    }
}

pub fn data_to_array(data: &[u8]) -> Option<Vec<Value>> {
    match serde_json::from_slice::<Value>(data) {
        Ok(Value::Array(items)) => Some(items),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "error converting json data to array");
            None
        }
    }
}

pub fn string_to_dictionary(text: &str) -> Option<Dictionary> {
    data_to_dictionary(text.as_bytes())
}

/// Serialize a dictionary to a single-line JSON string.
pub fn dictionary_to_json_string(dict: &Dictionary, escaping: QuoteEscaping) -> Option<String> {
    let value = match escaping {
        QuoteEscaping::Standard => Value::Object(dict.clone()),
        QuoteEscaping::Legacy => match escape(&Value::Object(dict.clone())) {
            Some(escaped) => escaped,
            None => {
                tracing::warn!("escaping dictionary failed");
                return None;
            }
        },
    };

    match serde_json::to_string(&value) {
        Ok(text) => Some(single_line(text)),
        Err(e) => {
            tracing::warn!(error = %e, "could not convert dictionary to JSON");
            None
        }
    }
}

pub fn dictionary_to_data(dict: &Dictionary) -> Option<Vec<u8>> {
    serde_json::to_vec(dict)
        .map_err(|e| tracing::warn!(error = %e, "cannot convert dictionary to data"))
        .ok()
}

pub fn array_to_json_string(items: &[Value]) -> Option<String> {
    serde_json::to_string(items).ok().map(single_line)
}

pub fn array_to_data(items: &[Value]) -> Option<Vec<u8>> {
    serde_json::to_vec(items)
        .map_err(|e| tracing::warn!(error = %e, "cannot convert array to data"))
        .ok()
}

/// Replace every `"` inside string leaves with `\"`, recursively.
///
/// Keys are left alone. Returns `None` unless the top-level value is an
/// object or an array.
pub fn escape(value: &Value) -> Option<Value> {
    match value {
        Value::Object(map) => Some(Value::Object(escape_dict(map))),
        Value::Array(items) => Some(Value::Array(escape_array(items))),
        _ => None,
    }
}

fn escape_dict(map: &Dictionary) -> Dictionary {
    map.iter()
        .map(|(k, v)| (k.clone(), escape_leaf(v)))
        .collect()
}

fn escape_array(items: &[Value]) -> Vec<Value> {
    items.iter().map(escape_leaf).collect()
}

fn escape_leaf(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.replace('"', "\\\"")),
        Value::Object(map) => Value::Object(escape_dict(map)),
        Value::Array(items) => Value::Array(escape_array(items)),
        other => other.clone(),
    }
}

fn single_line(text: String) -> String {
    if text.contains(['\n', '\r']) {
        text.replace(['\n', '\r'], "")
    } else {
        text
    }
}

/// Interpret the body of a platform API response.
pub fn response_to_dictionary(data: &[u8]) -> crate::Result<Dictionary> {
    match serde_json::from_slice::<Value>(data) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Array(_)) => Err(WhiskError::ArrayResponse),
        Ok(_) => Err(WhiskError::UnparseableResponse),
        Err(e) => {
            tracing::debug!(
                error = %e,
                body = %String::from_utf8_lossy(data),
                "response body is not JSON"
            );
            Err(WhiskError::UnparseableResponse)
        }
    }
}
