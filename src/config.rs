//! Config-mapping representation.
//!
//! A config mapping is a JSON object of the shape
//! `{"value": <kind payload>, "critical": <bool>}` as loaded by the
//! surrounding configuration layer. Both keys are optional; missing keys
//! fall back to the kind's defaults.

use serde_json::{Map, Value};

use crate::codec::parse_bool;
use crate::errors::{Error, Result};

/// JSON object used as config mapping.
pub type Mapping = Map<String, Value>;

/// Key holding the kind-specific payload.
pub const VALUE_KEY: &str = "value";

/// Key holding the criticality flag.
pub const CRITICAL_KEY: &str = "critical";

/// Name of the JSON type of `value`, as used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn unsupported(value: &Value) -> Error {
    Error::UnsupportedInputType {
        type_name: type_name(value),
    }
}

/// Read the `critical` key of a mapping.
///
/// Booleans and the strings `true`/`false` are accepted, a missing key
/// yields `default`.
pub fn read_critical(mapping: &Mapping, default: bool) -> Result<bool> {
    let invalid = |value: &Value| Error::InvalidCritical {
        value: value.to_string(),
    };

    match mapping.get(CRITICAL_KEY) {
        None => Ok(default),
        Some(Value::Bool(critical)) => Ok(*critical),
        Some(value @ Value::String(s)) => parse_bool(s).ok_or_else(|| invalid(value)),
        Some(value) => Err(invalid(value)),
    }
}

/// Build the flat mapping returned by `serialize()`.
pub(crate) fn to_mapping(critical: bool, value: Value) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(CRITICAL_KEY.into(), Value::Bool(critical));
    mapping.insert(VALUE_KEY.into(), value);
    Value::Object(mapping)
}

/// Read a list of strings.
///
/// `null` is the empty list and a single string is a one-element list.
pub(crate) fn string_list(value: &Value) -> Result<Vec<&str>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.as_str()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| unsupported(item)))
            .collect(),
        other => Err(unsupported(other)),
    }
}
