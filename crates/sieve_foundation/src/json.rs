//! Decoding of string-encoded JSON payloads into values.

use crate::failure::ValueErrorKind;
use crate::value::Value;

/// Decodes a JSON payload held in a string value.
///
/// # Errors
///
/// Returns [`ValueErrorKind::JsonType`] if the input is not a string and
/// [`ValueErrorKind::Json`] if the string is not valid JSON.
pub fn decode(raw: &Value) -> Result<Value, ValueErrorKind> {
    let text = raw.as_str().ok_or(ValueErrorKind::JsonType)?;
    let parsed: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ValueErrorKind::Json {
            reason: e.to_string(),
        })?;
    Ok(Value::from(parsed))
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Nil,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // u64 above i64::MAX and all fractional numbers
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s.into()),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Self::from(k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}
