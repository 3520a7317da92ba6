//! Convert `serde_json` documents into the [`Value`] tree the decoder reads.

use std::sync::Arc;

use jsonbind::Value;
use serde_json::{Number, Value as JsonValue};

use crate::{JsonError, NumberPolicy};

/// Convert a JSON document using [`NumberPolicy::Float`].
pub fn json_to_value(json: &JsonValue) -> Result<Value, JsonError> {
    json_to_value_with_policy(json, NumberPolicy::default())
}

/// Convert a JSON document. Object keys keep the order of `serde_json`'s map.
pub fn json_to_value_with_policy(
    json: &JsonValue,
    policy: NumberPolicy,
) -> Result<Value, JsonError> {
    Ok(match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(v) => Value::Bool(*v),
        JsonValue::Number(n) => number_to_value(n, policy)?,
        JsonValue::String(s) => Value::string(s),
        JsonValue::Array(items) => Value::List(
            items
                .iter()
                .map(|item| json_to_value_with_policy(item, policy))
                .collect::<Result<_, _>>()?,
        ),
        JsonValue::Object(entries) => Value::Map(
            entries
                .iter()
                .map(|(k, v)| Ok((Arc::from(k.as_str()), json_to_value_with_policy(v, policy)?)))
                .collect::<Result<_, JsonError>>()?,
        ),
    })
}

/// Parse JSON text into a [`Value`] using [`NumberPolicy::Float`].
pub fn parse_value(text: &str) -> Result<Value, JsonError> {
    parse_value_with_policy(text, NumberPolicy::default())
}

/// Parse JSON text into a [`Value`].
pub fn parse_value_with_policy(text: &str, policy: NumberPolicy) -> Result<Value, JsonError> {
    let json: JsonValue = serde_json::from_str(text)?;
    json_to_value_with_policy(&json, policy)
}

fn number_to_value(n: &Number, policy: NumberPolicy) -> Result<Value, JsonError> {
    if let Some(v) = n.as_i64() {
        return Ok(Value::Int(v));
    }
    // numbers keep their source text, so integer literals outside i64 are
    // told apart from floats
    let text = n.as_str();
    if policy == NumberPolicy::Reject && !text.contains(['.', 'e', 'E']) {
        return Err(JsonError::IntegerOutOfRange(text.to_string()));
    }
    Ok(Value::Float(text.parse().unwrap_or(f64::NAN)))
}
