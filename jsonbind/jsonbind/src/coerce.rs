//! Conversion of looked-up values to a declared scalar kind.

use jsonbind_core::{DecodeError, DecodeErrorKind, Scalar, ScalarKind, Value};

/// Coerce `value` to `kind`.
///
/// Null becomes `None` when the field is nullable and the kind's zero value
/// otherwise. Lists, mappings and byte blobs only convert to `bool`.
pub fn coerce_scalar(
    nullable: bool,
    value: &Value,
    kind: ScalarKind,
) -> Result<Option<Scalar>, DecodeError> {
    if value.is_null() {
        return Ok((!nullable).then(|| zero_value(kind)));
    }

    let scalar = match kind {
        ScalarKind::String => Scalar::String(to_string(value, kind)?),
        ScalarKind::Int => Scalar::Int(to_int(value, kind)?),
        ScalarKind::Bool => Scalar::Bool(truthy(value)),
        ScalarKind::Float => Scalar::Float(to_float(value, kind)?),
    };
    Ok(Some(scalar))
}

pub(crate) fn zero_value(kind: ScalarKind) -> Scalar {
    match kind {
        ScalarKind::Int => Scalar::Int(0),
        ScalarKind::String => Scalar::String(String::new()),
        ScalarKind::Bool => Scalar::Bool(false),
        ScalarKind::Float => Scalar::Float(0.0),
    }
}

fn to_string(value: &Value, kind: ScalarKind) -> Result<String, DecodeError> {
    match value {
        Value::String(s) => Ok(s.to_string()),
        Value::Int(v) => Ok(v.to_string()),
        Value::Float(v) => Ok(v.to_string()),
        Value::Bool(v) => Ok(v.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(not_convertible(other, kind)),
    }
}

fn to_int(value: &Value, kind: ScalarKind) -> Result<i64, DecodeError> {
    match value {
        Value::Int(v) => Ok(*v),
        // `as` truncates toward zero, saturates and maps NaN to 0
        Value::Float(v) => Ok(*v as i64),
        Value::Bool(v) => Ok(i64::from(*v)),
        Value::String(s) => Ok(parse_int(s)),
        Value::Null => Ok(0),
        other => Err(not_convertible(other, kind)),
    }
}

fn to_float(value: &Value, kind: ScalarKind) -> Result<f64, DecodeError> {
    match value {
        Value::Float(v) => Ok(*v),
        Value::Int(v) => Ok(*v as f64),
        Value::Bool(v) => Ok(if *v { 1.0 } else { 0.0 }),
        Value::String(s) => Ok(s.trim().parse().unwrap_or(0.0)),
        Value::Null => Ok(0.0),
        other => Err(not_convertible(other, kind)),
    }
}

fn parse_int(text: &str) -> i64 {
    let text = text.trim();
    text.parse::<i64>()
        .or_else(|_| text.parse::<f64>().map(|f| f as i64))
        .unwrap_or(0)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(v) => *v,
        Value::Int(v) => *v != 0,
        Value::Float(v) => *v != 0.0,
        Value::String(s) => !(s.is_empty() || s.as_ref() == "0"),
        Value::Bytes(b) => !b.is_empty(),
        Value::List(items) => !items.is_empty(),
        Value::Map(entries) => !entries.is_empty(),
    }
}

fn not_convertible(value: &Value, kind: ScalarKind) -> DecodeError {
    DecodeErrorKind::Coercion {
        expected: kind.name(),
        shape: value.shape(),
    }
    .into()
}
