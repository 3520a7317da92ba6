//! Recursive decoding of list and nested-object fields.
//!
//! Aggregate fields are written only after every recursive decode below them
//! succeeded, so a failure never leaves a half-built list or object behind.

use jsonbind_core::{
    Binding, DecodeError, DecodeErrorKind, ListSlot, OptionalObject, PathSegment, Target, Value,
    find_value,
};
use tracing::trace;

use crate::decoder::Decoder;

/// Replace a list field with one freshly constructed element per source item.
///
/// An absent key keeps the current list; null clears nullable lists and
/// empties the rest.
pub(crate) fn decode_list(
    decoder: &Decoder,
    slot: &mut dyn ListSlot,
    binding: &Binding,
    data: &Value,
) -> Result<(), DecodeError> {
    let Some(element_type) = binding.element_type() else {
        return Err(DecodeErrorKind::MissingElementType {
            field: binding.field.to_string(),
        }
        .into());
    };

    let Some(value) = find_value(data, &binding.source_key)? else {
        trace!(key = %binding.source_key, "list key absent, keeping current items");
        return Ok(());
    };

    let items: &[Value] = match value {
        Value::Null if slot.is_nullable() => {
            slot.set_null();
            return Ok(());
        }
        Value::Null => &[],
        Value::List(items) => items,
        other => {
            return Err(DecodeErrorKind::Coercion {
                expected: "list",
                shape: other.shape(),
            }
            .into());
        }
    };

    let mut decoded = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let instance = construct_element(decoder, slot, element_type)
            .and_then(|mut instance| {
                decoder.decode(instance.as_mut(), item)?;
                Ok(instance)
            })
            .map_err(|e| e.at(PathSegment::Index(index)))?;
        decoded.push(instance);
    }

    trace!(element_type, len = decoded.len(), "replacing list items");
    slot.replace(decoded)
}

fn construct_element(
    decoder: &Decoder,
    slot: &dyn ListSlot,
    element_type: &str,
) -> Result<Box<dyn Target>, DecodeError> {
    let instance = decoder.registry().construct(element_type)?;
    if !slot.accepts(instance.as_ref()) {
        return Err(misfit(element_type, slot.element_type()));
    }
    Ok(instance)
}

/// Decode a nested object that may not hold an instance yet.
///
/// An existing instance is merged into in place. Otherwise a new instance of
/// the declared type is constructed, decoded and only then installed.
pub(crate) fn decode_optional_object(
    decoder: &Decoder,
    slot: &mut dyn OptionalObject,
    binding: &Binding,
    data: &Value,
) -> Result<(), DecodeError> {
    let value = find_value(data, &binding.source_key)?;

    match value {
        None if slot.is_set() => return Ok(()),
        None | Some(Value::Null) if slot.is_nullable() => {
            slot.clear();
            return Ok(());
        }
        _ => {}
    }

    let source = value.map(object_source).transpose()?.flatten();

    if let Some(instance) = slot.instance_mut() {
        if let Some(source) = source {
            decoder.decode(instance, source)?;
        }
        return Ok(());
    }

    let type_name = slot.type_name().to_string();
    let mut instance = decoder.registry().construct(&type_name)?;
    if !slot.accepts(instance.as_ref()) {
        return Err(misfit(instance.type_name(), &type_name));
    }
    if let Some(source) = source {
        decoder.decode(instance.as_mut(), source)?;
    }

    trace!(type_name = %type_name, "installing constructed object");
    slot.install(instance)
}

/// Merge source data into a nested object that always holds an instance.
/// Absent, null and empty values leave it unchanged.
pub(crate) fn decode_object(
    decoder: &Decoder,
    instance: &mut dyn Target,
    binding: &Binding,
    data: &Value,
) -> Result<(), DecodeError> {
    let value = find_value(data, &binding.source_key)?;
    match value.map(object_source).transpose()?.flatten() {
        Some(source) => decoder.decode(instance, source),
        None => Ok(()),
    }
}

/// The mapping to decode a nested object from; `None` for empty values.
fn object_source(value: &Value) -> Result<Option<&Value>, DecodeError> {
    match value {
        v if v.is_empty() => Ok(None),
        Value::Map(_) => Ok(Some(value)),
        other => Err(DecodeErrorKind::Coercion {
            expected: "object",
            shape: other.shape(),
        }
        .into()),
    }
}

fn misfit(type_name: &str, declared: &str) -> DecodeError {
    DecodeErrorKind::TypeConstruction {
        type_name: type_name.to_string(),
        reason: format!("constructed instance does not fit a field of type '{declared}'"),
    }
    .into()
}
