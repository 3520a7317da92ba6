//! Classification of a looked-up value against a field's declared type.

use jsonbind_core::{DecodeError, DecodeErrorKind, FieldType, Kind, KindSet, Shape, Value};

/// Pick the single member of `candidates` matching the runtime shape of
/// `value`. No coercion happens here.
pub fn detect_kind(value: &Value, candidates: KindSet) -> Result<Kind, DecodeError> {
    let shape = value.shape();
    let kind = match shape {
        Shape::Int => Kind::Int,
        Shape::String => Kind::String,
        Shape::Bool => Kind::Bool,
        Shape::Float => Kind::Float,
        Shape::List => Kind::Array,
        Shape::Null => Kind::Null,
        Shape::Other => {
            return Err(DecodeErrorKind::UnsupportedRuntimeShape { shape, candidates }.into());
        }
    };

    if candidates.contains(kind) {
        Ok(kind)
    } else {
        Err(DecodeErrorKind::UnionTypeMismatch { shape, candidates }.into())
    }
}

/// Concrete kind to apply for a field of `field_type` given its looked-up
/// `value`. Unions are resolved by shape; single kinds ignore the value.
///
/// Returns `None` for nested object types, which have no kind of their own.
pub fn resolve_kind(field_type: &FieldType, value: &Value) -> Result<Option<Kind>, DecodeError> {
    match field_type {
        FieldType::Scalar(kind) => Ok(Some(kind.kind())),
        FieldType::Union(candidates) => detect_kind(value, *candidates).map(Some),
        FieldType::List => Ok(Some(Kind::Array)),
        FieldType::Object(_) => Ok(None),
        FieldType::Nullable(inner) => resolve_kind(inner, value),
    }
}
