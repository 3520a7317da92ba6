//! Engine-agnostic core types and target contracts for `jsonbind`.
//!
//! This crate provides the loosely-typed source tree ([`Value`]), the declared
//! field type IR ([`FieldType`] / [`FieldDef`]), per-field [`Binding`]s and the
//! [`Target`] slot traits the decode engine writes through.
//!
//! Typed targets are usually declared with [`bind!`]; union-typed scalar fields
//! with [`scalar_union!`].

mod error;
mod lookup;
mod macros;
mod schema;
mod target;
mod value;

pub use error::{DecodeError, DecodeErrorKind, ParseFieldTypeError, PathSegment};
pub use lookup::{find_value, lookup_value};
pub use schema::{
    Binding, FieldDef, FieldDefs, FieldType, Kind, KindSet, ScalarKind, format_field_defs,
    format_type_def,
};
pub use target::{
    DeclaredScalar, FieldMut, ListSlot, ObjectField, OptionalObject, Scalar, ScalarSlot,
    ScalarType, Target, TargetType, downcast_instance, field_defs,
};
pub use value::{Shape, Value};

#[doc(hidden)]
pub mod __private {
    pub use crate::target::assign_required;
}
