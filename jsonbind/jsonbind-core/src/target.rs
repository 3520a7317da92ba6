//! Target contracts: how the decoder reads binding tables and writes fields.
//!
//! A [`Target`] exposes its static binding table and, per bound field, a typed
//! [`FieldMut`] slot. The slot's Rust type determines the field's declared
//! [`FieldType`]; the decoder never assigns through field names directly.

use std::{any::Any, fmt};

use crate::{
    error::{DecodeError, DecodeErrorKind},
    schema::{Binding, FieldDef, FieldDefs, FieldType, Kind, KindSet, ScalarKind},
    value::Value,
};

/// An object the decoder populates in place.
pub trait Target: Any {
    /// Type identifier, as used in element types and the type registry.
    fn type_name(&self) -> &str;

    /// Bound fields in declaration order.
    fn bindings(&self) -> &[Binding];

    /// Mutable slot for a bound field; `None` for fields with no usable slot.
    fn field_mut(&mut self, field: &str) -> Option<FieldMut<'_>>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl fmt::Debug for dyn Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("type_name", &self.type_name())
            .finish_non_exhaustive()
    }
}

/// A statically named [`Target`] that can sit behind a typed slot
/// (`Vec<T>`, `Option<T>`).
pub trait TargetType: Target + Sized {
    const TYPE_NAME: &'static str;
}

/// Typed write access to one field.
pub enum FieldMut<'a> {
    Scalar(&'a mut dyn ScalarSlot),
    List(&'a mut dyn ListSlot),
    /// A nested object that always holds an instance.
    Object(&'a mut dyn Target),
    /// A nested object that may hold no instance.
    OptionalObject(&'a mut dyn OptionalObject),
}

impl FieldMut<'_> {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldMut::Scalar(slot) => slot.field_type(),
            FieldMut::List(slot) if slot.is_nullable() => FieldType::nullable(FieldType::List),
            FieldMut::List(_) => FieldType::List,
            FieldMut::Object(instance) => FieldType::object(instance.type_name()),
            FieldMut::OptionalObject(slot) => {
                let object = FieldType::object(slot.type_name());
                if slot.is_nullable() {
                    FieldType::nullable(object)
                } else {
                    object
                }
            }
        }
    }
}

/// A coerced scalar ready to be stored in a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    String(String),
    Bool(bool),
    Float(f64),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::String(_) => ScalarKind::String,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Float(_) => ScalarKind::Float,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Int(v) => Value::Int(*v),
            Scalar::String(v) => Value::string(v),
            Scalar::Bool(v) => Value::Bool(*v),
            Scalar::Float(v) => Value::Float(*v),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::String(v) => write!(f, "{v:?}"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// Declared type of a non-null field holding a [`ScalarType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredScalar {
    Scalar(ScalarKind),
    Union(KindSet),
}

impl DeclaredScalar {
    pub const fn kinds(self) -> KindSet {
        match self {
            DeclaredScalar::Scalar(kind) => KindSet::EMPTY.with(kind.kind()),
            DeclaredScalar::Union(kinds) => kinds,
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            DeclaredScalar::Scalar(kind) => FieldType::Scalar(kind),
            DeclaredScalar::Union(kinds) => FieldType::Union(kinds),
        }
    }

    /// The type of an `Option<_>` field: unions gain a `null` member, plain
    /// scalars a nullable wrapper.
    pub fn nullable_field_type(self) -> FieldType {
        match self {
            DeclaredScalar::Scalar(kind) => FieldType::nullable(FieldType::Scalar(kind)),
            DeclaredScalar::Union(kinds) => FieldType::Union(kinds.with(Kind::Null)),
        }
    }
}

/// Rust types a scalar field can hold: `i64`, `String`, `bool`, `f64` and
/// enums declared with [`scalar_union!`](crate::scalar_union).
pub trait ScalarType: Sized {
    const DECLARED: DeclaredScalar;

    /// Take a scalar this type can hold; any other kind is handed back.
    fn from_scalar(scalar: Scalar) -> Result<Self, Scalar>;

    fn to_value(&self) -> Value;
}

impl ScalarType for i64 {
    const DECLARED: DeclaredScalar = DeclaredScalar::Scalar(ScalarKind::Int);

    fn from_scalar(scalar: Scalar) -> Result<Self, Scalar> {
        match scalar {
            Scalar::Int(v) => Ok(v),
            other => Err(other),
        }
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl ScalarType for String {
    const DECLARED: DeclaredScalar = DeclaredScalar::Scalar(ScalarKind::String);

    fn from_scalar(scalar: Scalar) -> Result<Self, Scalar> {
        match scalar {
            Scalar::String(v) => Ok(v),
            other => Err(other),
        }
    }

    fn to_value(&self) -> Value {
        Value::string(self)
    }
}

impl ScalarType for bool {
    const DECLARED: DeclaredScalar = DeclaredScalar::Scalar(ScalarKind::Bool);

    fn from_scalar(scalar: Scalar) -> Result<Self, Scalar> {
        match scalar {
            Scalar::Bool(v) => Ok(v),
            other => Err(other),
        }
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ScalarType for f64 {
    const DECLARED: DeclaredScalar = DeclaredScalar::Scalar(ScalarKind::Float);

    fn from_scalar(scalar: Scalar) -> Result<Self, Scalar> {
        match scalar {
            Scalar::Float(v) => Ok(v),
            other => Err(other),
        }
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

/// Field slot holding a scalar, nullable scalar or scalar union.
pub trait ScalarSlot {
    fn field_type(&self) -> FieldType;

    /// Current content, used as the lookup default.
    fn current(&self) -> Value;

    /// Store a coerced scalar; `None` stores null.
    fn assign(&mut self, value: Option<Scalar>) -> Result<(), DecodeError>;

    /// List view of a union slot with an `array` member, used when the
    /// looked-up value resolves to `array`.
    fn list_slot(&mut self) -> Option<&mut dyn ListSlot> {
        None
    }
}

fn slot_mismatch(declared: &FieldType, value: Option<&Scalar>) -> DecodeError {
    let actual = value.map_or("null", |s| s.kind().name());
    DecodeErrorKind::SlotMismatch {
        declared: declared.to_string(),
        actual: actual.to_string(),
    }
    .into()
}

/// Assignment for a non-null slot of a [`ScalarType`]; null is rejected.
#[doc(hidden)]
pub fn assign_required<T: ScalarType>(
    slot: &mut T,
    value: Option<Scalar>,
) -> Result<(), DecodeError> {
    let declared = T::DECLARED.field_type();
    let Some(scalar) = value else {
        return Err(slot_mismatch(&declared, None));
    };
    *slot = T::from_scalar(scalar).map_err(|s| slot_mismatch(&declared, Some(&s)))?;
    Ok(())
}

impl<T: ScalarType> ScalarSlot for Option<T> {
    fn field_type(&self) -> FieldType {
        T::DECLARED.nullable_field_type()
    }

    fn current(&self) -> Value {
        self.as_ref().map_or(Value::Null, ScalarType::to_value)
    }

    fn assign(&mut self, value: Option<Scalar>) -> Result<(), DecodeError> {
        *self = match value {
            None => None,
            Some(scalar) => Some(
                T::from_scalar(scalar).map_err(|s| slot_mismatch(&self.field_type(), Some(&s)))?,
            ),
        };
        Ok(())
    }
}

macro_rules! required_scalar_slots {
    ($($ty:ty),+ $(,)?) => {$(
        impl ScalarSlot for $ty {
            fn field_type(&self) -> FieldType {
                <$ty as ScalarType>::DECLARED.field_type()
            }

            fn current(&self) -> Value {
                ScalarType::to_value(self)
            }

            fn assign(&mut self, value: Option<Scalar>) -> Result<(), DecodeError> {
                assign_required(self, value)
            }
        }
    )+};
}

required_scalar_slots!(i64, String, bool, f64);

/// Field slot holding a homogeneous list of nested objects.
pub trait ListSlot {
    /// Type name of the slot's element type.
    fn element_type(&self) -> &str;

    fn is_nullable(&self) -> bool;

    /// Whether `instance` can be stored as an element.
    fn accepts(&self, instance: &dyn Target) -> bool;

    /// Store null. Only called on nullable slots.
    fn set_null(&mut self);

    /// Replace the whole list with `items`.
    fn replace(&mut self, items: Vec<Box<dyn Target>>) -> Result<(), DecodeError>;
}

impl<T: TargetType> ListSlot for Vec<T> {
    fn element_type(&self) -> &str {
        T::TYPE_NAME
    }

    fn is_nullable(&self) -> bool {
        false
    }

    fn accepts(&self, instance: &dyn Target) -> bool {
        instance.as_any().is::<T>()
    }

    fn set_null(&mut self) {
        self.clear();
    }

    fn replace(&mut self, items: Vec<Box<dyn Target>>) -> Result<(), DecodeError> {
        *self = items
            .into_iter()
            .map(downcast_instance::<T>)
            .collect::<Result<_, _>>()?;
        Ok(())
    }
}

impl<T: TargetType> ListSlot for Option<Vec<T>> {
    fn element_type(&self) -> &str {
        T::TYPE_NAME
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn accepts(&self, instance: &dyn Target) -> bool {
        instance.as_any().is::<T>()
    }

    fn set_null(&mut self) {
        *self = None;
    }

    fn replace(&mut self, items: Vec<Box<dyn Target>>) -> Result<(), DecodeError> {
        let items = items
            .into_iter()
            .map(downcast_instance::<T>)
            .collect::<Result<_, _>>()?;
        *self = Some(items);
        Ok(())
    }
}

/// Field slot for a nested object that may hold no instance yet.
pub trait OptionalObject {
    /// Declared type of the nested object.
    fn type_name(&self) -> &str;

    fn is_nullable(&self) -> bool;

    /// Whether an instance is currently held.
    fn is_set(&self) -> bool;

    fn instance_mut(&mut self) -> Option<&mut dyn Target>;

    fn accepts(&self, instance: &dyn Target) -> bool;

    fn clear(&mut self);

    fn install(&mut self, instance: Box<dyn Target>) -> Result<(), DecodeError>;
}

impl<T: TargetType> OptionalObject for Option<T> {
    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn is_set(&self) -> bool {
        self.is_some()
    }

    fn instance_mut(&mut self) -> Option<&mut dyn Target> {
        self.as_mut().map(|t| t as &mut dyn Target)
    }

    fn accepts(&self, instance: &dyn Target) -> bool {
        instance.as_any().is::<T>()
    }

    fn clear(&mut self) {
        *self = None;
    }

    fn install(&mut self, instance: Box<dyn Target>) -> Result<(), DecodeError> {
        *self = Some(downcast_instance::<T>(instance)?);
        Ok(())
    }
}

/// Routes a nested-object field to the matching [`FieldMut`] variant.
///
/// [`bind!`](crate::bind) implements it for every bound type (always holds an
/// instance); `Option<T>` may be empty.
pub trait ObjectField {
    fn object_field(&mut self) -> FieldMut<'_>;
}

impl<T: TargetType> ObjectField for Option<T> {
    fn object_field(&mut self) -> FieldMut<'_> {
        FieldMut::OptionalObject(self)
    }
}

/// Move a constructed instance out of its box as a concrete `T`.
pub fn downcast_instance<T: TargetType>(instance: Box<dyn Target>) -> Result<T, DecodeError> {
    let type_name = instance.type_name().to_string();
    instance
        .into_any()
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| {
            DecodeErrorKind::TypeConstruction {
                type_name,
                reason: format!("instance does not fit a field of type '{}'", T::TYPE_NAME),
            }
            .into()
        })
}

/// Collect the binding table of `target` together with each field's declared
/// type. Fields without a slot are left out.
pub fn field_defs(target: &mut dyn Target) -> FieldDefs {
    let bindings = target.bindings().to_vec();
    bindings
        .into_iter()
        .filter_map(|binding| {
            let field_type = target.field_mut(&binding.field)?.field_type();
            Some(FieldDef {
                binding,
                field_type,
            })
        })
        .collect::<Vec<_>>()
        .into()
}
