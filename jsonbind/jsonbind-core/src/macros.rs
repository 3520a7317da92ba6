//! Declaration macros that build binding tables and union field types.

/// Implement [`Target`](crate::Target) for a struct from a binding table.
///
/// Each entry names a struct field, the slot family it belongs to and its
/// binding: `scalar("key")` for scalar, nullable and union fields,
/// `list("key", "ElementType")` for `Vec<T>` / `Option<Vec<T>>`, and
/// `object("key")` for nested bound types and `Option<T>`. Fields left out of
/// the table are never touched by the decoder.
///
/// ```
/// use jsonbind_core::bind;
///
/// #[derive(Debug, Default)]
/// struct Person {
///     first_name: String,
///     age: Option<i64>,
///     friends: Vec<Person>,
/// }
///
/// bind! {
///     impl Person as "Person" {
///         first_name: scalar("first_name"),
///         age: scalar("stats.age"),
///         friends: list("friends", "Person"),
///     }
/// }
/// ```
#[macro_export]
macro_rules! bind {
    (
        impl $ty:ty as $name:literal {
            $( $field:ident : $slot:ident ( $key:literal $(, $element:literal)? ) ),* $(,)?
        }
    ) => {
        impl $crate::Target for $ty {
            fn type_name(&self) -> &str {
                $name
            }

            fn bindings(&self) -> &[$crate::Binding] {
                static BINDINGS: &[$crate::Binding] = &[
                    $( $crate::Binding::declare(
                        stringify!($field),
                        $key,
                        $crate::__element_type!($($element)?),
                    ), )*
                ];
                BINDINGS
            }

            fn field_mut(&mut self, field: &str) -> Option<$crate::FieldMut<'_>> {
                $(
                    if field == stringify!($field) {
                        return Some($crate::__field_slot!($slot, self.$field));
                    }
                )*
                None
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
                self
            }
        }

        impl $crate::TargetType for $ty {
            const TYPE_NAME: &'static str = $name;
        }

        impl $crate::ObjectField for $ty {
            fn object_field(&mut self) -> $crate::FieldMut<'_> {
                $crate::FieldMut::Object(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __element_type {
    () => {
        None
    };
    ($element:literal) => {
        Some($element)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_slot {
    (scalar, $place:expr) => {
        $crate::FieldMut::Scalar(&mut $place)
    };
    (list, $place:expr) => {
        $crate::FieldMut::List(&mut $place)
    };
    (object, $place:expr) => {
        $crate::ObjectField::object_field(&mut $place)
    };
}

/// Declare an enum whose variants are the members of a scalar union.
///
/// Each variant wraps one of `i64`, `String`, `bool` or `f64`; member kinds
/// are derived from the payload types and must be distinct. The enum can be
/// bound as a `scalar` field directly, or as `Option<_>` to admit `null`.
///
/// ```
/// jsonbind_core::scalar_union! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum Id {
///         Number(i64),
///         Text(String),
///     }
/// }
/// ```
#[macro_export]
macro_rules! scalar_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident ( $ty:ty ) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $variant($ty), )+
        }

        impl $crate::ScalarType for $name {
            const DECLARED: $crate::DeclaredScalar = $crate::DeclaredScalar::Union(
                $crate::KindSet::EMPTY
                    $( .union(<$ty as $crate::ScalarType>::DECLARED.kinds()) )+
            );

            fn from_scalar(scalar: $crate::Scalar) -> Result<Self, $crate::Scalar> {
                $(
                    let scalar = match <$ty as $crate::ScalarType>::from_scalar(scalar) {
                        Ok(v) => return Ok($name::$variant(v)),
                        Err(scalar) => scalar,
                    };
                )+
                Err(scalar)
            }

            fn to_value(&self) -> $crate::Value {
                match self {
                    $( $name::$variant(v) => $crate::ScalarType::to_value(v), )+
                }
            }
        }

        impl $crate::ScalarSlot for $name {
            fn field_type(&self) -> $crate::FieldType {
                <$name as $crate::ScalarType>::DECLARED.field_type()
            }

            fn current(&self) -> $crate::Value {
                $crate::ScalarType::to_value(self)
            }

            fn assign(
                &mut self,
                value: Option<$crate::Scalar>,
            ) -> Result<(), $crate::DecodeError> {
                $crate::__private::assign_required(self, value)
            }
        }
    };
}
