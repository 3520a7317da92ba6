//! Decode entry point and per-field dispatch.

use std::sync::Arc;

use jsonbind_core::{
    Binding, DecodeError, DecodeErrorKind, FieldMut, Kind, PathSegment, ScalarSlot, Target,
    TargetType, Value, lookup_value,
};
use tracing::{debug, trace};

use crate::{aggregate, coerce::coerce_scalar, record::RecordSchema, registry::TypeRegistry, resolve};

/// Populates [`Target`]s from a [`Value`] tree.
///
/// A decoder only holds its [`TypeRegistry`]; every [`Decoder::decode`] call
/// is independent, so one decoder can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    registry: TypeRegistry,
}

/// Builder for configuring [`Decoder`].
#[derive(Debug, Default)]
pub struct DecoderBuilder {
    registry: TypeRegistry,
}

impl Decoder {
    /// Create a builder for [`Decoder`].
    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::default()
    }

    /// A decoder with an empty registry. Targets without list or optional
    /// object fields need nothing else.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Register a bound type so list elements and nested objects of that
    /// type can be constructed.
    pub fn register_type<T: TargetType + Default>(&mut self) {
        self.registry.register::<T>();
    }

    /// Decode `data` into `target` in place.
    ///
    /// Bound fields are processed in declaration order. A field whose key is
    /// absent keeps its current value. On error, fields processed before the
    /// failing one stay assigned.
    pub fn decode(&self, target: &mut dyn Target, data: &Value) -> Result<(), DecodeError> {
        debug!(type_name = target.type_name(), "decoding target");

        let bindings = target.bindings().to_vec();
        for binding in &bindings {
            self.decode_field(target, binding, data)
                .map_err(|e| e.at(PathSegment::Field(binding.field.to_string())))?;
        }
        Ok(())
    }

    /// Construct a registered type and decode `data` into it.
    pub fn decode_new(&self, type_name: &str, data: &Value) -> Result<Box<dyn Target>, DecodeError> {
        let mut instance = self.registry.construct(type_name)?;
        self.decode(instance.as_mut(), data)?;
        Ok(instance)
    }

    fn decode_field(
        &self,
        target: &mut dyn Target,
        binding: &Binding,
        data: &Value,
    ) -> Result<(), DecodeError> {
        let Some(slot) = target.field_mut(&binding.field) else {
            debug!(field = %binding.field, "field has no slot, skipping");
            return Ok(());
        };

        trace!(
            field = %binding.field,
            key = %binding.source_key,
            field_type = %slot.field_type(),
            "decoding field"
        );

        match slot {
            FieldMut::Scalar(slot) => decode_scalar(self, slot, binding, data),
            FieldMut::List(slot) => aggregate::decode_list(self, slot, binding, data),
            FieldMut::Object(instance) => aggregate::decode_object(self, instance, binding, data),
            FieldMut::OptionalObject(slot) => {
                aggregate::decode_optional_object(self, slot, binding, data)
            }
        }
    }
}

fn decode_scalar(
    decoder: &Decoder,
    slot: &mut dyn ScalarSlot,
    binding: &Binding,
    data: &Value,
) -> Result<(), DecodeError> {
    let field_type = slot.field_type();
    let current = slot.current();
    let value = lookup_value(data, &binding.source_key, &current)?;

    match resolve::resolve_kind(&field_type, value)? {
        Some(Kind::Null) => slot.assign(None),
        Some(Kind::Array) => match slot.list_slot() {
            Some(list) => aggregate::decode_list(decoder, list, binding, data),
            None => Err(DecodeErrorKind::SlotMismatch {
                declared: field_type.to_string(),
                actual: Kind::Array.name().to_string(),
            }
            .into()),
        },
        Some(kind) => match kind.scalar() {
            Some(scalar) => slot.assign(coerce_scalar(field_type.is_nullable(), value, scalar)?),
            None => Err(DecodeErrorKind::SlotMismatch {
                declared: field_type.to_string(),
                actual: kind.name().to_string(),
            }
            .into()),
        },
        None => Err(DecodeErrorKind::SlotMismatch {
            declared: field_type.to_string(),
            actual: "object".to_string(),
        }
        .into()),
    }
}

impl DecoderBuilder {
    /// Register a bound type constructed with `Default`.
    pub fn with_type<T: TargetType + Default>(mut self) -> Self {
        self.registry.register::<T>();
        self
    }

    /// Register a constructor under `type_name`.
    pub fn with_constructor<F>(mut self, type_name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Box<dyn Target> + Send + Sync + 'static,
    {
        self.registry.register_with(type_name, constructor);
        self
    }

    /// Register a runtime-described record type.
    pub fn with_record(mut self, schema: impl Into<Arc<RecordSchema>>) -> Self {
        self.registry.register_record(schema);
        self
    }

    /// Add every constructor of `registry`, replacing same-named entries.
    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry.extend(registry);
        self
    }

    /// Build the decoder.
    pub fn build(self) -> Decoder {
        Decoder::with_registry(self.registry)
    }
}
