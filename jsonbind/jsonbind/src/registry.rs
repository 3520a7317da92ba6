//! Constructors for the types list elements and nested objects name.

use std::{collections::HashMap, fmt, sync::Arc};

use jsonbind_core::{DecodeError, DecodeErrorKind, Target, TargetType};

use crate::record::{Record, RecordSchema};

type Constructor = Arc<dyn Fn() -> Box<dyn Target> + Send + Sync>;

/// Maps type identifiers to constructors of fresh, default-shaped instances.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    constructors: HashMap<String, Constructor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its bound type name, constructed with `Default`.
    pub fn register<T: TargetType + Default>(&mut self) {
        self.register_with(T::TYPE_NAME, || -> Box<dyn Target> { Box::new(T::default()) });
    }

    /// Register a constructor under `type_name`, replacing any previous one.
    pub fn register_with<F>(&mut self, type_name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn Target> + Send + Sync + 'static,
    {
        self.constructors.insert(type_name.into(), Arc::new(constructor));
    }

    /// Register a record type; instances share `schema`.
    pub fn register_record(&mut self, schema: impl Into<Arc<RecordSchema>>) {
        let schema = schema.into();
        let type_name = schema.type_name().to_string();
        self.register_with(type_name, move || -> Box<dyn Target> {
            Box::new(Record::new(Arc::clone(&schema)))
        });
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Construct a new instance of `type_name`.
    pub fn construct(&self, type_name: &str) -> Result<Box<dyn Target>, DecodeError> {
        let constructor = self.constructors.get(type_name).ok_or_else(|| {
            DecodeErrorKind::TypeConstruction {
                type_name: type_name.to_string(),
                reason: "type is not registered".to_string(),
            }
        })?;
        Ok(constructor())
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn extend(&mut self, other: TypeRegistry) {
        self.constructors.extend(other.constructors);
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
