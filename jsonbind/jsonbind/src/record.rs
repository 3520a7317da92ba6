//! Targets whose fields are described at runtime.
//!
//! A [`RecordSchema`] lists field definitions the same way `bind!` does for
//! Rust types. Each [`Record`] slot is typed from its [`FieldType`], so the
//! decoder treats records and bound structs alike.

use std::{
    any::Any,
    collections::HashSet,
    fmt::{self, Write as _},
    sync::Arc,
};

use jsonbind_core::{
    Binding, DecodeError, DecodeErrorKind, FieldDef, FieldDefs, FieldMut, FieldType, Kind,
    ListSlot, OptionalObject, Scalar, ScalarSlot, Target, Value,
};

use crate::coerce::zero_value;

/// Error returned when a record schema is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordSchemaError {
    #[error("record type name must not be empty")]
    EmptyTypeName,

    #[error("field '{field}' is declared more than once in '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    #[error("list field '{field}' of '{type_name}' cannot have element type '{element_type}'")]
    InvalidElementType {
        type_name: String,
        field: String,
        element_type: String,
    },
}

/// Type name and field definitions of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    type_name: String,
    fields: FieldDefs,
    bindings: Vec<Binding>,
}

impl RecordSchema {
    pub fn new(
        type_name: impl Into<String>,
        fields: impl Into<FieldDefs>,
    ) -> Result<Self, RecordSchemaError> {
        let type_name = type_name.into();
        let fields = fields.into();

        if type_name.is_empty() {
            return Err(RecordSchemaError::EmptyTypeName);
        }

        let mut seen = HashSet::new();
        for field in fields.iter() {
            if !seen.insert(field.name()) {
                return Err(RecordSchemaError::DuplicateField {
                    type_name,
                    field: field.name().to_string(),
                });
            }
            if let Some(element_type) = field.binding.element_type()
                && element_type.parse::<FieldType>().ok() != Some(FieldType::object(element_type))
            {
                return Err(RecordSchemaError::InvalidElementType {
                    type_name,
                    field: field.name().to_string(),
                    element_type: element_type.to_string(),
                });
            }
        }

        let bindings = fields.iter().map(|f| f.binding.clone()).collect();
        Ok(Self {
            type_name,
            fields,
            bindings,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &FieldDefs {
        &self.fields
    }
}

/// Slot of a scalar, nullable scalar or union record field.
#[derive(Debug, Clone, PartialEq)]
pub struct DynScalar {
    field_type: FieldType,
    value: Option<Scalar>,
}

impl DynScalar {
    /// A slot holding the zero value of non-nullable scalar types, first
    /// member first for unions, and null otherwise.
    pub fn new(field_type: FieldType) -> Self {
        let value = match &field_type {
            FieldType::Scalar(kind) => Some(zero_value(*kind)),
            FieldType::Union(kinds) if !kinds.is_nullable() => {
                kinds.iter().find_map(|k| k.scalar()).map(zero_value)
            }
            _ => None,
        };
        Self { field_type, value }
    }

    pub fn value(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }
}

impl ScalarSlot for DynScalar {
    fn field_type(&self) -> FieldType {
        self.field_type.clone()
    }

    fn current(&self) -> Value {
        self.value.as_ref().map_or(Value::Null, Scalar::to_value)
    }

    fn assign(&mut self, value: Option<Scalar>) -> Result<(), DecodeError> {
        let admitted = match &value {
            Some(scalar) => self.field_type.admits(scalar.kind()),
            None => self.field_type.is_nullable(),
        };
        if !admitted {
            return Err(DecodeErrorKind::SlotMismatch {
                declared: self.field_type.to_string(),
                actual: value.map_or("null", |s| s.kind().name()).to_string(),
            }
            .into());
        }
        self.value = value;
        Ok(())
    }
}

/// Slot of a union record field with an `array` member. Holds either a
/// scalar or a list of nested objects.
pub struct DynUnion {
    scalar: DynScalar,
    element_type: String,
    items: Option<Vec<Box<dyn Target>>>,
}

impl DynUnion {
    pub fn new(field_type: FieldType, element_type: impl Into<String>) -> Self {
        Self {
            scalar: DynScalar::new(field_type),
            element_type: element_type.into(),
            items: None,
        }
    }

    /// The scalar held; `None` for null or while the field holds a list.
    pub fn value(&self) -> Option<&Scalar> {
        match self.items {
            Some(_) => None,
            None => self.scalar.value(),
        }
    }

    /// The items, or `None` while the field holds a scalar or null.
    pub fn items(&self) -> Option<&[Box<dyn Target>]> {
        self.items.as_deref()
    }
}

impl ScalarSlot for DynUnion {
    fn field_type(&self) -> FieldType {
        self.scalar.field_type()
    }

    fn current(&self) -> Value {
        match self.items {
            // resolves to `array`, and the list branch keeps items whose key is absent
            Some(_) => Value::List(Vec::new()),
            None => self.scalar.current(),
        }
    }

    fn assign(&mut self, value: Option<Scalar>) -> Result<(), DecodeError> {
        self.scalar.assign(value)?;
        self.items = None;
        Ok(())
    }

    fn list_slot(&mut self) -> Option<&mut dyn ListSlot> {
        Some(self as &mut dyn ListSlot)
    }
}

impl ListSlot for DynUnion {
    fn element_type(&self) -> &str {
        &self.element_type
    }

    fn is_nullable(&self) -> bool {
        self.scalar.field_type.is_nullable()
    }

    fn accepts(&self, instance: &dyn Target) -> bool {
        instance.type_name() == self.element_type
    }

    fn set_null(&mut self) {
        self.items = None;
        self.scalar.value = None;
    }

    fn replace(&mut self, items: Vec<Box<dyn Target>>) -> Result<(), DecodeError> {
        self.items = Some(items);
        Ok(())
    }
}

/// Slot of a list record field. Elements are checked by type name.
pub struct DynList {
    element_type: String,
    nullable: bool,
    items: Option<Vec<Box<dyn Target>>>,
}

impl DynList {
    pub fn new(element_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            element_type: element_type.into(),
            nullable,
            items: (!nullable).then(Vec::new),
        }
    }

    /// The items, or `None` when the list is null.
    pub fn items(&self) -> Option<&[Box<dyn Target>]> {
        self.items.as_deref()
    }
}

impl ListSlot for DynList {
    fn element_type(&self) -> &str {
        &self.element_type
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn accepts(&self, instance: &dyn Target) -> bool {
        instance.type_name() == self.element_type
    }

    fn set_null(&mut self) {
        self.items = if self.nullable { None } else { Some(Vec::new()) };
    }

    fn replace(&mut self, items: Vec<Box<dyn Target>>) -> Result<(), DecodeError> {
        self.items = Some(items);
        Ok(())
    }
}

/// Slot of a nested-object record field. Starts without an instance.
pub struct DynObject {
    type_name: String,
    nullable: bool,
    instance: Option<Box<dyn Target>>,
}

impl DynObject {
    pub fn new(type_name: impl Into<String>, nullable: bool) -> Self {
        Self {
            type_name: type_name.into(),
            nullable,
            instance: None,
        }
    }

    pub fn instance(&self) -> Option<&dyn Target> {
        self.instance.as_deref()
    }
}

impl OptionalObject for DynObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn is_set(&self) -> bool {
        self.instance.is_some()
    }

    fn instance_mut(&mut self) -> Option<&mut dyn Target> {
        self.instance.as_deref_mut().map(|t| t as &mut dyn Target)
    }

    fn accepts(&self, instance: &dyn Target) -> bool {
        instance.type_name() == self.type_name
    }

    fn clear(&mut self) {
        self.instance = None;
    }

    fn install(&mut self, instance: Box<dyn Target>) -> Result<(), DecodeError> {
        self.instance = Some(instance);
        Ok(())
    }
}

/// Current content of one record field.
pub enum RecordValue {
    Scalar(DynScalar),
    /// A union with an `array` member.
    Union(DynUnion),
    List(DynList),
    Object(DynObject),
}

impl RecordValue {
    fn for_field(field: &FieldDef) -> Self {
        let nullable = field.field_type.is_nullable();
        match field.field_type.non_null() {
            FieldType::List => RecordValue::List(DynList::new(
                field.binding.element_type().unwrap_or_default(),
                nullable,
            )),
            FieldType::Object(type_name) => {
                RecordValue::Object(DynObject::new(type_name.as_str(), nullable))
            }
            FieldType::Union(kinds) if kinds.contains(Kind::Array) => {
                RecordValue::Union(DynUnion::new(
                    field.field_type.clone(),
                    field.binding.element_type().unwrap_or_default(),
                ))
            }
            _ => RecordValue::Scalar(DynScalar::new(field.field_type.clone())),
        }
    }
}

/// An instance of a [`RecordSchema`].
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<RecordValue>,
}

impl Record {
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let values = schema.fields.iter().map(RecordValue::for_field).collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&RecordValue> {
        let index = self.index_of(field)?;
        self.values.get(index)
    }

    /// The scalar held by `field`; `None` for null or non-scalar fields.
    pub fn scalar(&self, field: &str) -> Option<&Scalar> {
        match self.get(field)? {
            RecordValue::Scalar(slot) => slot.value(),
            RecordValue::Union(slot) => slot.value(),
            _ => None,
        }
    }

    /// The items of a list field; `None` for null or non-list fields.
    pub fn list(&self, field: &str) -> Option<&[Box<dyn Target>]> {
        match self.get(field)? {
            RecordValue::List(slot) => slot.items(),
            RecordValue::Union(slot) => slot.items(),
            _ => None,
        }
    }

    /// The instance held by an object field.
    pub fn object(&self, field: &str) -> Option<&dyn Target> {
        match self.get(field)? {
            RecordValue::Object(slot) => slot.instance(),
            _ => None,
        }
    }

    /// Downcast a constructed target to a record.
    pub fn from_target(target: &dyn Target) -> Option<&Record> {
        target.as_any().downcast_ref::<Record>()
    }

    fn index_of(&self, field: &str) -> Option<usize> {
        self.schema.fields.iter().position(|f| f.name() == field)
    }
}

impl Target for Record {
    fn type_name(&self) -> &str {
        &self.schema.type_name
    }

    fn bindings(&self) -> &[Binding] {
        &self.schema.bindings
    }

    fn field_mut(&mut self, field: &str) -> Option<FieldMut<'_>> {
        let index = self.index_of(field)?;
        let slot = match self.values.get_mut(index)? {
            RecordValue::Scalar(slot) => FieldMut::Scalar(slot),
            RecordValue::Union(slot) => FieldMut::Scalar(slot),
            RecordValue::List(slot) => FieldMut::List(slot),
            RecordValue::Object(slot) => FieldMut::OptionalObject(slot),
        };
        Some(slot)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format_record(self)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type_name", &self.schema.type_name)
            .finish_non_exhaustive()
    }
}

/// Format a record and everything below it, one field per line:
///
/// ```text
/// Person {
///     name: "Foo"
///     friends: [
///         Person { ... }
///     ]
/// }
/// ```
///
/// Non-record instances are shown as `<TypeName>`.
pub fn format_record(record: &Record) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_record(record, 0, &mut out)?;
    out.push('\n');
    Ok(out)
}

fn write_record(record: &Record, indent: usize, out: &mut String) -> fmt::Result {
    let pad = " ".repeat(indent + 4);
    writeln!(out, "{} {{", record.type_name())?;

    for (field, value) in record.schema.fields.iter().zip(&record.values) {
        write!(out, "{pad}{}: ", field.name())?;
        match value {
            RecordValue::Scalar(slot) => write_scalar(slot.value(), out)?,
            RecordValue::Union(slot) => match slot.items() {
                Some(items) => write_items(Some(items), indent, out)?,
                None => write_scalar(slot.value(), out)?,
            },
            RecordValue::List(slot) => write_items(slot.items(), indent, out)?,
            RecordValue::Object(slot) => match slot.instance() {
                Some(instance) => write_target(instance, indent + 4, out)?,
                None => out.push_str("null"),
            },
        }
        out.push('\n');
    }

    write!(out, "{}}}", " ".repeat(indent))
}

fn write_scalar(value: Option<&Scalar>, out: &mut String) -> fmt::Result {
    match value {
        Some(scalar) => write!(out, "{scalar}"),
        None => {
            out.push_str("null");
            Ok(())
        }
    }
}

fn write_items(items: Option<&[Box<dyn Target>]>, indent: usize, out: &mut String) -> fmt::Result {
    match items {
        None => out.push_str("null"),
        Some([]) => out.push_str("[]"),
        Some(items) => {
            out.push_str("[\n");
            for item in items {
                out.push_str(&" ".repeat(indent + 8));
                write_target(item.as_ref(), indent + 8, out)?;
                out.push('\n');
            }
            write!(out, "{}]", " ".repeat(indent + 4))?;
        }
    }
    Ok(())
}

fn write_target(target: &dyn Target, indent: usize, out: &mut String) -> fmt::Result {
    match Record::from_target(target) {
        Some(record) => write_record(record, indent, out),
        None => write!(out, "<{}>", target.type_name()),
    }
}
