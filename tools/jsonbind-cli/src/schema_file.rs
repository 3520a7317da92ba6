//! JSON schema files describing record types.
//!
//! ```json
//! {
//!   "root": "Person",
//!   "types": [
//!     {
//!       "name": "Person",
//!       "fields": [
//!         { "name": "name", "type": "string", "key": "first_name" },
//!         { "name": "friends", "type": "?list", "element": "Person" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use jsonbind::{Decoder, FieldDef, FieldType, RecordSchema};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Type decoded when `--root` is not given; defaults to the first type.
    #[serde(default)]
    pub root: Option<String>,
    pub types: Vec<TypeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    /// Source key; the field name when absent.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub element: Option<String>,
}

impl SchemaFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read schema {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid schema {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let schema: SchemaFile = serde_json::from_str(text)?;
        if schema.types.is_empty() {
            bail!("schema defines no types");
        }
        Ok(schema)
    }

    /// The type to decode into: `requested`, else `root`, else the first type.
    pub fn root_type<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str> {
        let name = requested
            .or(self.root.as_deref())
            .or_else(|| self.types.first().map(|t| t.name.as_str()))
            .ok_or_else(|| anyhow!("schema defines no types"))?;

        if !self.types.iter().any(|t| t.name == name) {
            bail!("root type '{name}' is not defined in the schema");
        }
        Ok(name)
    }

    pub fn records(&self) -> Result<Vec<RecordSchema>> {
        self.types.iter().map(TypeSpec::to_record).collect()
    }

    /// A decoder with every type of the file registered.
    pub fn decoder(&self) -> Result<Decoder> {
        let builder = self
            .records()?
            .into_iter()
            .fold(Decoder::builder(), |builder, record| {
                builder.with_record(record)
            });
        let decoder = builder.build();
        debug!(types = ?decoder.registry().type_names(), "registered schema types");
        Ok(decoder)
    }
}

impl TypeSpec {
    fn to_record(&self) -> Result<RecordSchema> {
        let fields = self
            .fields
            .iter()
            .map(|spec| spec.to_field_def(&self.name))
            .collect::<Result<Vec<_>>>()?;
        Ok(RecordSchema::new(self.name.clone(), fields)?)
    }
}

impl FieldSpec {
    fn to_field_def(&self, type_name: &str) -> Result<FieldDef> {
        let field_type: FieldType = self
            .field_type
            .parse()
            .with_context(|| format!("field '{}' of '{type_name}'", self.name))?;

        let mut field = FieldDef::new(&self.name, field_type);
        if let Some(key) = &self.key {
            field = field.with_key(key);
        }
        if let Some(element) = &self.element {
            field = field.with_element_type(element);
        }
        Ok(field)
    }
}
