use std::{
    borrow::Cow,
    fmt::{self, Display, Formatter},
    ops::Deref,
    str::FromStr,
};

use crate::error::ParseFieldTypeError;

/// Scalar kinds a field can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    String,
    Bool,
    Float,
}

impl ScalarKind {
    pub const fn kind(self) -> Kind {
        match self {
            ScalarKind::Int => Kind::Int,
            ScalarKind::String => Kind::String,
            ScalarKind::Bool => Kind::Bool,
            ScalarKind::Float => Kind::Float,
        }
    }

    pub fn name(self) -> &'static str {
        self.kind().name()
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Member kinds of a union-typed field.
///
/// Members are disjoint by runtime shape, so at most one can match a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    String,
    Bool,
    Float,
    Array,
    Null,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Int,
        Kind::String,
        Kind::Bool,
        Kind::Float,
        Kind::Array,
        Kind::Null,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::String => "string",
            Kind::Bool => "bool",
            Kind::Float => "float",
            Kind::Array => "array",
            Kind::Null => "null",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Kind::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn scalar(self) -> Option<ScalarKind> {
        match self {
            Kind::Int => Some(ScalarKind::Int),
            Kind::String => Some(ScalarKind::String),
            Kind::Bool => Some(ScalarKind::Bool),
            Kind::Float => Some(ScalarKind::Float),
            Kind::Array | Kind::Null => None,
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of union member kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KindSet(u8);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);

    pub const fn of(kinds: &[Kind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        KindSet(bits)
    }

    pub const fn with(self, kind: Kind) -> Self {
        KindSet(self.0 | kind.bit())
    }

    pub const fn union(self, other: KindSet) -> Self {
        KindSet(self.0 | other.0)
    }

    pub const fn contains(self, kind: Kind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn is_nullable(self) -> bool {
        self.contains(Kind::Null)
    }

    pub fn iter(self) -> impl Iterator<Item = Kind> {
        Kind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl Display for KindSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(kind.name())?;
        }
        Ok(())
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "KindSet({self})")
    }
}

/// Declared type of a target field, derived from the Rust type of its slot.
///
/// The text form (`Display` / `FromStr`) is `int`, `string`, `bool`, `float`,
/// `list` or a type name, with a leading `?` for nullable and `|`-separated
/// member kinds for unions (`int|string|null`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(ScalarKind),
    Nullable(Box<FieldType>),
    Union(KindSet),
    List,
    Object(String),
}

impl FieldType {
    pub fn nullable(inner: FieldType) -> Self {
        FieldType::Nullable(Box::new(inner))
    }

    pub fn object(type_name: impl Into<String>) -> Self {
        FieldType::Object(type_name.into())
    }

    /// Whether `null` is an admissible value.
    pub fn is_nullable(&self) -> bool {
        match self {
            FieldType::Nullable(_) => true,
            FieldType::Union(kinds) => kinds.is_nullable(),
            _ => false,
        }
    }

    /// The type with any nullable wrapper removed.
    pub fn non_null(&self) -> &FieldType {
        match self {
            FieldType::Nullable(inner) => inner.non_null(),
            other => other,
        }
    }

    /// Whether a scalar of `kind` is a valid value for this type.
    pub fn admits(&self, kind: ScalarKind) -> bool {
        match self.non_null() {
            FieldType::Scalar(declared) => *declared == kind,
            FieldType::Union(kinds) => kinds.contains(kind.kind()),
            _ => false,
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(kind) => f.write_str(kind.name()),
            FieldType::Nullable(inner) => write!(f, "?{inner}"),
            FieldType::Union(kinds) => write!(f, "{kinds}"),
            FieldType::List => f.write_str("list"),
            FieldType::Object(name) => f.write_str(name),
        }
    }
}

impl FromStr for FieldType {
    type Err = ParseFieldTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();

        if let Some(inner) = text.strip_prefix('?') {
            return match inner.parse::<FieldType>()? {
                FieldType::Nullable(_) | FieldType::Union(_) => Err(ParseFieldTypeError::new(
                    s,
                    "only scalar, list and object types can be marked nullable",
                )),
                inner => Ok(FieldType::nullable(inner)),
            };
        }

        if text.contains('|') {
            let mut kinds = KindSet::EMPTY;
            for member in text.split('|') {
                let kind = Kind::from_name(member.trim())
                    .ok_or_else(|| ParseFieldTypeError::new(s, "unknown union member kind"))?;
                if kinds.contains(kind) {
                    return Err(ParseFieldTypeError::new(s, "duplicate union member kind"));
                }
                kinds = kinds.with(kind);
            }
            return Ok(FieldType::Union(kinds));
        }

        match text {
            "int" => Ok(FieldType::Scalar(ScalarKind::Int)),
            "string" => Ok(FieldType::Scalar(ScalarKind::String)),
            "bool" => Ok(FieldType::Scalar(ScalarKind::Bool)),
            "float" => Ok(FieldType::Scalar(ScalarKind::Float)),
            "list" => Ok(FieldType::List),
            name if is_type_name(name) => Ok(FieldType::object(name)),
            _ => Err(ParseFieldTypeError::new(s, "not a type name")),
        }
    }
}

fn is_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == ':')
}

/// Link between a target field and the source key that supplies its value.
///
/// `source_key` may contain `.` separators for nested lookups. List fields
/// name the type instantiated per item in `element_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub field: Cow<'static, str>,
    pub source_key: Cow<'static, str>,
    pub element_type: Option<Cow<'static, str>>,
}

impl Binding {
    pub const fn declare(
        field: &'static str,
        source_key: &'static str,
        element_type: Option<&'static str>,
    ) -> Self {
        Self {
            field: Cow::Borrowed(field),
            source_key: Cow::Borrowed(source_key),
            element_type: match element_type {
                Some(name) => Some(Cow::Borrowed(name)),
                None => None,
            },
        }
    }

    pub fn owned(
        field: impl Into<String>,
        source_key: impl Into<String>,
        element_type: Option<String>,
    ) -> Self {
        Self {
            field: Cow::Owned(field.into()),
            source_key: Cow::Owned(source_key.into()),
            element_type: element_type.map(Cow::Owned),
        }
    }

    /// The element type, treating an empty name as absent.
    pub fn element_type(&self) -> Option<&str> {
        self.element_type.as_deref().filter(|name| !name.is_empty())
    }
}

/// A bound field together with its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub binding: Binding,
    pub field_type: FieldType,
}

impl FieldDef {
    /// A field bound to the source key of the same name.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            binding: Binding::owned(name.clone(), name, None),
            field_type,
        }
    }

    pub fn with_key(mut self, source_key: impl Into<String>) -> Self {
        self.binding.source_key = Cow::Owned(source_key.into());
        self
    }

    pub fn with_element_type(mut self, element_type: impl Into<String>) -> Self {
        self.binding.element_type = Some(Cow::Owned(element_type.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.binding.field
    }
}

/// Typed collection of [`FieldDef`] describing one target type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDefs(pub Vec<FieldDef>);

impl FieldDefs {
    pub fn as_slice(&self) -> &[FieldDef] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.0.iter().find(|f| f.name() == name)
    }
}

impl From<Vec<FieldDef>> for FieldDefs {
    fn from(value: Vec<FieldDef>) -> Self {
        Self(value)
    }
}

impl From<FieldDefs> for Vec<FieldDef> {
    fn from(value: FieldDefs) -> Self {
        value.0
    }
}

impl AsRef<[FieldDef]> for FieldDefs {
    fn as_ref(&self) -> &[FieldDef] {
        self.as_slice()
    }
}

impl Deref for FieldDefs {
    type Target = [FieldDef];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl Display for FieldDefs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = super::format_field_defs(self.as_slice())?;
        f.write_str(&text)
    }
}
