//! Error types for the decode layer.

use std::fmt;

use crate::{schema::KindSet, value::Shape};

/// Error returned when a field type string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field type '{input}': {reason}")]
pub struct ParseFieldTypeError {
    pub input: String,
    pub reason: &'static str,
}

impl ParseFieldTypeError {
    pub(crate) fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// What went wrong while decoding a field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeErrorKind {
    /// A list-typed field was bound without an element type.
    #[error("no type specified for array unmarshalling of field '{field}'")]
    MissingElementType { field: String },

    /// The value's runtime shape matches none of the union's member kinds.
    #[error("{shape} value matches none of the union members {candidates}")]
    UnionTypeMismatch { shape: Shape, candidates: KindSet },

    /// The value is a mapping or opaque blob where a scalar, list or null was expected.
    #[error("unsupported runtime shape {shape} for union members {candidates}")]
    UnsupportedRuntimeShape { shape: Shape, candidates: KindSet },

    /// An element or nested object type could not be instantiated.
    #[error("cannot construct type '{type_name}': {reason}")]
    TypeConstruction { type_name: String, reason: String },

    /// An intermediate segment of a dotted key is absent or not a mapping.
    #[error("segment '{segment}' of key '{key}' does not resolve to a mapping")]
    PathSegmentMissing { segment: String, key: String },

    /// A list, mapping or blob cannot be converted to the declared kind.
    #[error("cannot convert {shape} value to {expected}")]
    Coercion { expected: &'static str, shape: Shape },

    /// A field slot refused a value of the kind it declared.
    #[error("field declared as {declared} cannot hold {actual}")]
    SlotMismatch { declared: String, actual: String },
}

/// A step in the path from the decode root to the failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{name}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Error returned by the decoder, annotated with the field path it occurred at.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}{kind}", path_prefix(.path))]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub path: Vec<PathSegment>,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Prepend a path segment; called while unwinding from the failing field.
    pub fn at(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    /// Render the path as `.team.members[1].age`.
    pub fn path_string(&self) -> String {
        self.path.iter().map(ToString::to_string).collect()
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        Self::new(kind)
    }
}

fn path_prefix(path: &[PathSegment]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        let rendered: String = path.iter().map(ToString::to_string).collect();
        format!("at {rendered}: ")
    }
}
