//! Declared field types and binding tables.

mod format;
mod types;

pub use format::{format_field_defs, format_type_def};
pub use types::{Binding, FieldDef, FieldDefs, FieldType, Kind, KindSet, ScalarKind};
