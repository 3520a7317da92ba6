use std::fmt::{Error, Result, Write as _};

use super::FieldDef;

/// Format field definitions one per line:
/// `name: { key: "source.key", type: ?int }`, plus `element: Type` for lists.
pub fn format_field_defs(fields: impl AsRef<[FieldDef]>) -> std::result::Result<String, Error> {
    let mut out = String::new();

    for field in fields.as_ref() {
        format_field(field, 0, &mut out)?;
    }

    Ok(out)
}

/// Format a named type with its fields indented below it.
pub fn format_type_def(
    type_name: &str,
    fields: impl AsRef<[FieldDef]>,
) -> std::result::Result<String, Error> {
    let mut out = String::new();
    writeln!(out, "{type_name}:")?;

    for field in fields.as_ref() {
        format_field(field, 4, &mut out)?;
    }

    Ok(out)
}

fn format_field(field: &FieldDef, indent: usize, out: &mut String) -> Result {
    let pad = " ".repeat(indent);
    write!(
        out,
        "{pad}{}: {{ key: {:?}, type: {}",
        field.binding.field, field.binding.source_key, field.field_type
    )?;
    if let Some(element) = field.binding.element_type() {
        write!(out, ", element: {element}")?;
    }
    writeln!(out, " }}")
}
