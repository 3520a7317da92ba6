//! Dotted-path key lookup into nested source mappings.
//!
//! `"stats.hits"` resolves `hits` inside the mapping found at `stats`. Every
//! intermediate segment must resolve to a mapping; anything else fails with
//! [`DecodeErrorKind::PathSegmentMissing`]. Only the final segment may be
//! absent.

use crate::{
    error::{DecodeError, DecodeErrorKind},
    value::Value,
};

/// Resolve `key` against `data`, returning `default` when the final segment is
/// absent.
///
/// Callers pass the field's current value as `default`, so a missing source
/// key leaves the field as it was.
pub fn lookup_value<'a>(
    data: &'a Value,
    key: &str,
    default: &'a Value,
) -> Result<&'a Value, DecodeError> {
    Ok(find_value(data, key)?.unwrap_or(default))
}

/// Resolve `key` against `data`; `None` when the final segment is absent.
pub fn find_value<'a>(data: &'a Value, key: &str) -> Result<Option<&'a Value>, DecodeError> {
    let mut current = data;
    let mut rest = key;

    while let Some((head, tail)) = rest.split_once('.') {
        current = match current.get(head) {
            Some(next @ Value::Map(_)) => next,
            _ => {
                return Err(DecodeErrorKind::PathSegmentMissing {
                    segment: head.to_string(),
                    key: key.to_string(),
                }
                .into());
            }
        };
        rest = tail;
    }

    Ok(current.get(rest))
}
