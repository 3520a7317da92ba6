//! JSON front end for `jsonbind`.
//!
//! Parses JSON text with `serde_json`, converts it into the decoder's
//! [`Value`](jsonbind::Value) tree and decodes it into a target.

mod convert;
mod error;
mod policy;

use jsonbind::{Decoder, Target};
use serde_json::Value as JsonValue;

pub use convert::{json_to_value, json_to_value_with_policy, parse_value, parse_value_with_policy};
pub use error::JsonError;
pub use policy::NumberPolicy;

/// Parse `text` and decode it into `target`.
pub fn decode_json_str(
    decoder: &Decoder,
    target: &mut dyn Target,
    text: &str,
) -> Result<(), JsonError> {
    let value = parse_value(text)?;
    decoder.decode(target, &value)?;
    Ok(())
}

/// Decode an already parsed JSON document into `target`.
pub fn decode_json_value(
    decoder: &Decoder,
    target: &mut dyn Target,
    json: &JsonValue,
) -> Result<(), JsonError> {
    let value = json_to_value(json)?;
    decoder.decode(target, &value)?;
    Ok(())
}
