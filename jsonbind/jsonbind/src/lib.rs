//! Recursive decoder that populates bound targets from a [`Value`] tree.
//!
//! ```
//! use jsonbind::{Decoder, Value, bind};
//!
//! #[derive(Debug, Default)]
//! struct Counter {
//!     hits: i64,
//! }
//!
//! bind! {
//!     impl Counter as "Counter" {
//!         hits: scalar("stats.hits"),
//!     }
//! }
//!
//! let data = Value::map([("stats", Value::map([("hits", Value::Int(7))]))]);
//! let mut counter = Counter::default();
//! Decoder::new().decode(&mut counter, &data).unwrap();
//! assert_eq!(counter.hits, 7);
//! ```

mod aggregate;
mod coerce;
mod decoder;
mod record;
mod registry;
mod resolve;

pub use coerce::coerce_scalar;
pub use decoder::{Decoder, DecoderBuilder};
pub use jsonbind_core as core;
pub use jsonbind_core::{
    Binding, DecodeError, DecodeErrorKind, FieldDef, FieldDefs, FieldType, Kind, KindSet,
    PathSegment, Scalar, ScalarKind, Shape, Target, TargetType, Value, bind, scalar_union,
};
pub use record::{
    DynList, DynObject, DynScalar, DynUnion, Record, RecordSchema, RecordSchemaError,
    RecordValue, format_record,
};
pub use registry::TypeRegistry;
pub use resolve::{detect_kind, resolve_kind};
