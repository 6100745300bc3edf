//! # json_mapper
//!
//! A small, strict JSON object mapper: native values to JSON text and back,
//! driven by explicit shape descriptors, with per-shape override hooks.
//!
//! ## Key Features
//!
//! - **Shape-driven decoding**: records declare their fields, construction rule
//!   and tolerance for unknown members; no reflection involved
//! - **Absent vs. null**: optional fields distinguish a missing member from an
//!   explicit `null`
//! - **Overrides**: encode/decode functions registered per shape, bundled into
//!   modules, last registration wins
//! - **Calendar dates**: `[year, month, day]` or ISO-8601, read either way
//! - **Serde bridge**: typed reads and writes for anything `Serialize` /
//!   `Deserialize` that also implements [`Shaped`]
//! - **Strict parsing**: RFC 8259 grammar with byte offset, line and column on
//!   errors
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use json_mapper::{Codec, Record, RecordShape, Shape, Value};
//!
//! let codec = Codec::new();
//!
//! let person: Value = Record::new("Person")
//!     .with_field("name", "Juan Garcia")
//!     .with_field("birthdate", NaiveDate::from_ymd_opt(1980, 9, 15).unwrap())
//!     .into();
//! let json = codec.encode(&person).unwrap();
//! assert_eq!(json, r#"{"name":"Juan Garcia","birthdate":[1980,9,15]}"#);
//!
//! let shape = RecordShape::all_args("Person")
//!     .field("name", Shape::String)
//!     .field("birthdate", Shape::Date)
//!     .build();
//! assert_eq!(codec.decode(&json, &shape).unwrap(), person);
//! ```
//!
//! ### Overrides
//!
//! ```rust
//! use json_mapper::{json, Codec, JsonNode, Module, Shape, ShapeKey, Value};
//!
//! let strings = Module::new("wrapped-strings")
//!     .with_encoder(ShapeKey::String, |value| {
//!         Ok(json!({ "string": (value.as_str().unwrap_or_default()) }))
//!     })
//!     .with_decoder(ShapeKey::String, |node| {
//!         Ok(Value::from(node.get("string").map(JsonNode::as_text).unwrap_or_default()))
//!     });
//! let codec = Codec::builder().register_module(strings).build();
//!
//! let json = codec.encode(&Value::from("Juan Garcia")).unwrap();
//! assert_eq!(json, r#"{"string":"Juan Garcia"}"#);
//! assert_eq!(codec.decode(&json, &Shape::String).unwrap(), Value::from("Juan Garcia"));
//! ```
//!
//! ### Typed values
//!
//! ```rust
//! use json_mapper::{from_str, to_string};
//!
//! let names = vec!["Juan Garcia".to_string(), "Manuel Perez".to_string()];
//! let json = to_string(&names).unwrap();
//! assert_eq!(json, r#"["Juan Garcia","Manuel Perez"]"#);
//!
//! let back: Vec<String> = from_str(&json).unwrap();
//! assert_eq!(back, names);
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events at `debug` and `trace` level (codec
//! construction, override replacement and dispatch, dropped unknown
//! properties). It never installs a subscriber.

pub mod codec;
pub mod de;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod macros;
pub mod map;
pub mod node;
pub mod options;
pub mod parser;
pub mod registry;
pub mod ser;
pub mod shape;
pub mod value;
pub mod writer;

pub use codec::{Codec, CodecBuilder};
pub use de::from_value;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Error, Path, Result, Segment};
pub use map::JsonMap;
pub use node::{JsonNode, Number};
pub use options::{CodecOptions, DateEncoding};
pub use parser::parse;
pub use registry::{DecodeFn, EncodeFn, Module, Override, Registry};
pub use ser::{to_value, ValueSerializer};
pub use shape::{Construction, Field, RecordShape, Shape, ShapeKey, Shaped};
pub use value::{Record, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serializes a typed value to compact JSON text.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use json_mapper::to_string;
///
/// let mut names = BTreeMap::new();
/// names.insert("name2".to_string(), "Manuel Perez".to_string());
/// names.insert("name1".to_string(), "Juan Garcia".to_string());
/// assert_eq!(
///     to_string(&names).unwrap(),
///     r#"{"name1":"Juan Garcia","name2":"Manuel Perez"}"#
/// );
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be captured or its dates are not ISO-8601.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize + Shaped,
{
    Codec::new().write(value)
}

/// Serializes a typed value to pretty-printed JSON text.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize + Shaped,
{
    to_string_with_options(value, CodecOptions::pretty())
}

/// Serializes a typed value with custom options and no overrides.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use json_mapper::{to_string_with_options, CodecOptions, DateEncoding};
///
/// let date = NaiveDate::from_ymd_opt(1987, 7, 23).unwrap();
/// let options = CodecOptions::new().with_date_encoding(DateEncoding::Iso8601);
/// assert_eq!(to_string_with_options(&date, options).unwrap(), r#""1987-07-23""#);
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: CodecOptions) -> Result<String>
where
    T: ?Sized + Serialize + Shaped,
{
    Codec::with_options(options).write(value)
}

/// Captures any serializable value as a JSON tree.
///
/// Without a shape, dates stay in their serde string form.
pub fn to_node<T>(value: &T) -> Result<JsonNode>
where
    T: ?Sized + Serialize,
{
    Codec::new().encode_tree(&to_value(value)?)
}

/// Serializes a typed value as compact JSON into `writer`.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize + Shaped,
{
    Codec::new().to_writer(writer, value)
}

/// Reads a typed value from JSON text with default options.
///
/// # Examples
///
/// ```rust
/// use json_mapper::{from_str, Error};
///
/// let numbers: Vec<i64> = from_str("[1980, 9, 15]").unwrap();
/// assert_eq!(numbers, vec![1980, 9, 15]);
///
/// let err = from_str::<Vec<i64>>(r#"["1980"]"#).unwrap_err();
/// assert!(matches!(err, Error::ShapeMismatch { .. }));
/// ```
///
/// # Errors
///
/// Returns an error if the text is malformed or does not match `T`'s shape.
pub fn from_str<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned + Shaped,
{
    Codec::new().read(text)
}

/// Reads a typed value from UTF-8 bytes.
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned + Shaped,
{
    let text = std::str::from_utf8(bytes).map_err(|e| Error::custom(e.to_string()))?;
    from_str(text)
}

/// Reads a typed value from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading fails, the text is malformed, or it does not
/// match `T`'s shape.
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned + Shaped,
{
    Codec::new().from_reader(reader)
}
