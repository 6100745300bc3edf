//! The public entry point.
//!
//! A [`Codec`] pairs a frozen [`Registry`] with [`CodecOptions`]. It is cheap to
//! clone and safe to share across threads; build it once with [`CodecBuilder`]
//! and reuse it.
//!
//! ```rust
//! use json_mapper::{Codec, CodecOptions, RecordShape, Shape};
//!
//! let codec = Codec::builder()
//!     .options(CodecOptions::new().with_fail_on_unknown_properties(false))
//!     .build();
//!
//! let shape = RecordShape::no_args("PersonEC")
//!     .field("name", Shape::String)
//!     .field("birthdate", Shape::Date)
//!     .build();
//! let json = r#"{"name":"Juan Garcia","birthdate":[1980,9,15],"hobbies":["football","squash"]}"#;
//! let person = codec.decode(json, &shape).unwrap();
//! assert!(person.get("hobbies").is_none());
//! ```

use crate::parser::Parser;
use crate::ser::{conform, to_value};
use crate::{
    de::from_value, writer, CodecOptions, Decoder, Encoder, Error, JsonNode, Module, Override,
    Registry, Result, Shape, ShapeKey, Shaped, Value,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::sync::Arc;

struct Inner {
    registry: Registry,
    options: CodecOptions,
}

/// Encodes and decodes JSON with a fixed set of overrides and options.
#[derive(Clone)]
pub struct Codec {
    inner: Arc<Inner>,
}

impl Default for Codec {
    fn default() -> Self {
        Codec::new()
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("overrides", &self.inner.registry.len())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl Codec {
    /// A codec with default options and no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(CodecOptions::default())
    }

    #[must_use]
    pub fn with_options(options: CodecOptions) -> Self {
        Codec {
            inner: Arc::new(Inner {
                registry: Registry::new(),
                options,
            }),
        }
    }

    #[must_use]
    pub fn builder() -> CodecBuilder {
        CodecBuilder::default()
    }

    #[must_use]
    pub fn options(&self) -> &CodecOptions {
        &self.inner.options
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.inner.registry, &self.inner.options)
    }

    fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.inner.registry, &self.inner.options)
    }

    /// Encodes a native value into a JSON tree.
    pub fn encode_tree(&self, value: &Value) -> Result<JsonNode> {
        self.encoder().encode(value)
    }

    /// Encodes a native value into JSON text, compact unless the options ask
    /// for pretty output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::{Codec, Value};
    ///
    /// let codec = Codec::new();
    /// let names = Value::from(vec!["Juan Garcia", "Manuel Perez"]);
    /// assert_eq!(codec.encode(&names).unwrap(), r#"["Juan Garcia","Manuel Perez"]"#);
    /// ```
    pub fn encode(&self, value: &Value) -> Result<String> {
        let tree = self.encode_tree(value)?;
        Ok(self.render(&tree))
    }

    /// Renders a JSON tree with this codec's output options.
    #[must_use]
    pub fn render(&self, tree: &JsonNode) -> String {
        if self.inner.options.pretty {
            writer::to_pretty_string(tree, self.inner.options.indent)
        } else {
            writer::to_compact_string(tree)
        }
    }

    /// Parses JSON text into a generic tree, without any shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::Codec;
    ///
    /// let tree = Codec::new().decode_tree(r#"[{"string":"Juan Garcia"}]"#).unwrap();
    /// assert_eq!(tree.find_values_as_text("string"), vec!["Juan Garcia"]);
    /// ```
    pub fn decode_tree(&self, text: &str) -> Result<JsonNode> {
        Parser::new(text, self.inner.options.max_depth).parse_document()
    }

    /// Parses JSON text and decodes it against `shape`.
    pub fn decode(&self, text: &str, shape: &Shape) -> Result<Value> {
        let tree = self.decode_tree(text)?;
        self.decode_node(&tree, shape)
    }

    /// Decodes an already parsed tree against `shape`.
    pub fn decode_node(&self, tree: &JsonNode, shape: &Shape) -> Result<Value> {
        self.decoder().decode(tree, shape)
    }

    /// Writes a typed value as JSON text, using its [`Shaped`] shape to restore
    /// dates and record names lost in serde's data model.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use serde::Serialize;
    /// use json_mapper::{Codec, RecordShape, Shape, Shaped};
    ///
    /// #[derive(Serialize)]
    /// struct Person {
    ///     name: String,
    ///     birthdate: NaiveDate,
    /// }
    ///
    /// impl Shaped for Person {
    ///     fn shape() -> Shape {
    ///         RecordShape::all_args("Person")
    ///             .field("name", Shape::String)
    ///             .field("birthdate", Shape::Date)
    ///             .build()
    ///     }
    /// }
    ///
    /// let person = Person {
    ///     name: "Juan Garcia".into(),
    ///     birthdate: NaiveDate::from_ymd_opt(1980, 9, 15).unwrap(),
    /// };
    /// let json = Codec::new().write(&person).unwrap();
    /// assert_eq!(json, r#"{"name":"Juan Garcia","birthdate":[1980,9,15]}"#);
    /// ```
    pub fn write<T>(&self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize + Shaped,
    {
        let tree = self.write_tree(value)?;
        Ok(self.render(&tree))
    }

    pub fn write_tree<T>(&self, value: &T) -> Result<JsonNode>
    where
        T: ?Sized + Serialize + Shaped,
    {
        let captured = conform(to_value(value)?, &T::shape())?;
        self.encode_tree(&captured)
    }

    /// Reads a typed value from JSON text, decoding against its [`Shaped`] shape.
    pub fn read<T>(&self, text: &str) -> Result<T>
    where
        T: DeserializeOwned + Shaped,
    {
        self.read_as(text, &T::shape())
    }

    /// Reads a typed value from JSON text, decoding against an explicit shape.
    pub fn read_as<T>(&self, text: &str, shape: &Shape) -> Result<T>
    where
        T: DeserializeOwned,
    {
        from_value(self.decode(text, shape)?)
    }

    pub fn to_writer<W, T>(&self, mut writer: W, value: &T) -> Result<()>
    where
        W: io::Write,
        T: ?Sized + Serialize + Shaped,
    {
        let text = self.write(value)?;
        writer
            .write_all(text.as_bytes())
            .map_err(|e| Error::io(&e.to_string()))
    }

    pub fn from_reader<R, T>(&self, mut reader: R) -> Result<T>
    where
        R: io::Read,
        T: DeserializeOwned + Shaped,
    {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| Error::io(&e.to_string()))?;
        self.read(&text)
    }
}

/// Collects options and overrides, then freezes them into a [`Codec`].
#[derive(Debug, Default)]
pub struct CodecBuilder {
    registry: Registry,
    options: CodecOptions,
}

impl CodecBuilder {
    #[must_use]
    pub fn options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers one override; a later registration for the same key wins.
    #[must_use]
    pub fn with_override(mut self, key: ShapeKey, entry: Override) -> Self {
        self.registry.register(key, entry);
        self
    }

    #[must_use]
    pub fn register_module(mut self, module: Module) -> Self {
        self.registry.register_module(module);
        self
    }

    #[must_use]
    pub fn build(self) -> Codec {
        tracing::debug!(
            overrides = self.registry.len(),
            pretty = self.options.pretty,
            fail_on_unknown_properties = self.options.fail_on_unknown_properties,
            date_encoding = ?self.options.date_encoding,
            "codec built"
        );
        Codec {
            inner: Arc::new(Inner {
                registry: self.registry,
                options: self.options,
            }),
        }
    }
}
