//! Per-shape encode/decode overrides.
//!
//! The [`Registry`] maps a [`ShapeKey`] to an [`Override`] carrying an optional
//! encode function and an optional decode function. The encoder and decoder
//! consult it before their default behavior at every position; an override's
//! result is used verbatim.
//!
//! Overrides are grouped into [`Module`]s and registered in sequence. A later
//! module's encoder or decoder for a key replaces the earlier one; a half the
//! later module leaves empty keeps its earlier registration.
//! [`Registry::register`] replaces an entry as a whole.
//!
//! ```rust
//! use json_mapper::{json, Codec, Module, ShapeKey, Value};
//!
//! let wrap_strings = Module::new("wrap-strings").with_encoder(ShapeKey::String, |value| {
//!     Ok(json!({ "string": (value.as_str().unwrap_or_default()) }))
//! });
//!
//! let codec = Codec::builder().register_module(wrap_strings).build();
//! assert_eq!(codec.encode(&Value::from("Juan Garcia")).unwrap(), r#"{"string":"Juan Garcia"}"#);
//! ```

use crate::{Error, JsonNode, Result, ShapeKey, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type EncodeFn = Arc<dyn Fn(&Value) -> Result<JsonNode> + Send + Sync>;
pub type DecodeFn = Arc<dyn Fn(&JsonNode) -> Result<Value> + Send + Sync>;

/// An encode function, a decode function, or both, for one shape.
#[derive(Clone, Default)]
pub struct Override {
    encoder: Option<EncodeFn>,
    decoder: Option<DecodeFn>,
}

impl Override {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_encoder<F>(mut self, encode: F) -> Self
    where
        F: Fn(&Value) -> Result<JsonNode> + Send + Sync + 'static,
    {
        self.encoder = Some(Arc::new(encode));
        self
    }

    #[must_use]
    pub fn with_decoder<F>(mut self, decode: F) -> Self
    where
        F: Fn(&JsonNode) -> Result<Value> + Send + Sync + 'static,
    {
        self.decoder = Some(Arc::new(decode));
        self
    }

    #[must_use]
    pub fn encoder(&self) -> Option<&EncodeFn> {
        self.encoder.as_ref()
    }

    #[must_use]
    pub fn decoder(&self) -> Option<&DecodeFn> {
        self.decoder.as_ref()
    }

    fn merge(&mut self, other: Override) {
        if other.encoder.is_some() {
            self.encoder = other.encoder;
        }
        if other.decoder.is_some() {
            self.decoder = other.decoder;
        }
    }
}

impl fmt::Debug for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Override")
            .field("encoder", &self.encoder.is_some())
            .field("decoder", &self.decoder.is_some())
            .finish()
    }
}

/// Override lookup table. Frozen once handed to a [`Codec`](crate::Codec).
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: HashMap<ShapeKey, Override>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` under `key`, returning the entry it replaced.
    ///
    /// Replacement is whole-entry: registering only an encoder drops a
    /// previously registered decoder for the same key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::{JsonNode, Override, Registry, ShapeKey};
    ///
    /// let mut registry = Registry::new();
    /// let first = Override::new().with_encoder(|_| Ok(JsonNode::from(1)));
    /// let second = Override::new().with_encoder(|_| Ok(JsonNode::from(2)));
    /// assert!(registry.register(ShapeKey::String, first).is_none());
    /// assert!(registry.register(ShapeKey::String, second).is_some());
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn register(&mut self, key: ShapeKey, entry: Override) -> Option<Override> {
        let replaced = self.entries.insert(key.clone(), entry);
        if replaced.is_some() {
            tracing::debug!(?key, "override replaced an earlier registration");
        }
        replaced
    }

    /// Registers every entry of `module` in order, merging each into any
    /// entry already registered for its key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::{JsonNode, Module, Registry, ShapeKey, Value};
    ///
    /// let mut registry = Registry::new();
    /// registry.register_module(Module::new("write").with_encoder(ShapeKey::String, |_| Ok(JsonNode::Null)));
    /// registry.register_module(Module::new("read").with_decoder(ShapeKey::String, |_| Ok(Value::Null)));
    /// assert!(registry.encoder_for(&ShapeKey::String).is_some());
    /// assert!(registry.decoder_for(&ShapeKey::String).is_some());
    /// ```
    pub fn register_module(&mut self, module: Module) {
        tracing::debug!(module = %module.name, entries = module.entries.len(), "registering module");
        for (key, entry) in module.entries {
            match self.entries.get_mut(&key) {
                Some(existing) => {
                    tracing::debug!(?key, module = %module.name, "module merged into an earlier registration");
                    existing.merge(entry);
                }
                None => {
                    self.entries.insert(key, entry);
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &ShapeKey) -> Option<&Override> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn encoder_for(&self, key: &ShapeKey) -> Option<&EncodeFn> {
        self.entries.get(key).and_then(Override::encoder)
    }

    #[must_use]
    pub fn decoder_for(&self, key: &ShapeKey) -> Option<&DecodeFn> {
        self.entries.get(key).and_then(Override::decoder)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named bundle of overrides registered in one call.
///
/// Within a module, an encoder and a decoder added separately for the same key
/// end up in one entry.
#[derive(Clone, Debug)]
pub struct Module {
    name: String,
    entries: Vec<(ShapeKey, Override)>,
}

impl Module {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn with_override(mut self, key: ShapeKey, entry: Override) -> Self {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.merge(entry),
            None => self.entries.push((key, entry)),
        }
        self
    }

    #[must_use]
    pub fn with_encoder<F>(self, key: ShapeKey, encode: F) -> Self
    where
        F: Fn(&Value) -> Result<JsonNode> + Send + Sync + 'static,
    {
        self.with_override(key, Override::new().with_encoder(encode))
    }

    #[must_use]
    pub fn with_decoder<F>(self, key: ShapeKey, decode: F) -> Self
    where
        F: Fn(&JsonNode) -> Result<Value> + Send + Sync + 'static,
    {
        self.with_override(key, Override::new().with_decoder(decode))
    }

    /// Writes dates as ISO-8601 `"YYYY-MM-DD"` strings.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use json_mapper::{Codec, Module, Value};
    ///
    /// let codec = Codec::builder().register_module(Module::iso_dates()).build();
    /// let date = Value::from(NaiveDate::from_ymd_opt(1987, 7, 23).unwrap());
    /// assert_eq!(codec.encode(&date).unwrap(), r#""1987-07-23""#);
    /// ```
    #[must_use]
    pub fn iso_dates() -> Self {
        Module::new("iso-dates").with_encoder(ShapeKey::Date, |value| match value {
            Value::Date(date) => Ok(JsonNode::String(date.format("%Y-%m-%d").to_string())),
            other => Err(Error::custom(format!(
                "date encoder received {}",
                other.kind_name()
            ))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(n: i64) -> Override {
        Override::new().with_encoder(move |_| Ok(JsonNode::from(n)))
    }

    fn run_encoder(registry: &Registry, key: &ShapeKey) -> JsonNode {
        let encode = registry.encoder_for(key).unwrap();
        encode(&Value::Null).unwrap()
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = Registry::new();
        registry.register(ShapeKey::String, constant(1));
        registry.register(ShapeKey::String, constant(2));
        assert_eq!(run_encoder(&registry, &ShapeKey::String), JsonNode::from(2));
    }

    #[test]
    fn test_replacement_drops_the_other_half() {
        let mut registry = Registry::new();
        let both = constant(1).with_decoder(|_| Ok(Value::Null));
        registry.register(ShapeKey::String, both);
        registry.register(ShapeKey::String, constant(2));
        assert!(registry.decoder_for(&ShapeKey::String).is_none());
    }

    #[test]
    fn test_later_modules_override_earlier_ones() {
        let mut registry = Registry::new();
        registry.register_module(Module::new("first").with_override(ShapeKey::Integer, constant(1)));
        registry.register_module(Module::new("second").with_override(ShapeKey::Integer, constant(2)));
        assert_eq!(run_encoder(&registry, &ShapeKey::Integer), JsonNode::from(2));
    }

    #[test]
    fn test_modules_compose_encoder_and_decoder_halves() {
        let mut registry = Registry::new();
        registry.register_module(Module::new("write").with_override(ShapeKey::String, constant(1)));
        registry.register_module(
            Module::new("read").with_decoder(ShapeKey::String, |_| Ok(Value::from("read"))),
        );
        assert_eq!(run_encoder(&registry, &ShapeKey::String), JsonNode::from(1));
        let decode = registry.decoder_for(&ShapeKey::String).unwrap();
        assert_eq!(decode(&JsonNode::Null).unwrap(), Value::from("read"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_module_merges_halves_for_same_key() {
        let module = Module::new("strings")
            .with_encoder(ShapeKey::String, |_| Ok(JsonNode::Null))
            .with_decoder(ShapeKey::String, |_| Ok(Value::Null));
        let mut registry = Registry::new();
        registry.register_module(module);
        assert_eq!(registry.len(), 1);
        assert!(registry.encoder_for(&ShapeKey::String).is_some());
        assert!(registry.decoder_for(&ShapeKey::String).is_some());
    }

    #[test]
    fn test_override_debug_hides_closures() {
        let rendered = format!("{:?}", constant(1));
        assert_eq!(rendered, "Override { encoder: true, decoder: false }");
    }
}
