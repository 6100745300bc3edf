//! Native value to JSON tree.

use crate::{CodecOptions, DateEncoding, Error, JsonMap, JsonNode, Path, Registry, Result, Value};
use chrono::Datelike;

/// Walks a [`Value`], consulting the registry at every position.
pub struct Encoder<'a> {
    registry: &'a Registry,
    options: &'a CodecOptions,
}

impl<'a> Encoder<'a> {
    pub fn new(registry: &'a Registry, options: &'a CodecOptions) -> Self {
        Encoder { registry, options }
    }

    /// Encodes `value` into a JSON tree.
    ///
    /// Fails with [`Error::CyclicReference`] when nesting exceeds the
    /// configured maximum depth.
    pub fn encode(&self, value: &Value) -> Result<JsonNode> {
        let mut path = Path::root();
        self.encode_at(value, &mut path)
    }

    fn encode_at(&self, value: &Value, path: &mut Path) -> Result<JsonNode> {
        if path.depth() > self.options.max_depth {
            return Err(Error::cyclic_reference(path));
        }

        if let Some(key) = value.shape_key() {
            if let Some(encode) = self.registry.encoder_for(&key) {
                tracing::trace!(%path, ?key, "dispatching encode override");
                return encode(value);
            }
        }

        match value {
            Value::Null | Value::Optional(None) => Ok(JsonNode::Null),
            Value::Optional(Some(inner)) => self.encode_at(inner, path),
            Value::Bool(b) => Ok(JsonNode::Bool(*b)),
            Value::Integer(i) => Ok(JsonNode::from(*i)),
            Value::BigInt(bi) => Ok(JsonNode::from(bi.clone())),
            Value::Float(f) => Ok(JsonNode::from(*f)),
            Value::String(s) => Ok(JsonNode::String(s.clone())),
            Value::Date(date) => Ok(match self.options.date_encoding {
                DateEncoding::Array => JsonNode::Array(vec![
                    JsonNode::from(date.year()),
                    JsonNode::from(date.month()),
                    JsonNode::from(date.day()),
                ]),
                DateEncoding::Iso8601 => JsonNode::String(date.format("%Y-%m-%d").to_string()),
            }),
            Value::Sequence(seq) => {
                let mut elements = Vec::with_capacity(seq.len());
                for (i, element) in seq.iter().enumerate() {
                    path.push_index(i);
                    let encoded = self.encode_at(element, path);
                    path.pop();
                    elements.push(encoded?);
                }
                Ok(JsonNode::Array(elements))
            }
            Value::Mapping(map) => {
                let mut obj = JsonMap::with_capacity(map.len());
                for (key, member) in map {
                    path.push_key(key);
                    let encoded = self.encode_at(member, path);
                    path.pop();
                    obj.insert(key.clone(), encoded?);
                }
                Ok(JsonNode::Object(obj))
            }
            Value::Record(record) => {
                let mut obj = JsonMap::with_capacity(record.fields.len());
                for (name, field) in &record.fields {
                    if field.is_absent() {
                        continue;
                    }
                    path.push_key(name);
                    let encoded = self.encode_at(field, path);
                    path.pop();
                    obj.insert(name.clone(), encoded?);
                }
                Ok(JsonNode::Object(obj))
            }
        }
    }
}
