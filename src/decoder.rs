//! JSON tree to native value, driven by a [`Shape`].
//!
//! The rules for records, in the order they apply:
//!
//! 1. Members with no declared field are checked first, in document order.
//!    They fail with [`Error::UnknownProperty`] when the codec is strict and the
//!    record does not ignore unknowns; otherwise they are dropped.
//! 2. A present member is decoded against its field shape.
//! 3. A missing optional field becomes the absent marker.
//! 4. A missing field of a [`Construction::NoArgs`] record keeps its type default.
//! 5. A missing required field of a [`Construction::AllArgs`] record fails with
//!    [`Error::RequiredFieldMissing`]; a missing non-required one becomes `null`.

use crate::{
    CodecOptions, Construction, Error, JsonNode, Number, Path, Record, RecordShape, Registry,
    Result, Shape, Value,
};
use chrono::NaiveDate;
use indexmap::IndexMap;
use num_bigint::BigInt;

/// Decodes JSON trees against shapes, consulting the registry at every position.
pub struct Decoder<'a> {
    registry: &'a Registry,
    options: &'a CodecOptions,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a Registry, options: &'a CodecOptions) -> Self {
        Decoder { registry, options }
    }

    pub fn decode(&self, node: &JsonNode, shape: &Shape) -> Result<Value> {
        let mut path = Path::root();
        self.decode_at(node, shape, &mut path)
    }

    fn decode_at(&self, node: &JsonNode, shape: &Shape, path: &mut Path) -> Result<Value> {
        if let Some(key) = shape.key() {
            if let Some(decode) = self.registry.decoder_for(&key) {
                tracing::trace!(%path, ?key, "dispatching decode override");
                return decode(node);
            }
        }

        match shape {
            Shape::Any => Ok(Value::from_node(node)),
            Shape::Bool => node
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| mismatch(path, shape, node)),
            Shape::Integer => match node {
                JsonNode::Number(Number::Integer(i)) => Ok(Value::Integer(*i)),
                JsonNode::Number(Number::BigInt(_)) => Err(Error::shape_mismatch(
                    path,
                    "integer in 64-bit range",
                    "big integer",
                )),
                _ => Err(mismatch(path, shape, node)),
            },
            Shape::IntegerRange { min, max } => {
                let n = match node {
                    JsonNode::Number(Number::Integer(i)) => Some(i128::from(*i)),
                    JsonNode::Number(Number::BigInt(bi)) => i128::try_from(bi).ok(),
                    _ => return Err(mismatch(path, shape, node)),
                };
                match n {
                    Some(n) if (*min..=*max).contains(&n) => Ok(i64::try_from(n)
                        .map_or_else(|_| Value::BigInt(BigInt::from(n)), Value::Integer)),
                    _ => Err(Error::shape_mismatch(
                        path,
                        &format!("integer in range {}..={}", min, max),
                        &format!("integer {}", node),
                    )),
                }
            }
            Shape::BigInteger => match node {
                JsonNode::Number(Number::Integer(i)) => Ok(Value::Integer(*i)),
                JsonNode::Number(Number::BigInt(bi)) => Ok(Value::BigInt(bi.clone())),
                _ => Err(mismatch(path, shape, node)),
            },
            Shape::Float => match node {
                JsonNode::Number(n) => Ok(Value::Float(n.as_f64())),
                _ => Err(mismatch(path, shape, node)),
            },
            Shape::String => match node {
                JsonNode::String(s) => Ok(Value::String(s.clone())),
                _ => Err(mismatch(path, shape, node)),
            },
            Shape::Date => decode_date(node, path),
            Shape::Sequence(element) => {
                let arr = node.as_array().ok_or_else(|| mismatch(path, shape, node))?;
                let mut values = Vec::with_capacity(arr.len());
                for (i, item) in arr.iter().enumerate() {
                    path.push_index(i);
                    let decoded = self.decode_at(item, element, path);
                    path.pop();
                    values.push(decoded?);
                }
                Ok(Value::Sequence(values))
            }
            Shape::Mapping(member_shape) => {
                let obj = node.as_object().ok_or_else(|| mismatch(path, shape, node))?;
                let mut values = IndexMap::with_capacity(obj.len());
                for (key, member) in obj {
                    path.push_key(key);
                    let decoded = self.decode_at(member, member_shape, path);
                    path.pop();
                    values.insert(key.clone(), decoded?);
                }
                Ok(Value::Mapping(values))
            }
            Shape::Optional(inner) => match node {
                JsonNode::Null if inner.accepts_null() => Ok(Value::present(Value::Null)),
                JsonNode::Null => Ok(Value::absent()),
                _ => Ok(Value::present(self.decode_at(node, inner, path)?)),
            },
            Shape::Nullable(inner) => match node {
                JsonNode::Null => Ok(Value::Null),
                _ => self.decode_at(node, inner, path),
            },
            Shape::Record(record) => self.decode_record(node, record, path),
            Shape::Lazy(resolve) => self.decode_at(node, &resolve(), path),
        }
    }

    fn decode_record(&self, node: &JsonNode, record: &RecordShape, path: &mut Path) -> Result<Value> {
        let obj = match node {
            JsonNode::Object(obj) => obj,
            other => return Err(Error::shape_mismatch(path, "object", other.kind_name())),
        };

        let strict = self.options.fail_on_unknown_properties && !record.ignore_unknown;
        for key in obj.keys() {
            if record.get(key).is_some() {
                continue;
            }
            if strict {
                return Err(Error::unknown_property(path, key));
            }
            tracing::debug!(record = %record.name, property = %key, %path, "dropping unknown property");
        }

        let mut fields = IndexMap::with_capacity(record.fields.len());
        for field in &record.fields {
            let value = match obj.get(&field.name) {
                Some(member) => {
                    path.push_key(&field.name);
                    let decoded = self.decode_at(member, &field.shape, path);
                    path.pop();
                    decoded?
                }
                None if field.shape.is_optional() => Value::absent(),
                None => match record.construction {
                    Construction::NoArgs => field.shape.default_value(),
                    Construction::AllArgs if field.required => {
                        return Err(Error::required_field_missing(path, &field.name));
                    }
                    Construction::AllArgs => Value::Null,
                },
            };
            fields.insert(field.name.clone(), value);
        }

        Ok(Value::Record(Record {
            name: record.name.clone(),
            fields,
        }))
    }
}

fn mismatch(path: &Path, shape: &Shape, node: &JsonNode) -> Error {
    Error::shape_mismatch(path, shape.kind_name(), node.kind_name())
}

/// Accepts `[year, month, day]` or `"YYYY-MM-DD"`.
fn decode_date(node: &JsonNode, path: &Path) -> Result<Value> {
    match node {
        JsonNode::Array(parts) => {
            let [year, month, day] = parts.as_slice() else {
                return Err(Error::invalid_date(
                    path,
                    &format!("expected [year, month, day], found {} elements", parts.len()),
                ));
            };
            let component = |part: &JsonNode, name: &str| {
                part.as_i64()
                    .ok_or_else(|| Error::invalid_date(path, &format!("{} must be an integer", name)))
            };
            let (y, m, d) = (
                component(year, "year")?,
                component(month, "month")?,
                component(day, "day")?,
            );
            let date = match (i32::try_from(y), u32::try_from(m), u32::try_from(d)) {
                (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
                _ => None,
            };
            date.map(Value::Date).ok_or_else(|| {
                Error::invalid_date(path, &format!("{}-{}-{} is not a calendar date", y, m, d))
            })
        }
        JsonNode::String(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|e| Error::invalid_date(path, &format!("`{}`: {}", text, e))),
        other => Err(Error::shape_mismatch(path, "date", other.kind_name())),
    }
}
