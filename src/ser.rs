//! Serde bridge: `T: Serialize` to [`Value`].
//!
//! [`ValueSerializer`] captures any serializable type as a native value:
//! structs become named [`Record`]s, `Option` becomes the three-state
//! optional, maps become mappings in iteration order.
//!
//! Serde has no notion of a calendar date, so types like `chrono::NaiveDate`
//! arrive as strings. [`conform`] walks the captured value alongside a
//! [`Shape`] and restores dates and record names before encoding.
//!
//! ```rust
//! use serde::Serialize;
//! use json_mapper::{to_value, Value};
//!
//! #[derive(Serialize)]
//! struct PersonName {
//!     name: String,
//! }
//!
//! let value = to_value(&PersonName { name: "Juan Garcia".into() }).unwrap();
//! let record = value.as_record().unwrap();
//! assert_eq!(record.name, "PersonName");
//! assert_eq!(record.get("name"), Some(&Value::from("Juan Garcia")));
//! ```

use crate::{Error, Record, Result, Shape, Value};
use chrono::NaiveDate;
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::ser::{self, Serialize};

/// Captures a serializable value as a native [`Value`].
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serializer producing [`Value`]s.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    /// Set for tuple variants, which wrap the sequence in a one-member mapping.
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: IndexMap<String, Value>,
    current_key: Option<String>,
}

pub struct SerializeRecord {
    record: Record,
    /// Set for struct variants, which wrap the record in a one-member mapping.
    variant: Option<&'static str>,
}

fn tagged(variant: &'static str, value: Value) -> Value {
    let mut map = IndexMap::with_capacity(1);
    map.insert(variant.to_string(), value);
    Value::Mapping(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeRecord;
    type SerializeStructVariant = SerializeRecord;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Sequence(v.iter().map(|&b| Value::Integer(b as i64)).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::absent())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(Value::present(value.serialize(self)?))
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: IndexMap::with_capacity(len.unwrap_or(0)),
            current_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<SerializeRecord> {
        Ok(SerializeRecord {
            record: Record::new(name),
            variant: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeRecord> {
        Ok(SerializeRecord {
            record: Record::new(variant),
            variant: Some(variant),
        })
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let seq = Value::Sequence(self.vec);
        match self.variant {
            Some(variant) => tagged(variant, seq),
            None => seq,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

/// Renders a serialized map key as a JSON member name.
fn key_text(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Integer(i) => Ok(i.to_string()),
        Value::BigInt(bi) => Ok(bi.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::custom(format!(
            "map keys must be strings, integers or booleans, found {}",
            other.kind_name()
        ))),
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(key_text(to_value(key)?)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Mapping(self.map))
    }
}

impl ser::SerializeStruct for SerializeRecord {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.record.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Record(self.record))
    }
}

impl ser::SerializeStructVariant for SerializeRecord {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.record.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        match self.variant {
            Some(variant) => Ok(tagged(variant, Value::Record(self.record))),
            None => Ok(Value::Record(self.record)),
        }
    }
}

/// Aligns a captured value with `shape`.
///
/// - ISO strings under a [`Shape::Date`] become [`Value::Date`]
/// - records take the shape's record name and declared field order
/// - a present value under a non-optional shape is unwrapped
///
/// Values the shape does not describe are left as they are.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use json_mapper::{ser::conform, Shape, Value};
///
/// let captured = Value::from("1980-09-15");
/// let conformed = conform(captured, &Shape::Date).unwrap();
/// assert_eq!(conformed, Value::Date(NaiveDate::from_ymd_opt(1980, 9, 15).unwrap()));
/// ```
pub fn conform(value: Value, shape: &Shape) -> Result<Value> {
    match (shape, value) {
        (Shape::Lazy(resolve), value) => conform(value, &resolve()),
        (Shape::Date, Value::String(text)) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|e| Error::custom(format!("`{}` is not an ISO-8601 date: {}", text, e))),
        (Shape::Sequence(element), Value::Sequence(items)) => items
            .into_iter()
            .map(|item| conform(item, element))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        (Shape::Mapping(member), Value::Mapping(map)) => map
            .into_iter()
            .map(|(k, v)| conform(v, member).map(|v| (k, v)))
            .collect::<Result<IndexMap<_, _>>>()
            .map(Value::Mapping),
        (Shape::Optional(inner), Value::Optional(Some(present))) => {
            Ok(Value::present(conform(*present, inner)?))
        }
        (Shape::Optional(_), absent @ Value::Optional(None)) => Ok(absent),
        (Shape::Optional(inner), other) => Ok(Value::present(conform(other, inner)?)),
        (Shape::Nullable(_), Value::Null | Value::Optional(None)) => Ok(Value::Null),
        (Shape::Nullable(inner), other) => conform(other, inner),
        (_, Value::Optional(Some(present))) => conform(*present, shape),
        (Shape::Record(record), Value::Record(mut captured)) => {
            let mut fields = IndexMap::with_capacity(captured.fields.len());
            for field in &record.fields {
                if let Some(v) = captured.fields.shift_remove(&field.name) {
                    fields.insert(field.name.clone(), conform(v, &field.shape)?);
                }
            }
            fields.extend(captured.fields);
            Ok(Value::Record(Record {
                name: record.name.clone(),
                fields,
            }))
        }
        (Shape::Record(record), Value::Mapping(map)) => conform(
            Value::Record(Record {
                name: record.name.clone(),
                fields: map,
            }),
            shape,
        ),
        (_, other) => Ok(other),
    }
}
