//! Native value model.
//!
//! [`Value`] is the in-memory side of the codec: what the encoder consumes and
//! what shape-driven decoding produces. Unlike [`JsonNode`] it knows about
//! calendar dates, named records and the three-state optional wrapper.
//!
//! ## Absent vs. null
//!
//! ```rust
//! use json_mapper::Value;
//!
//! let absent = Value::absent();
//! let present = Value::present(Value::Null);
//! assert!(absent.is_absent());
//! assert!(!present.is_absent());
//! assert_ne!(absent, Value::Null);
//! ```
//!
//! ## Records
//!
//! ```rust
//! use chrono::NaiveDate;
//! use json_mapper::{Record, Value};
//!
//! let person = Record::new("Person")
//!     .with_field("name", "Juan Garcia")
//!     .with_field("birthdate", NaiveDate::from_ymd_opt(1980, 9, 15).unwrap());
//! let value = Value::from(person);
//! assert_eq!(value.get("name").and_then(Value::as_str), Some("Juan Garcia"));
//! ```

use crate::{JsonNode, Number, ShapeKey};
use chrono::NaiveDate;
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A named record with fields in declared order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Record {
    pub name: String,
    pub fields: IndexMap<String, Value>,
}

impl Record {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Appends a field, replacing any earlier value under the same name.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// A native value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    BigInt(BigInt),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
    Record(Record),
    /// `None` is the absent marker; `Some` is a present value.
    Optional(Option<Box<Value>>),
}

impl Value {
    /// The absent marker: an optional whose member was not present.
    #[inline]
    #[must_use]
    pub const fn absent() -> Self {
        Value::Optional(None)
    }

    #[inline]
    #[must_use]
    pub fn present(value: impl Into<Value>) -> Self {
        Value::Optional(Some(Box::new(value.into())))
    }

    #[inline]
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Value::Optional(None))
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of this value's kind, as used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::BigInt(_) => "big integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Record(_) => "record",
            Value::Optional(_) => "optional",
        }
    }

    /// The registry key an override for this value is looked up under.
    ///
    /// `Null` and the optional wrapper have no key of their own; the encoder
    /// unwraps present optionals before looking up their contents.
    #[must_use]
    pub fn shape_key(&self) -> Option<ShapeKey> {
        match self {
            Value::Null | Value::Optional(_) => None,
            Value::Bool(_) => Some(ShapeKey::Bool),
            Value::Integer(_) => Some(ShapeKey::Integer),
            Value::BigInt(_) => Some(ShapeKey::BigInteger),
            Value::Float(_) => Some(ShapeKey::Float),
            Value::String(_) => Some(ShapeKey::String),
            Value::Date(_) => Some(ShapeKey::Date),
            Value::Sequence(_) => Some(ShapeKey::Sequence),
            Value::Mapping(_) => Some(ShapeKey::Mapping),
            Value::Record(record) => Some(ShapeKey::Record(record.name.clone())),
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::BigInt(bi) => i64::try_from(bi).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The wrapped value of a present optional. Returns `None` for the absent
    /// marker and for non-optional values.
    #[must_use]
    pub fn as_present(&self) -> Option<&Value> {
        match self {
            Value::Optional(Some(inner)) => Some(inner),
            _ => None,
        }
    }

    /// Looks up a record field or mapping entry by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Record(record) => record.get(key),
            Value::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Converts a JSON tree into its structural native mirror: objects become
    /// mappings, arrays become sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::{parse, Value};
    ///
    /// let tree = parse(r#"{"hobbies":["football","squash"]}"#).unwrap();
    /// let value = Value::from_node(&tree);
    /// assert_eq!(
    ///     value.get("hobbies"),
    ///     Some(&Value::Sequence(vec!["football".into(), "squash".into()]))
    /// );
    /// ```
    #[must_use]
    pub fn from_node(node: &JsonNode) -> Self {
        match node {
            JsonNode::Null => Value::Null,
            JsonNode::Bool(b) => Value::Bool(*b),
            JsonNode::Number(Number::Integer(i)) => Value::Integer(*i),
            JsonNode::Number(Number::BigInt(bi)) => Value::BigInt(bi.clone()),
            JsonNode::Number(Number::Float(f)) => Value::Float(*f),
            JsonNode::String(s) => Value::String(s.clone()),
            JsonNode::Array(arr) => Value::Sequence(arr.iter().map(Value::from_node).collect()),
            JsonNode::Object(obj) => Value::Mapping(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Value::from_node(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::BigInt(bi) => match i128::try_from(bi) {
                Ok(i) => serializer.serialize_i128(i),
                Err(_) => serializer.serialize_str(&bi.to_string()),
            },
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Value::Sequence(seq) => {
                let mut out = serializer.serialize_seq(Some(seq.len()))?;
                for element in seq {
                    out.serialize_element(element)?;
                }
                out.end()
            }
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Record(record) => {
                let present = record.fields.values().filter(|v| !v.is_absent()).count();
                let mut out = serializer.serialize_map(Some(present))?;
                for (k, v) in &record.fields {
                    if !v.is_absent() {
                        out.serialize_entry(k, v)?;
                    }
                }
                out.end()
            }
            Value::Optional(None) => serializer.serialize_none(),
            Value::Optional(Some(inner)) => serializer.serialize_some(inner.as_ref()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                Ok(match i64::try_from(value) {
                    Ok(i) => Value::Integer(i),
                    Err(_) => Value::BigInt(BigInt::from(value)),
                })
            }

            fn visit_i128<E>(self, value: i128) -> Result<Value, E> {
                Ok(match i64::try_from(value) {
                    Ok(i) => Value::Integer(i),
                    Err(_) => Value::BigInt(BigInt::from(value)),
                })
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Sequence(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Mapping(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(value as i64)
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::BigInt(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Value::Optional(value.map(|v| Box::new(v.into())))
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Mapping(value)
    }
}
