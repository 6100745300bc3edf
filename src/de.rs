//! Serde bridge: [`Value`] to `T: Deserialize`.
//!
//! [`Value`] implements [`serde::Deserializer`], so a decoded native value can
//! be turned into any deserializable type. Records and mappings are offered as
//! maps, dates as ISO-8601 strings (the form `chrono` types deserialize from),
//! and the absent marker as `None`.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use serde::Deserialize;
//! use json_mapper::{from_value, Record, Value};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     birthdate: NaiveDate,
//!     hobbies: Option<Vec<String>>,
//! }
//!
//! let value: Value = Record::new("Person")
//!     .with_field("name", "Manuel Perez")
//!     .with_field("birthdate", NaiveDate::from_ymd_opt(1987, 7, 23).unwrap())
//!     .with_field("hobbies", Value::absent())
//!     .into();
//!
//! let person: Person = from_value(value).unwrap();
//! assert_eq!(person.hobbies, None);
//! ```

use crate::{Error, Result, Value};
use indexmap::IndexMap;
use serde::de::{self, Deserialize};

/// Deserializes a `T` out of a native value.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(value)
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Null | Value::Optional(None) => visitor.visit_unit(),
            Value::Optional(Some(inner)) => de::Deserializer::deserialize_any(*inner, visitor),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::BigInt(bi) => {
                if let Ok(u) = u64::try_from(&bi) {
                    visitor.visit_u64(u)
                } else if let Ok(i) = i128::try_from(&bi) {
                    visitor.visit_i128(i)
                } else if let Ok(u) = u128::try_from(&bi) {
                    visitor.visit_u128(u)
                } else {
                    visitor.visit_string(bi.to_string())
                }
            }
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Date(d) => visitor.visit_string(d.format("%Y-%m-%d").to_string()),
            Value::Sequence(seq) => visitor.visit_seq(SeqDeserializer::new(seq)),
            Value::Mapping(map) => visitor.visit_map(MapDeserializer::new(map)),
            Value::Record(record) => visitor.visit_map(MapDeserializer::new(record.fields)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Null | Value::Optional(None) => visitor.visit_none(),
            Value::Optional(Some(inner)) => visitor.visit_some(*inner),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Value::Mapping(map) if map.len() == 1 => {
                let mut entries = map.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    }),
                    None => Err(Error::custom("expected a single-member mapping for enum")),
                }
            }
            Value::Optional(Some(inner)) => {
                de::Deserializer::deserialize_enum(*inner, name, variants, visitor)
            }
            other => Err(Error::custom(format!(
                "expected string or single-member mapping for enum, found {}",
                other.kind_name()
            ))),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Null | Value::Optional(None) => visitor.visit_unit(),
            other => Err(Error::custom(format!("expected null, found {}", other.kind_name()))),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit_struct seq tuple tuple_struct map struct identifier
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: IndexMap<String, Value>) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(Value::String(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(Value::String(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            Some(other) => Err(Error::custom(format!(
                "expected unit variant, found {}",
                other.kind_name()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(value),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Sequence(seq)) => visitor.visit_seq(SeqDeserializer::new(seq)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Mapping(map)) => visitor.visit_map(MapDeserializer::new(map)),
            Some(Value::Record(record)) => visitor.visit_map(MapDeserializer::new(record.fields)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}
