//! Generic JSON tree.
//!
//! [`JsonNode`] is the structural mirror of JSON text: it is what the parser
//! produces, what the encoder emits, and what override functions consume and
//! return. It carries no field coercion; every object is a [`JsonMap`] and every
//! number a [`Number`].
//!
//! ## Creating Nodes
//!
//! ```rust
//! use json_mapper::{json, JsonNode};
//!
//! let name = JsonNode::from("Juan Garcia");
//! let person = json!({
//!     "name": "Juan Garcia",
//!     "birthdate": [1980, 9, 15]
//! });
//! assert!(person.is_object());
//! assert_eq!(person.get("name"), Some(&name));
//! ```
//!
//! ## Searching a Tree
//!
//! ```rust
//! use json_mapper::parse;
//!
//! let tree = parse(r#"[{"string":"Juan Garcia"},{"string":"Manuel Perez"}]"#).unwrap();
//! assert_eq!(tree.find_values_as_text("string"), vec!["Juan Garcia", "Manuel Perez"]);
//! ```

use crate::JsonMap;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed JSON value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum JsonNode {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<JsonNode>),
    Object(JsonMap),
}

/// A JSON number.
///
/// The wire format does not distinguish integers from floats; the parser uses
/// [`Number::Integer`] for literals without fraction or exponent, falling back
/// to [`Number::BigInt`] when they do not fit in an `i64`.
///
/// # Examples
///
/// ```rust
/// use json_mapper::Number;
///
/// assert!(Number::Integer(42).is_integer());
/// assert_eq!(Number::Integer(42).as_f64(), 42.0);
/// assert_eq!(Number::Float(42.5).as_i64(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    BigInt(BigInt),
    Float(f64),
}

impl Number {
    /// Returns `true` for integral literals, whatever their magnitude.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::BigInt(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it is integral and in range.
    ///
    /// Floats are never converted, even when they have no fractional part:
    /// `1.0` is not an integer literal.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::BigInt(bi) => i64::try_from(bi).ok(),
            Number::Float(_) => None,
        }
    }

    /// Converts this number to an arbitrary-precision integer if it is integral.
    #[must_use]
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Number::Integer(i) => Some(BigInt::from(*i)),
            Number::BigInt(bi) => Some(bi.clone()),
            Number::Float(_) => None,
        }
    }

    /// Converts this number to an `f64`, rounding big integers.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::BigInt(bi) => bi.to_string().parse().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::BigInt(bi) => write!(f, "{}", bi),
            // Debug keeps a trailing `.0` on integral floats and switches to
            // exponent form for very large or small magnitudes.
            Number::Float(fl) if fl.is_finite() => write!(f, "{:?}", fl),
            Number::Float(_) => write!(f, "null"),
        }
    }
}

macro_rules! number_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::Integer(value as i64)
                }
            }
        )*
    };
}

number_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        match i64::try_from(&value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(value),
        }
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(value as f64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl JsonNode {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, JsonNode::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, JsonNode::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, JsonNode::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, JsonNode::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, JsonNode::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, JsonNode::Object(_))
    }

    /// Name of this node's JSON kind, as used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            JsonNode::Null => "null",
            JsonNode::Bool(_) => "boolean",
            JsonNode::Number(Number::Float(_)) => "float",
            JsonNode::Number(_) => "integer",
            JsonNode::String(_) => "string",
            JsonNode::Array(_) => "array",
            JsonNode::Object(_) => "object",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonNode::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonNode::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            JsonNode::Number(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is an integral number in `i64` range, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::JsonNode;
    ///
    /// assert_eq!(JsonNode::from(1980).as_i64(), Some(1980));
    /// assert_eq!(JsonNode::from("1980").as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonNode::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonNode::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<JsonNode>> {
        match self {
            JsonNode::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&JsonMap> {
        match self {
            JsonNode::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up an object member. Returns `None` for non-objects.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonNode> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Looks up an array element. Returns `None` for non-arrays.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&JsonNode> {
        self.as_array().and_then(|arr| arr.get(index))
    }

    /// Textual rendering of a scalar: the string itself, or the literal for
    /// numbers, booleans and null. Containers render as an empty string.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            JsonNode::Null => "null".to_string(),
            JsonNode::Bool(b) => b.to_string(),
            JsonNode::Number(n) => n.to_string(),
            JsonNode::String(s) => s.clone(),
            JsonNode::Array(_) | JsonNode::Object(_) => String::new(),
        }
    }

    /// Collects every value stored under `key` anywhere in the tree.
    ///
    /// The search is depth-first in document order. A matching member's value
    /// is collected but not searched further.
    #[must_use]
    pub fn find_values(&self, key: &str) -> Vec<&JsonNode> {
        let mut found = Vec::new();
        self.collect_values(key, &mut found);
        found
    }

    /// Like [`JsonNode::find_values`], rendering each match with [`JsonNode::as_text`].
    #[must_use]
    pub fn find_values_as_text(&self, key: &str) -> Vec<String> {
        self.find_values(key)
            .into_iter()
            .map(JsonNode::as_text)
            .collect()
    }

    fn collect_values<'a>(&'a self, key: &str, found: &mut Vec<&'a JsonNode>) {
        match self {
            JsonNode::Object(obj) => {
                for (k, v) in obj.iter() {
                    if k == key {
                        found.push(v);
                    } else {
                        v.collect_values(key, found);
                    }
                }
            }
            JsonNode::Array(arr) => {
                for v in arr {
                    v.collect_values(key, found);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for JsonNode {
    /// Writes compact JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::writer::to_compact_string(self))
    }
}

impl Serialize for JsonNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            JsonNode::Null => serializer.serialize_unit(),
            JsonNode::Bool(b) => serializer.serialize_bool(*b),
            JsonNode::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            JsonNode::Number(Number::BigInt(bi)) => match i128::try_from(bi) {
                Ok(i) => serializer.serialize_i128(i),
                Err(_) => serializer.serialize_str(&bi.to_string()),
            },
            JsonNode::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            JsonNode::String(s) => serializer.serialize_str(s),
            JsonNode::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            JsonNode::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for JsonNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct JsonNodeVisitor;

        impl<'de> Visitor<'de> for JsonNodeVisitor {
            type Value = JsonNode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(JsonNode::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(JsonNode::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(JsonNode::Number(Number::from(value)))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(JsonNode::Number(Number::from(BigInt::from(value))))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(JsonNode::Number(Number::from(BigInt::from(value))))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(JsonNode::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(JsonNode::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(JsonNode::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(JsonNode::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(JsonNode::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(JsonNode::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = JsonMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(JsonNode::Object(values))
            }
        }

        deserializer.deserialize_any(JsonNodeVisitor)
    }
}

impl TryFrom<JsonNode> for i64 {
    type Error = crate::Error;

    fn try_from(value: JsonNode) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| crate::Error::custom(format!("expected integer, found {}", value.kind_name())))
    }
}

impl TryFrom<JsonNode> for f64 {
    type Error = crate::Error;

    fn try_from(value: JsonNode) -> crate::Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| crate::Error::custom(format!("expected number, found {}", value.kind_name())))
    }
}

impl TryFrom<JsonNode> for bool {
    type Error = crate::Error;

    fn try_from(value: JsonNode) -> crate::Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| crate::Error::custom(format!("expected boolean, found {}", value.kind_name())))
    }
}

impl TryFrom<JsonNode> for String {
    type Error = crate::Error;

    fn try_from(value: JsonNode) -> crate::Result<Self> {
        match value {
            JsonNode::String(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected string, found {}",
                other.kind_name()
            ))),
        }
    }
}

impl From<bool> for JsonNode {
    fn from(value: bool) -> Self {
        JsonNode::Bool(value)
    }
}

macro_rules! node_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JsonNode {
                fn from(value: $ty) -> Self {
                    JsonNode::Number(Number::from(value))
                }
            }
        )*
    };
}

node_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, BigInt);

impl From<Number> for JsonNode {
    fn from(value: Number) -> Self {
        JsonNode::Number(value)
    }
}

impl From<String> for JsonNode {
    fn from(value: String) -> Self {
        JsonNode::String(value)
    }
}

impl From<&str> for JsonNode {
    fn from(value: &str) -> Self {
        JsonNode::String(value.to_string())
    }
}

impl From<Vec<JsonNode>> for JsonNode {
    fn from(value: Vec<JsonNode>) -> Self {
        JsonNode::Array(value)
    }
}

impl From<JsonMap> for JsonNode {
    fn from(value: JsonMap) -> Self {
        JsonNode::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_conversions() {
        assert_eq!(i64::try_from(JsonNode::from(42)).unwrap(), 42);
        assert!(i64::try_from(JsonNode::from(42.0)).is_err());
        assert_eq!(f64::try_from(JsonNode::from(42)).unwrap(), 42.0);
        assert!(bool::try_from(JsonNode::from(1)).is_err());
        assert_eq!(String::try_from(JsonNode::from("hi")).unwrap(), "hi");
    }

    #[test]
    fn test_number_from_u64_overflows_into_bigint() {
        assert_eq!(Number::from(7u64), Number::Integer(7));
        let big = Number::from(u64::MAX);
        assert!(matches!(big, Number::BigInt(_)));
        assert_eq!(big.to_string(), "18446744073709551615");
        assert_eq!(big.as_i64(), None);
    }

    #[test]
    fn test_float_display_keeps_fraction_marker() {
        assert_eq!(Number::Float(3.0).to_string(), "3.0");
        assert_eq!(Number::Float(0.25).to_string(), "0.25");
        assert_eq!(Number::Float(f64::NAN).to_string(), "null");
    }

    #[test]
    fn test_find_values_does_not_descend_into_matches() {
        let mut inner = JsonMap::new();
        inner.insert("id".to_string(), JsonNode::from(2));
        let mut outer = JsonMap::new();
        outer.insert("id".to_string(), JsonNode::Object(inner));
        let mut sibling = JsonMap::new();
        sibling.insert("id".to_string(), JsonNode::from(3));

        let tree = JsonNode::Array(vec![JsonNode::Object(outer), JsonNode::Object(sibling)]);
        let found = tree.find_values("id");
        assert_eq!(found.len(), 2);
        assert!(found[0].is_object());
        assert_eq!(found[1], &JsonNode::from(3));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(JsonNode::Null.kind_name(), "null");
        assert_eq!(JsonNode::from(1).kind_name(), "integer");
        assert_eq!(JsonNode::from(1.5).kind_name(), "float");
        assert_eq!(JsonNode::from("x").kind_name(), "string");
        assert_eq!(JsonNode::Array(vec![]).kind_name(), "array");
        assert_eq!(JsonNode::Object(JsonMap::new()).kind_name(), "object");
    }
}
