//! Shape descriptors.
//!
//! A [`Shape`] tells the decoder what native value to build from a JSON node.
//! Records are described by a [`RecordShape`]: an ordered field list plus the
//! [`Construction`] rule deciding what happens to fields missing from the input.
//!
//! ```rust
//! use json_mapper::{RecordShape, Shape};
//!
//! let person = RecordShape::all_args("Person")
//!     .field("name", Shape::String)
//!     .field("birthdate", Shape::Date)
//!     .build();
//! let people = Shape::sequence(person);
//! assert_eq!(people.kind_name(), "array");
//! ```
//!
//! Types used with the typed API ([`Codec::read`](crate::Codec::read),
//! [`Codec::write`](crate::Codec::write)) state their shape by implementing
//! [`Shaped`].

use crate::{JsonNode, Value};
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Describes the target of a decode.
#[derive(Clone, Debug)]
pub enum Shape {
    /// Any JSON, converted structurally.
    Any,
    Bool,
    /// Integral number in i64 range.
    Integer,
    /// Integral number within `min..=max`, for the narrower and the unsigned
    /// native integer types.
    IntegerRange { min: i128, max: i128 },
    BigInteger,
    Float,
    String,
    Date,
    Sequence(Box<Shape>),
    /// String-keyed object with uniformly shaped values.
    Mapping(Box<Shape>),
    /// Three-state wrapper: absent, or present with the inner shape.
    Optional(Box<Shape>),
    /// JSON `null` or the inner shape.
    Nullable(Box<Shape>),
    Record(Arc<RecordShape>),
    /// Deferred shape, for records that refer to themselves.
    Lazy(fn() -> Shape),
}

/// Registry key: the identity of a shape for override lookup.
///
/// Containers are keyed by kind alone; records by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKey {
    Any,
    Bool,
    Integer,
    BigInteger,
    Float,
    String,
    Date,
    Sequence,
    Mapping,
    Record(String),
}

impl Shape {
    /// An integer bounded to `min..=max`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::{Codec, Error, Shape};
    ///
    /// let byte = Shape::integer_range(0, 255);
    /// assert!(Codec::new().decode("255", &byte).is_ok());
    /// assert!(matches!(Codec::new().decode("256", &byte), Err(Error::ShapeMismatch { .. })));
    /// ```
    #[must_use]
    pub fn integer_range(min: i128, max: i128) -> Self {
        Shape::IntegerRange { min, max }
    }

    #[must_use]
    pub fn sequence(element: Shape) -> Self {
        Shape::Sequence(Box::new(element))
    }

    #[must_use]
    pub fn mapping(value: Shape) -> Self {
        Shape::Mapping(Box::new(value))
    }

    #[must_use]
    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn nullable(inner: Shape) -> Self {
        Shape::Nullable(Box::new(inner))
    }

    /// A shape resolved on use.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::{RecordShape, Shape};
    ///
    /// fn node() -> Shape {
    ///     RecordShape::no_args("Node")
    ///         .field("label", Shape::String)
    ///         .field("next", Shape::nullable(Shape::lazy(node)))
    ///         .build()
    /// }
    ///
    /// assert_eq!(node().kind_name(), "object");
    /// ```
    #[must_use]
    pub fn lazy(resolve: fn() -> Shape) -> Self {
        Shape::Lazy(resolve)
    }

    /// Name of the JSON kind this shape expects, as used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Any => "any",
            Shape::Bool => "boolean",
            Shape::Integer | Shape::IntegerRange { .. } => "integer",
            Shape::BigInteger => "big integer",
            Shape::Float => "number",
            Shape::String => "string",
            Shape::Date => "date",
            Shape::Sequence(_) => "array",
            Shape::Mapping(_) | Shape::Record(_) => "object",
            Shape::Optional(inner) | Shape::Nullable(inner) => inner.kind_name(),
            Shape::Lazy(resolve) => resolve().kind_name(),
        }
    }

    /// The registry key overrides for this shape are stored under.
    ///
    /// Wrapper shapes have no key; their inner shape is looked up instead.
    #[must_use]
    pub fn key(&self) -> Option<ShapeKey> {
        match self {
            Shape::Any => Some(ShapeKey::Any),
            Shape::Bool => Some(ShapeKey::Bool),
            Shape::Integer | Shape::IntegerRange { .. } => Some(ShapeKey::Integer),
            Shape::BigInteger => Some(ShapeKey::BigInteger),
            Shape::Float => Some(ShapeKey::Float),
            Shape::String => Some(ShapeKey::String),
            Shape::Date => Some(ShapeKey::Date),
            Shape::Sequence(_) => Some(ShapeKey::Sequence),
            Shape::Mapping(_) => Some(ShapeKey::Mapping),
            Shape::Record(record) => Some(ShapeKey::Record(record.name.clone())),
            Shape::Optional(_) | Shape::Nullable(_) => None,
            Shape::Lazy(resolve) => resolve().key(),
        }
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        match self {
            Shape::Optional(_) => true,
            Shape::Lazy(resolve) => resolve().is_optional(),
            _ => false,
        }
    }

    /// Whether JSON `null` is a legal value for this shape.
    #[must_use]
    pub fn accepts_null(&self) -> bool {
        match self {
            Shape::Any | Shape::Nullable(_) => true,
            Shape::Lazy(resolve) => resolve().accepts_null(),
            _ => false,
        }
    }

    /// The value a no-argument record leaves in a field nobody assigned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::{Shape, Value};
    ///
    /// assert_eq!(Shape::Integer.default_value(), Value::Integer(0));
    /// assert_eq!(Shape::optional(Shape::String).default_value(), Value::absent());
    /// assert_eq!(Shape::Date.default_value(), Value::Null);
    /// ```
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            Shape::Bool => Value::Bool(false),
            Shape::Integer | Shape::IntegerRange { .. } | Shape::BigInteger => Value::Integer(0),
            Shape::Float => Value::Float(0.0),
            Shape::String => Value::String(String::new()),
            Shape::Sequence(_) => Value::Sequence(Vec::new()),
            Shape::Mapping(_) => Value::Mapping(IndexMap::new()),
            Shape::Optional(_) => Value::absent(),
            Shape::Lazy(resolve) => resolve().default_value(),
            Shape::Nullable(_) | Shape::Any | Shape::Date | Shape::Record(_) => Value::Null,
        }
    }
}

/// How a record is instantiated, which decides the fate of missing fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Construction {
    /// Instantiate empty, then assign fields; missing fields keep their type default.
    NoArgs,
    /// One constructor taking every field; missing required fields are an error.
    AllArgs,
}

/// One declared record field.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
    /// Only consulted for [`Construction::AllArgs`] records.
    pub required: bool,
}

/// Describes a named record: its fields in declared order and how it is built.
#[derive(Clone, Debug)]
pub struct RecordShape {
    pub name: String,
    pub fields: Vec<Field>,
    pub construction: Construction,
    /// Drop unknown members even when the codec fails on them.
    pub ignore_unknown: bool,
}

impl RecordShape {
    #[must_use]
    pub fn new(name: impl Into<String>, construction: Construction) -> Self {
        RecordShape {
            name: name.into(),
            fields: Vec::new(),
            construction,
            ignore_unknown: false,
        }
    }

    #[must_use]
    pub fn all_args(name: impl Into<String>) -> Self {
        Self::new(name, Construction::AllArgs)
    }

    #[must_use]
    pub fn no_args(name: impl Into<String>) -> Self {
        Self::new(name, Construction::NoArgs)
    }

    /// Declares a required field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.fields.push(Field {
            name: name.into(),
            shape,
            required: true,
        });
        self
    }

    /// Declares a field that an all-arguments constructor receives as `null`
    /// when the member is missing.
    #[must_use]
    pub fn field_or_null(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.fields.push(Field {
            name: name.into(),
            shape,
            required: false,
        });
        self
    }

    #[must_use]
    pub fn ignore_unknown(mut self) -> Self {
        self.ignore_unknown = true;
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn build(self) -> Shape {
        Shape::Record(Arc::new(self))
    }
}

/// Types that can describe their own decode shape.
///
/// Implement this for records used with the typed API:
///
/// ```rust
/// use json_mapper::{RecordShape, Shape, Shaped};
///
/// struct PersonName {
///     name: String,
/// }
///
/// impl Shaped for PersonName {
///     fn shape() -> Shape {
///         RecordShape::all_args("PersonName")
///             .field("name", String::shape())
///             .build()
///     }
/// }
/// ```
pub trait Shaped {
    fn shape() -> Shape;
}

macro_rules! shaped_as {
    ($shape:expr => $($ty:ty),*) => {
        $(
            impl Shaped for $ty {
                fn shape() -> Shape {
                    $shape
                }
            }
        )*
    };
}

macro_rules! shaped_bounded {
    ($($ty:ty),*) => {
        $(
            impl Shaped for $ty {
                fn shape() -> Shape {
                    Shape::integer_range(<$ty>::MIN as i128, <$ty>::MAX as i128)
                }
            }
        )*
    };
}

shaped_as!(Shape::Integer => i64);
shaped_bounded!(i8, i16, i32, isize, u8, u16, u32, u64, usize);
shaped_as!(Shape::BigInteger => i128, u128);
shaped_as!(Shape::Float => f32, f64);
shaped_as!(Shape::Bool => bool);
shaped_as!(Shape::String => String, char, str);
shaped_as!(Shape::Date => NaiveDate);
shaped_as!(Shape::Any => JsonNode, Value);

impl<T: Shaped + ?Sized> Shaped for &T {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Shaped + ?Sized> Shaped for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }
}

impl<T: Shaped> Shaped for [T] {
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }
}

impl<T: Shaped> Shaped for Option<T> {
    fn shape() -> Shape {
        Shape::optional(T::shape())
    }
}

impl<T: Shaped> Shaped for IndexMap<String, T> {
    fn shape() -> Shape {
        Shape::mapping(T::shape())
    }
}

impl<T: Shaped> Shaped for BTreeMap<String, T> {
    fn shape() -> Shape {
        Shape::mapping(T::shape())
    }
}

impl<T: Shaped, S> Shaped for HashMap<String, T, S> {
    fn shape() -> Shape {
        Shape::mapping(T::shape())
    }
}
