//! Runtime values
//!
//! [`Value`] is what a field read returns and what a filter literal is
//! coerced into. [`FieldType`] is the declared type a field registers, and
//! [`Literal`] is the untyped value a directive arrives with.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Declared type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    /// Signed integer of any width
    Int,
    /// Unsigned integer of any width
    UInt,
    Float,
    Text,
    Uuid,
    /// UTC timestamp
    DateTime,
    Date,
    /// Enumeration with its member names in ordinal order
    Enum(&'static [&'static str]),
}

impl FieldType {
    /// Whether `>`, `>=`, `<` and `<=` are meaningful for this type
    pub fn supports_ordering(&self) -> bool {
        !matches!(self, FieldType::Bool | FieldType::Uuid)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Bool => "boolean",
            FieldType::Int => "integer",
            FieldType::UInt => "unsigned integer",
            FieldType::Float => "number",
            FieldType::Text => "string",
            FieldType::Uuid => "uuid",
            FieldType::DateTime => "date-time",
            FieldType::Date => "date",
            FieldType::Enum(_) => "enum",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Enum(members) => write!(f, "one of [{}]", members.join(", ")),
            other => f.write_str(other.name()),
        }
    }
}

/// Runtime value of a field, borrowed from the record where possible
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(Cow<'a, str>),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    /// Enum member ordinal
    Enum(u32),
}

impl<'a> Value<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Detach the value from the record it was read from
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(b),
            Value::Int(n) => Value::Int(n),
            Value::UInt(n) => Value::UInt(n),
            Value::Float(n) => Value::Float(n),
            Value::Text(s) => Value::Text(Cow::Owned(s.into_owned())),
            Value::Uuid(u) => Value::Uuid(u),
            Value::DateTime(t) => Value::DateTime(t),
            Value::Date(d) => Value::Date(d),
            Value::Enum(o) => Value::Enum(o),
        }
    }

    /// Type of a non-null value. Enum values report no member list.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => FieldType::Bool.name(),
            Value::Int(_) => FieldType::Int.name(),
            Value::UInt(_) => FieldType::UInt.name(),
            Value::Float(_) => FieldType::Float.name(),
            Value::Text(_) => FieldType::Text.name(),
            Value::Uuid(_) => FieldType::Uuid.name(),
            Value::DateTime(_) => FieldType::DateTime.name(),
            Value::Date(_) => FieldType::Date.name(),
            Value::Enum(_) => "enum",
        }
    }

    /// Whether this value already has the runtime shape of `ty`
    pub fn matches_type(&self, ty: &FieldType) -> bool {
        matches!(
            (self, ty),
            (Value::Bool(_), FieldType::Bool)
                | (Value::Int(_), FieldType::Int)
                | (Value::UInt(_), FieldType::UInt)
                | (Value::Float(_), FieldType::Float)
                | (Value::Text(_), FieldType::Text)
                | (Value::Uuid(_), FieldType::Uuid)
                | (Value::DateTime(_), FieldType::DateTime)
                | (Value::Date(_), FieldType::Date)
                | (Value::Enum(_), FieldType::Enum(_))
        )
    }

    /// Compare two values of the same type.
    ///
    /// Returns `None` for mismatched types, for null against non-null and
    /// for NaN.
    pub fn compare(&self, other: &Value<'_>) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::UInt(a), Value::UInt(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.as_ref().cmp(b.as_ref())),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting: nulls first, floats by IEEE total order
    pub fn sort_cmp(&self, other: &Value<'_>) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (a, b) => a.compare(b).unwrap_or(Ordering::Equal),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Uuid(u) => write!(f, "{}", u),
            Value::DateTime(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Enum(o) => write!(f, "{}", o),
        }
    }
}

impl From<bool> for Value<'static> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value<'static> {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value<'static> {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<u64> for Value<'static> {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<f64> for Value<'static> {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value<'static> {
    fn from(s: String) -> Self {
        Value::Text(Cow::Owned(s))
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(Cow::Borrowed(s))
    }
}

impl From<Uuid> for Value<'static> {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value<'static> {
    fn from(t: DateTime<Utc>) -> Self {
        Value::DateTime(t)
    }
}

impl From<NaiveDate> for Value<'static> {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// Untyped filter value as received from a caller
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Literal {
    #[default]
    Null,
    /// Free-form text, e.g. from a query string
    Text(String),
    /// Parsed JSON scalar (number, string or boolean)
    Json(serde_json::Value),
    /// Value already in a native type
    Typed(Value<'static>),
}

impl Literal {
    pub fn is_null(&self) -> bool {
        match self {
            Literal::Null => true,
            Literal::Json(json) => json.is_null(),
            Literal::Typed(value) => value.is_null(),
            Literal::Text(_) => false,
        }
    }

    /// Textual form used for enum and boolean parsing and error reports
    pub fn to_text(&self) -> String {
        match self {
            Literal::Null => "null".to_string(),
            Literal::Text(s) => s.clone(),
            Literal::Json(serde_json::Value::String(s)) => s.clone(),
            Literal::Json(json) => json.to_string(),
            Literal::Typed(value) => value.to_string(),
        }
    }
}

impl From<serde_json::Value> for Literal {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Literal::Null,
            serde_json::Value::String(s) => Literal::Text(s),
            other => Literal::Json(other),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

impl<T: Into<Value<'static>>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Literal::Null, |v| Literal::Typed(v.into()))
    }
}

macro_rules! typed_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Literal {
                fn from(value: $ty) -> Self {
                    Literal::Typed(Value::from(value))
                }
            }
        )*
    };
}

typed_literal!(bool, i32, i64, u64, f64, Uuid, DateTime<Utc>, NaiveDate);

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Literal::from)
    }
}
