//! Sort orders
//!
//! A [`SortSpec`] names the sort key in one of three ways: a compact
//! `"Field dir"` string, a caller-supplied [`SortKey`], or a field name with
//! a [`Direction`]. [`resolve_sort`] turns it into an [`OrderKey`] that a
//! stable sort can use directly.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use dynq_core::{DynqResult, QueryError};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::record::{resolve, Field, Record};
use crate::value::Value;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Smallest first, nulls first
    #[default]
    Ascending,
    /// Largest first, nulls last
    Descending,
}

impl Direction {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    /// Direction for the second token of a compact sort string.
    ///
    /// Only the exact token `desc` sorts descending.
    pub fn from_token(token: &str) -> Self {
        match token {
            "desc" => Self::Descending,
            _ => Self::Ascending,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orient an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Ordinal(u64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Ordinal(0) => Ok(Self::Ascending),
            Repr::Ordinal(1) => Ok(Self::Descending),
            Repr::Ordinal(n) => Err(de::Error::custom(format!("unknown direction ordinal {}", n))),
            Repr::Name(name) => Direction::parse(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown direction '{}'", name))),
        }
    }
}

/// Caller-supplied sort key, used without field name resolution
pub struct SortKey<T> {
    read: Arc<dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync>,
}

impl<T: 'static> SortKey<T> {
    pub fn new<F>(read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
        }
    }

    /// Key reading a registered field
    pub fn from_field(field: &Field<T>) -> Self {
        let read = field.reader();
        Self::new(move |record| read(record))
    }

    pub fn read<'a>(&self, record: &'a T) -> Value<'a> {
        (self.read)(record)
    }
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        Self {
            read: Arc::clone(&self.read),
        }
    }
}

impl<T> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey").finish_non_exhaustive()
    }
}

/// Sort directive
///
/// When several forms are set, the compact string wins over the key, and
/// the key wins over the field name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct SortSpec<T> {
    /// Compact `"Field asc"` / `"Field desc"` form
    #[serde(default)]
    pub use_string: Option<String>,

    #[serde(skip)]
    pub key: Option<SortKey<T>>,

    #[serde(default)]
    pub field: Option<String>,

    /// Direction for the key and field forms
    #[serde(default)]
    pub sorting_direction: Direction,
}

impl<T> SortSpec<T> {
    /// Sort by a compact `"Field dir"` string
    pub fn string(s: impl Into<String>) -> Self {
        Self {
            use_string: Some(s.into()),
            ..Self::default()
        }
    }

    /// Sort by a named field
    pub fn field(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: Some(name.into()),
            sorting_direction: direction,
            ..Self::default()
        }
    }

    /// Sort by a caller-supplied key
    pub fn key(key: SortKey<T>, direction: Direction) -> Self {
        Self {
            key: Some(key),
            sorting_direction: direction,
            ..Self::default()
        }
    }
}

impl<T> Default for SortSpec<T> {
    fn default() -> Self {
        Self {
            use_string: None,
            key: None,
            field: None,
            sorting_direction: Direction::Ascending,
        }
    }
}

impl<T> Clone for SortSpec<T> {
    fn clone(&self) -> Self {
        Self {
            use_string: self.use_string.clone(),
            key: self.key.clone(),
            field: self.field.clone(),
            sorting_direction: self.sorting_direction,
        }
    }
}

/// A resolved sort key with its direction
pub struct OrderKey<T> {
    key: SortKey<T>,
    direction: Direction,
}

impl<T: 'static> OrderKey<T> {
    pub fn new(key: SortKey<T>, direction: Direction) -> Self {
        Self { key, direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Compare two records under this key and direction
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = self.key.read(a).sort_cmp(&self.key.read(b));
        self.direction.apply(ordering)
    }

    /// Stable in-place sort; ties keep their relative order
    pub fn sort<R: std::borrow::Borrow<T>>(&self, items: &mut [R]) {
        items.sort_by(|a, b| self.compare(a.borrow(), b.borrow()));
    }
}

impl<T> Clone for OrderKey<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            direction: self.direction,
        }
    }
}

impl<T> fmt::Debug for OrderKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderKey")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// Split a compact sort string into field name and direction.
///
/// The string is split on single spaces and needs at least two tokens.
/// Tokens past the second are ignored. Returns `None` when the direction
/// token is missing.
pub fn parse_sort_string(s: &str) -> Option<(&str, Direction)> {
    let mut tokens = s.split(' ');
    let field = tokens.next()?;
    let direction = Direction::from_token(tokens.next()?);
    Some((field, direction))
}

/// Resolve a sort directive against `T`'s fields
pub fn resolve_sort<T: Record>(spec: &SortSpec<T>) -> DynqResult<OrderKey<T>> {
    if let Some(s) = spec.use_string.as_deref().filter(|s| !s.trim().is_empty()) {
        let Some((name, direction)) = parse_sort_string(s) else {
            tracing::warn!(record = T::TYPE_NAME, sort = s, "sort string without direction");
            return Err(QueryError::invalid_value("useString", s, "\"<field> <asc|desc>\""));
        };
        let field = resolve::<T>(name)?;
        tracing::debug!(record = T::TYPE_NAME, field = name, direction = %direction, "sort by string");
        return Ok(OrderKey::new(SortKey::from_field(field), direction));
    }

    if let Some(key) = &spec.key {
        tracing::debug!(record = T::TYPE_NAME, direction = %spec.sorting_direction, "sort by key");
        return Ok(OrderKey::new(key.clone(), spec.sorting_direction));
    }

    // Blank strings fall through to the field form
    let name = spec.field.as_deref().unwrap_or_default();
    let field = resolve::<T>(name)?;
    tracing::debug!(
        record = T::TYPE_NAME,
        field = name,
        direction = %spec.sorting_direction,
        "sort by field"
    );
    Ok(OrderKey::new(SortKey::from_field(field), spec.sorting_direction))
}
