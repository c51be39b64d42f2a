//! Predicates over a single record
//!
//! A [`Predicate`] is a shareable boolean function of one record. Composite
//! predicates are built with [`Predicate::and`] and [`Predicate::or`], which
//! evaluate both sides against the same record argument.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use dynq_core::{DynqResult, OperatorPosition, QueryError};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::coerce::coerce;
use crate::record::{resolve, Record};
use crate::value::{Literal, Value};

/// Filter operators
///
/// `And` and `Or` only join filter groups; the rest compare a field with a
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Operator {
    /// Parse from a name or symbol, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "and" | "&&" => Some(Self::And),
            "or" | "||" => Some(Self::Or),
            "equal" | "eq" | "==" | "=" => Some(Self::Equal),
            "notequal" | "ne" | "!=" | "<>" => Some(Self::NotEqual),
            "greaterthan" | "gt" | ">" => Some(Self::GreaterThan),
            "greaterthanorequal" | "gte" | ">=" => Some(Self::GreaterThanOrEqual),
            "lessthan" | "lt" | "<" => Some(Self::LessThan),
            "lessthanorequal" | "lte" | "<=" => Some(Self::LessThanOrEqual),
            _ => None,
        }
    }

    /// Operator for a numeric wire encoding (declaration order)
    pub fn from_ordinal(ordinal: u64) -> Option<Self> {
        match ordinal {
            0 => Some(Self::And),
            1 => Some(Self::Or),
            2 => Some(Self::Equal),
            3 => Some(Self::NotEqual),
            4 => Some(Self::GreaterThan),
            5 => Some(Self::GreaterThanOrEqual),
            6 => Some(Self::LessThan),
            7 => Some(Self::LessThanOrEqual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
            Self::GreaterThan => "greaterThan",
            Self::GreaterThanOrEqual => "greaterThanOrEqual",
            Self::LessThan => "lessThan",
            Self::LessThanOrEqual => "lessThanOrEqual",
        }
    }

    /// Check if this operator joins filter groups
    pub fn is_combinator(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Check if this operator compares a field with a value
    pub fn is_comparison(&self) -> bool {
        !self.is_combinator()
    }

    /// Check if this operator needs the field type to be ordered
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::GreaterThanOrEqual | Self::LessThan | Self::LessThanOrEqual
        )
    }

    /// Apply this comparison to a field value and a constant.
    ///
    /// Ordering operators are false when either side is null.
    pub fn evaluate(&self, left: &Value<'_>, right: &Value<'_>) -> bool {
        if self.is_ordering() && (left.is_null() || right.is_null()) {
            return false;
        }

        let ordering = left.compare(right);
        match self {
            Self::Equal => ordering == Some(Ordering::Equal),
            Self::NotEqual => ordering != Some(Ordering::Equal),
            Self::GreaterThan => ordering == Some(Ordering::Greater),
            Self::GreaterThanOrEqual => {
                matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
            }
            Self::LessThan => ordering == Some(Ordering::Less),
            Self::LessThanOrEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            Self::And | Self::Or => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Ordinal(u64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Ordinal(n) => Operator::from_ordinal(n)
                .ok_or_else(|| de::Error::custom(format!("unknown operator ordinal {}", n))),
            Repr::Name(name) => Operator::parse(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown operator '{}'", name))),
        }
    }
}

/// Boolean function of one record
pub struct Predicate<T> {
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: 'static> Predicate<T> {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
        }
    }

    /// Predicate matching every record
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    pub fn test(&self, record: &T) -> bool {
        (self.test)(record)
    }

    /// Both predicates hold for the same record
    pub fn and(self, other: Predicate<T>) -> Self {
        let (left, right) = (self.test, other.test);
        Self::new(move |record| left(record) && right(record))
    }

    /// Either predicate holds for the same record
    pub fn or(self, other: Predicate<T>) -> Self {
        let (left, right) = (self.test, other.test);
        Self::new(move |record| left(record) || right(record))
    }

    pub fn not(self) -> Self {
        let inner = self.test;
        Self::new(move |record| !inner(record))
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            test: Arc::clone(&self.test),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}

/// Build a predicate comparing field `name` of `T` with `literal`
pub fn build<T: Record>(name: &str, operator: Operator, literal: &Literal) -> DynqResult<Predicate<T>> {
    let field = resolve::<T>(name)?;

    if operator.is_combinator() {
        return Err(QueryError::invalid_operator(operator, OperatorPosition::Comparison));
    }
    if operator.is_ordering() && !field.field_type().supports_ordering() {
        tracing::warn!(
            record = T::TYPE_NAME,
            field = name,
            operator = %operator,
            "ordering operator on unordered field"
        );
        return Err(QueryError::invalid_operator(operator, OperatorPosition::Comparison));
    }

    let constant = coerce(name, literal, field.field_type(), field.is_nullable())?;
    tracing::debug!(
        record = T::TYPE_NAME,
        field = name,
        operator = %operator,
        value = %constant,
        "built predicate"
    );

    let read = field.reader();
    Ok(Predicate::new(move |record: &T| {
        operator.evaluate(&read(record), &constant)
    }))
}
