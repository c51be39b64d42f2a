//! Literal coercion
//!
//! Converts an untyped [`Literal`] into a [`Value`] of a field's declared
//! type. Pure; every failure is `QueryError::InvalidValue`. Floats must be
//! finite, and a typed enum ordinal only coerces to an enum field.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dynq_core::{DynqResult, QueryError};
use uuid::Uuid;

use crate::value::{FieldType, Literal, Value};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Coerce `literal` into the declared type of `field`
pub fn coerce(
    field: &str,
    literal: &Literal,
    ty: FieldType,
    nullable: bool,
) -> DynqResult<Value<'static>> {
    if literal.is_null() {
        return if nullable {
            Ok(Value::Null)
        } else {
            Err(invalid(field, "null", ty))
        };
    }

    match literal {
        Literal::Typed(value) if value.matches_type(&ty) => check_value(field, value.clone(), ty),
        Literal::Typed(Value::Enum(ordinal)) => Err(invalid(field, &ordinal.to_string(), ty)),
        Literal::Json(serde_json::Value::Number(number)) => coerce_number(field, number, ty),
        Literal::Json(serde_json::Value::Bool(b)) if ty == FieldType::Bool => Ok(Value::Bool(*b)),
        Literal::Json(json) if !(json.is_string() || json.is_number() || json.is_boolean()) => {
            Err(invalid(field, &json.to_string(), ty))
        }
        other => parse_text(field, &other.to_text(), ty),
    }
}

/// Parse the textual form of a literal into `ty`
pub fn parse_text(field: &str, text: &str, ty: FieldType) -> DynqResult<Value<'static>> {
    let trimmed = text.trim();
    let parsed = match ty {
        FieldType::Text => Some(Value::Text(Cow::Owned(text.to_string()))),
        FieldType::Bool => parse_bool(trimmed).map(Value::Bool),
        FieldType::Int => trimmed.parse::<i64>().ok().map(Value::Int),
        FieldType::UInt => trimmed.parse::<u64>().ok().map(Value::UInt),
        FieldType::Float => trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Float),
        FieldType::Uuid => Uuid::parse_str(trimmed).ok().map(Value::Uuid),
        FieldType::DateTime => parse_datetime(trimmed).map(Value::DateTime),
        FieldType::Date => parse_date(trimmed).map(Value::Date),
        FieldType::Enum(members) => parse_enum(trimmed, members).map(Value::Enum),
    };

    parsed.ok_or_else(|| invalid(field, text, ty))
}

fn coerce_number(
    field: &str,
    number: &serde_json::Number,
    ty: FieldType,
) -> DynqResult<Value<'static>> {
    // i64::MAX and u64::MAX round up to 2^63 and 2^64 as f64, so the upper
    // bounds are exclusive
    let integral = |n: f64| n.fract() == 0.0 && n.is_finite();

    let value = match ty {
        FieldType::Int => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|n| integral(*n) && *n >= i64::MIN as f64 && *n < i64::MAX as f64)
                    .map(|n| n as i64)
            })
            .map(Value::Int),
        FieldType::UInt => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|n| integral(*n) && *n >= 0.0 && *n < u64::MAX as f64)
                    .map(|n| n as u64)
            })
            .map(Value::UInt),
        FieldType::Float => number.as_f64().filter(|n| n.is_finite()).map(Value::Float),
        _ => return parse_text(field, &number.to_string(), ty),
    };

    value.ok_or_else(|| invalid(field, &number.to_string(), ty))
}

fn check_value(field: &str, value: Value<'static>, ty: FieldType) -> DynqResult<Value<'static>> {
    match (&value, ty) {
        (Value::Enum(ordinal), FieldType::Enum(members)) if *ordinal as usize >= members.len() => {
            Err(invalid(field, &ordinal.to_string(), ty))
        }
        (Value::Float(n), _) if !n.is_finite() => Err(invalid(field, &n.to_string(), ty)),
        _ => Ok(value),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_enum(text: &str, members: &[&str]) -> Option<u32> {
    if let Some(index) = members.iter().position(|m| m.eq_ignore_ascii_case(text)) {
        return u32::try_from(index).ok();
    }

    // Numeric ordinals name a member too
    text.parse::<u32>()
        .ok()
        .filter(|ordinal| (*ordinal as usize) < members.len())
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(text).map(|t| t.date_naive()))
}

fn invalid(field: &str, value: &str, ty: FieldType) -> QueryError {
    QueryError::invalid_value(field, value, ty.to_string())
}
