//! Core error types for dynq
//!
//! Every malformed directive surfaces as one of three kinds; absent
//! directives are not errors.

use std::fmt;
use thiserror::Error;

/// Position an operator was found in when it was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorPosition {
    /// A leaf condition comparing a field with a value
    Comparison,
    /// A group node joining child filters
    Combinator,
}

impl OperatorPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comparison => "comparison",
            Self::Combinator => "combinator",
        }
    }
}

impl fmt::Display for OperatorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for query composition and resolution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("The property {field} is not present in the {record}")]
    UnknownField { record: &'static str, field: String },

    #[error("Invalid value {value:?} for {field}: expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Operator {operator} is not valid as a {position} operator")]
    InvalidOperator {
        operator: String,
        position: OperatorPosition,
    },
}

impl QueryError {
    pub fn unknown_field(record: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            record,
            field: field.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub fn invalid_operator(operator: impl fmt::Display, position: OperatorPosition) -> Self {
        Self::InvalidOperator {
            operator: operator.to_string(),
            position,
        }
    }

    /// HTTP status a request handler should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::UnknownField { .. }
            | QueryError::InvalidValue { .. }
            | QueryError::InvalidOperator { .. } => 400,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::UnknownField { .. } => "unknown_field",
            QueryError::InvalidValue { .. } => "invalid_value",
            QueryError::InvalidOperator { .. } => "invalid_operator",
        }
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_message() {
        let err = QueryError::unknown_field("Person", "NotExisting");
        assert_eq!(
            err.to_string(),
            "The property NotExisting is not present in the Person"
        );
        assert_eq!(err.error_code(), "unknown_field");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_invalid_operator_message() {
        let err = QueryError::invalid_operator("and", OperatorPosition::Comparison);
        assert_eq!(
            err.to_string(),
            "Operator and is not valid as a comparison operator"
        );
        assert_eq!(err.error_code(), "invalid_operator");
    }

    #[test]
    fn test_invalid_value_code() {
        let err = QueryError::invalid_value("Age", "abc", "integer");
        assert_eq!(err.error_code(), "invalid_value");
        assert!(err.to_string().contains("\"abc\""));
    }
}
