//! Filter trees
//!
//! A [`FilterNode`] is either a single field condition or a group of child
//! nodes joined by `And`/`Or`. [`compose`] folds a tree into one
//! [`Predicate`] evaluated against a single record.

use dynq_core::{DynqResult, OperatorPosition, QueryError};
use serde::Deserialize;

use crate::predicate::{build, Operator, Predicate};
use crate::record::Record;
use crate::value::Literal;

/// A filter directive
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    /// Child nodes joined by a combinator
    Group {
        operator: Operator,
        filters: Vec<FilterNode>,
    },
    /// Compare one field with a value
    Condition {
        #[serde(default)]
        field: String,
        operator: Operator,
        #[serde(default)]
        value: Literal,
    },
}

impl FilterNode {
    /// Create a condition node
    pub fn condition(field: impl Into<String>, operator: Operator, value: impl Into<Literal>) -> Self {
        Self::Condition {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Create a group whose children must all match
    pub fn and(filters: impl IntoIterator<Item = FilterNode>) -> Self {
        Self::Group {
            operator: Operator::And,
            filters: filters.into_iter().collect(),
        }
    }

    /// Create a group where any child may match
    pub fn or(filters: impl IntoIterator<Item = FilterNode>) -> Self {
        Self::Group {
            operator: Operator::Or,
            filters: filters.into_iter().collect(),
        }
    }

    /// Check if this node composes to no filter at all
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Condition { field, value, .. } => field.trim().is_empty() || value.is_null(),
            Self::Group { filters, .. } => filters.iter().all(FilterNode::is_absent),
        }
    }
}

/// Compose a filter tree into one predicate.
///
/// Returns `None` when the tree requests no filtering: a condition with an
/// empty field or a null value, or a group whose children are all absent.
pub fn compose<T: Record>(node: &FilterNode) -> DynqResult<Option<Predicate<T>>> {
    match node {
        FilterNode::Condition {
            field,
            operator,
            value,
        } => {
            if field.trim().is_empty() || value.is_null() {
                return Ok(None);
            }
            build::<T>(field, *operator, value).map(Some)
        }
        FilterNode::Group { operator, filters } => {
            if !operator.is_combinator() {
                tracing::warn!(record = T::TYPE_NAME, operator = %operator, "group needs and/or");
                return Err(QueryError::invalid_operator(
                    operator,
                    OperatorPosition::Combinator,
                ));
            }

            let mut combined: Option<Predicate<T>> = None;
            for child in filters {
                let Some(next) = compose::<T>(child)? else {
                    continue;
                };
                combined = Some(match combined {
                    None => next,
                    Some(acc) if *operator == Operator::And => acc.and(next),
                    Some(acc) => acc.or(next),
                });
            }

            tracing::debug!(
                record = T::TYPE_NAME,
                operator = %operator,
                children = filters.len(),
                "composed filter group"
            );
            Ok(combined)
        }
    }
}
