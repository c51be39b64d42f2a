//! Query Builder
//!
//! Provides a fluent API for assembling filter, sort and pagination
//! directives.

use dynq_core::{DynqResult, PaginationSpec};

use crate::filters::FilterNode;
use crate::predicate::Operator;
use crate::query::{DynamicQueryExt, QueryDirectives};
use crate::record::Record;
use crate::sequence::Sequence;
use crate::sorts::{Direction, SortKey, SortSpec};
use crate::value::Literal;

/// Builder for constructing query directives fluently
#[derive(Debug)]
pub struct QueryBuilder<T> {
    filter: Option<FilterNode>,
    sort: Option<SortSpec<T>>,
    pagination: PaginationSpec,
}

impl<T> Default for QueryBuilder<T> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            pagination: PaginationSpec::default(),
        }
    }
}

impl<T: Record> QueryBuilder<T> {
    /// Create a new query builder
    pub fn new() -> Self {
        Self::default()
    }

    // Filter methods

    /// Set the filter tree, replacing any conditions added so far
    pub fn filter(mut self, node: FilterNode) -> Self {
        self.filter = Some(node);
        self
    }

    /// AND a condition onto the filters added so far
    pub fn and_where(
        self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Literal>,
    ) -> Self {
        self.combine(Operator::And, FilterNode::condition(field, operator, value))
    }

    /// OR a condition onto the filters added so far
    pub fn or_where(
        self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Literal>,
    ) -> Self {
        self.combine(Operator::Or, FilterNode::condition(field, operator, value))
    }

    fn combine(mut self, combinator: Operator, node: FilterNode) -> Self {
        self.filter = Some(match self.filter.take() {
            None => node,
            Some(FilterNode::Group {
                operator,
                mut filters,
            }) if operator == combinator => {
                filters.push(node);
                FilterNode::Group { operator, filters }
            }
            Some(existing) => FilterNode::Group {
                operator: combinator,
                filters: vec![existing, node],
            },
        });
        self
    }

    // Sort methods

    /// Sort by a named field
    pub fn sort_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort = Some(SortSpec::field(field, direction));
        self
    }

    /// Sort by a compact `"Field dir"` string
    pub fn sort_str(mut self, s: impl Into<String>) -> Self {
        self.sort = Some(SortSpec::string(s));
        self
    }

    /// Sort by a caller-supplied key
    pub fn sort_key(mut self, key: SortKey<T>, direction: Direction) -> Self {
        self.sort = Some(SortSpec::key(key, direction));
        self
    }

    // Pagination methods

    /// Skip the first `n` records
    pub fn skip(mut self, n: i64) -> Self {
        self.pagination.page = Some(n);
        self
    }

    /// Keep at most `n` records
    pub fn take(mut self, n: i64) -> Self {
        self.pagination.page_size = Some(n);
        self
    }

    /// Build the directives
    pub fn build(self) -> QueryDirectives<T> {
        let pagination = if self.pagination.is_empty() {
            None
        } else {
            Some(self.pagination)
        };
        QueryDirectives::new(self.filter, self.sort, pagination)
    }

    /// Build the directives and run them over `sequence`
    pub fn apply<S: Sequence<Item = T>>(self, sequence: S) -> DynqResult<S> {
        sequence.apply_query(&self.build())
    }
}
