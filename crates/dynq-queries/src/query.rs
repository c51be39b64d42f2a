//! Query pipeline
//!
//! [`DynamicQueryExt`] adds the directive-driven stages to every
//! [`Sequence`] of registered records. [`DynamicQueryExt::apply_query`] runs
//! them in the fixed order filter, sort, pagination.

use dynq_core::config::QueryConfig;
use dynq_core::{DynqResult, PaginationSpec};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::filters::{compose, FilterNode};
use crate::predicate::Predicate;
use crate::record::Record;
use crate::sequence::Sequence;
use crate::sorts::{resolve_sort, SortSpec};

/// Filter, sort and pagination directives for one query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct QueryDirectives<T> {
    #[serde(default)]
    pub filter: Option<FilterNode>,
    #[serde(default)]
    pub sort: Option<SortSpec<T>>,
    #[serde(default)]
    pub pagination: Option<PaginationSpec>,
}

impl<T> QueryDirectives<T> {
    pub fn new(
        filter: Option<FilterNode>,
        sort: Option<SortSpec<T>>,
        pagination: Option<PaginationSpec>,
    ) -> Self {
        Self {
            filter,
            sort,
            pagination,
        }
    }

    /// Check if no stage has a directive
    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.sort.is_none() && self.pagination.is_none()
    }
}

impl<T> Default for QueryDirectives<T> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            pagination: None,
        }
    }
}

impl<T> Clone for QueryDirectives<T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            pagination: self.pagination,
        }
    }
}

/// Directive-driven query stages for sequences of records.
///
/// Every stage treats an absent directive as a no-op and returns the
/// sequence unevaluated.
pub trait DynamicQueryExt<T: Record>: Sequence<Item = T> {
    /// Keep the records matching a caller-supplied predicate
    fn apply_predicate(self, predicate: Option<Predicate<T>>) -> Self {
        match predicate {
            Some(predicate) => self.filter(predicate),
            None => self,
        }
    }

    /// Keep the records matching a filter tree
    fn apply_filter(self, filter: Option<&FilterNode>) -> DynqResult<Self> {
        let predicate = match filter {
            Some(node) => compose::<T>(node)?,
            None => None,
        };
        Ok(self.apply_predicate(predicate))
    }

    /// Stable sort by a sort directive.
    ///
    /// A blank sort string is an error rather than a no-op.
    fn apply_sort(self, sort: Option<&SortSpec<T>>) -> DynqResult<Self> {
        match sort {
            Some(spec) => Ok(self.order(resolve_sort(spec)?)),
            None => Ok(self),
        }
    }

    /// Skip `page` records, then keep at most `pageSize`
    fn apply_pagination(self, pagination: Option<&PaginationSpec>) -> Self {
        paginate(self, pagination, None)
    }

    /// Run filter, sort and pagination in that order
    fn apply_query(self, directives: &QueryDirectives<T>) -> DynqResult<Self> {
        run(self, directives, None)
    }

    /// Like [`DynamicQueryExt::apply_query`], with the page size capped at
    /// `config.max_page_size`
    fn apply_query_with(
        self,
        directives: &QueryDirectives<T>,
        config: &QueryConfig,
    ) -> DynqResult<Self> {
        run(self, directives, config.max_page_size)
    }
}

impl<S, T> DynamicQueryExt<T> for S
where
    S: Sequence<Item = T>,
    T: Record,
{
}

fn paginate<S: Sequence>(
    sequence: S,
    pagination: Option<&PaginationSpec>,
    max_page_size: Option<usize>,
) -> S {
    let (offset, limit) = match pagination {
        Some(spec) => (spec.offset(), spec.limit_capped(max_page_size)),
        None => (None, max_page_size),
    };

    let sequence = match offset {
        Some(n) => sequence.skip(n),
        None => sequence,
    };
    match limit {
        Some(n) => sequence.take(n),
        None => sequence,
    }
}

#[instrument(skip_all, fields(record = T::TYPE_NAME))]
fn run<S, T>(
    sequence: S,
    directives: &QueryDirectives<T>,
    max_page_size: Option<usize>,
) -> DynqResult<S>
where
    S: Sequence<Item = T>,
    T: Record,
{
    // Resolve every directive before touching the sequence
    let predicate = match &directives.filter {
        Some(node) => compose::<T>(node)?,
        None => None,
    };
    let order = directives.sort.as_ref().map(resolve_sort).transpose()?;

    debug!(
        filtered = predicate.is_some(),
        sorted = order.is_some(),
        page = ?directives.pagination.and_then(|p| p.page),
        page_size = ?directives.pagination.and_then(|p| p.page_size),
        "applying query"
    );

    let sequence = match predicate {
        Some(predicate) => sequence.filter(predicate),
        None => sequence,
    };
    let sequence = match order {
        Some(order) => sequence.order(order),
        None => sequence,
    };
    Ok(paginate(sequence, directives.pagination.as_ref(), max_page_size))
}
