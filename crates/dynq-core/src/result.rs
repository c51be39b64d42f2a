//! Result type alias and the materialized query result
//!
//! `QueryResult` is what a request handler hands back to its caller: the
//! rows of one evaluation together with their count.

use serde::Serialize;

use crate::error::QueryError;

/// Standard Result type for dynq operations
pub type DynqResult<T> = Result<T, QueryError>;

/// Immutable snapshot of an evaluated sequence and its element count.
///
/// The data is collected exactly once and the total is taken from the
/// collected list, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult<T> {
    data: Vec<T>,
    total: usize,
}

impl<T> QueryResult<T> {
    /// Evaluate `items` once and capture the rows with their count
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let data: Vec<T> = items.into_iter().collect();
        let total = data.len();
        Self { data, total }
    }

    /// Create an empty result
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }

    /// Get the materialized rows
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get the number of rows
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Replace the rows, recomputing the total from the same evaluation
    pub fn set_data(&mut self, items: impl IntoIterator<Item = T>) {
        *self = Self::new(items);
    }

    /// Map each row, keeping the count
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> QueryResult<U> {
        QueryResult::new(self.data.into_iter().map(f))
    }

    /// Take ownership of the rows
    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> FromIterator<T> for QueryResult<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T> IntoIterator for QueryResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_matches_data() {
        let result = QueryResult::new(vec![25, 30, 18]);
        assert_eq!(result.total(), 3);
        assert_eq!(result.data(), &[25, 30, 18]);
    }

    #[test]
    fn test_empty_result() {
        let result: QueryResult<i32> = QueryResult::new(Vec::new());
        assert_eq!(result.total(), 0);
        assert!(result.is_empty());
        assert_eq!(result, QueryResult::default());
    }

    #[test]
    fn test_set_data_recomputes_total() {
        let mut result = QueryResult::new(vec!["a", "b"]);
        result.set_data(vec!["c"]);
        assert_eq!(result.total(), 1);
        assert_eq!(result.data(), &["c"]);
    }

    #[test]
    fn test_lazy_iterator_evaluated_once() {
        let mut calls = 0;
        let result: QueryResult<i32> = (1..=4)
            .inspect(|_| calls += 1)
            .filter(|n| n % 2 == 0)
            .collect();
        assert_eq!(calls, 4);
        assert_eq!(result.total(), result.data().len());
    }

    #[test]
    fn test_serializes_data_and_total() {
        let result = QueryResult::new(vec![1, 2]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [1, 2], "total": 2 }));
    }
}
