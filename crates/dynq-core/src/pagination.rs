//! Pagination directives
//!
//! `page` is an element offset, not a page index: `page = 2` skips two
//! rows regardless of `pageSize`.

use serde::{Deserialize, Serialize};

/// Pagination parameters (from query string or request body)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSpec {
    /// Number of leading elements to skip
    #[serde(default)]
    pub page: Option<i64>,

    /// Maximum number of elements to keep after skipping
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl PaginationSpec {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self { page, page_size }
    }

    /// Only skip `page` elements
    pub fn skip(page: i64) -> Self {
        Self {
            page: Some(page),
            page_size: None,
        }
    }

    /// Only keep the first `page_size` elements
    pub fn take(page_size: i64) -> Self {
        Self {
            page: None,
            page_size: Some(page_size),
        }
    }

    /// Elements to skip. Negative offsets skip nothing.
    pub fn offset(&self) -> Option<usize> {
        self.page.map(|page| usize::try_from(page).unwrap_or(0))
    }

    /// Elements to keep. Non-positive sizes keep nothing.
    pub fn limit(&self) -> Option<usize> {
        self.page_size.map(|size| usize::try_from(size).unwrap_or(0))
    }

    /// Elements to keep, capped at `max` when one is configured
    pub fn limit_capped(&self, max: Option<usize>) -> Option<usize> {
        match (self.limit(), max) {
            (Some(limit), Some(max)) => Some(limit.min(max)),
            (None, Some(max)) => Some(max),
            (limit, None) => limit,
        }
    }

    /// Check if neither bound is set
    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.page_size.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_raw_element_count() {
        let spec = PaginationSpec::new(Some(1), Some(2));
        assert_eq!(spec.offset(), Some(1));
        assert_eq!(spec.limit(), Some(2));
    }

    #[test]
    fn test_negative_bounds() {
        let spec = PaginationSpec::new(Some(-3), Some(-1));
        assert_eq!(spec.offset(), Some(0));
        assert_eq!(spec.limit(), Some(0));
    }

    #[test]
    fn test_absent_bounds() {
        let spec = PaginationSpec::default();
        assert!(spec.is_empty());
        assert_eq!(spec.offset(), None);
        assert_eq!(spec.limit(), None);
        assert!(!PaginationSpec::skip(2).is_empty());
    }

    #[test]
    fn test_limit_capped() {
        assert_eq!(PaginationSpec::take(50).limit_capped(Some(10)), Some(10));
        assert_eq!(PaginationSpec::take(5).limit_capped(Some(10)), Some(5));
        assert_eq!(PaginationSpec::skip(1).limit_capped(Some(10)), Some(10));
        assert_eq!(PaginationSpec::skip(1).limit_capped(None), None);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let spec: PaginationSpec = serde_json::from_str(r#"{"page": 1, "pageSize": 7}"#).unwrap();
        assert_eq!(spec, PaginationSpec::new(Some(1), Some(7)));

        let spec: PaginationSpec = serde_json::from_str(r#"{"pageSize": 3}"#).unwrap();
        assert_eq!(spec, PaginationSpec::take(3));
    }
}
