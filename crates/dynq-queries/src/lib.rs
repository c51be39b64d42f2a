//! # dynq-queries
//!
//! Dynamic query composition over typed records.
//!
//! Field names, operators and literals arrive as runtime data (typically a
//! deserialized request body) and are resolved against a record type's
//! registered fields to filter, sort and paginate a sequence of records.
//!
//! ## Structure
//!
//! - `value` - Runtime values, declared field types and untyped literals
//! - `coerce` - Literal coercion into a field's declared type
//! - `record` - Field registry and the `record!` macro
//! - `predicate` - Operators and single-field predicates
//! - `filters` - Filter trees and their composition
//! - `sorts` - Sort directives and ordering keys
//! - `sequence` - Eager and deferred sequences
//! - `query` - The filter, sort, pagination pipeline
//! - `builder` - Fluent API for constructing directives
//!
//! ## Example
//!
//! ```
//! use dynq_queries::{record, Direction, DynamicQueryExt, Operator, QueryBuilder};
//!
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! record!(Person {
//!     "Name" => name: String,
//!     "Age" => age: i32,
//! });
//!
//! let people = vec![
//!     Person { name: "John".into(), age: 55 },
//!     Person { name: "Anna".into(), age: 43 },
//!     Person { name: "John".into(), age: 25 },
//! ];
//!
//! let directives = QueryBuilder::<Person>::new()
//!     .and_where("Name", Operator::Equal, "John")
//!     .sort_by("Age", Direction::Ascending)
//!     .take(1)
//!     .build();
//!
//! let result = people.apply_query(&directives).unwrap();
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].age, 25);
//! ```

pub mod value;
pub mod coerce;
pub mod record;
pub mod predicate;
pub mod filters;
pub mod sorts;
pub mod sequence;
pub mod query;
pub mod builder;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use value::{FieldType, Literal, Value};
pub use coerce::coerce;
pub use record::{resolve, Field, FieldValue, ReadFn, Record};
pub use predicate::{build, Operator, Predicate};
pub use filters::{compose, FilterNode};
pub use sorts::{parse_sort_string, resolve_sort, Direction, OrderKey, SortKey, SortSpec};
pub use sequence::{Deferred, Sequence};
pub use query::{DynamicQueryExt, QueryDirectives};
pub use builder::QueryBuilder;

pub use dynq_core::{DynqResult, OperatorPosition, PaginationSpec, QueryError, QueryResult};
