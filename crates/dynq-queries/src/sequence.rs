//! Sequence abstraction
//!
//! The query pipeline works over anything implementing [`Sequence`]. A
//! `Vec<T>` applies each stage immediately; a [`Deferred`] records the
//! stages over a borrowed slice and runs them when it is evaluated.

use dynq_core::QueryResult;
use tracing::debug;

use crate::predicate::Predicate;
use crate::sorts::OrderKey;

/// An ordered collection the pipeline can transform
pub trait Sequence: Sized {
    /// Record type the stages operate on
    type Item: 'static;
    /// Row type produced by [`Sequence::materialize`]
    type Row;

    /// Keep the records matching `predicate`
    fn filter(self, predicate: Predicate<Self::Item>) -> Self;

    /// Stable sort by `order`
    fn order(self, order: OrderKey<Self::Item>) -> Self;

    /// Drop the first `n` records
    fn skip(self, n: usize) -> Self;

    /// Keep at most `n` records
    fn take(self, n: usize) -> Self;

    /// Evaluate once and capture the rows with their count
    fn materialize(self) -> QueryResult<Self::Row>;
}

impl<T: 'static> Sequence for Vec<T> {
    type Item = T;
    type Row = T;

    fn filter(mut self, predicate: Predicate<T>) -> Self {
        self.retain(|record| predicate.test(record));
        self
    }

    fn order(mut self, order: OrderKey<T>) -> Self {
        order.sort(&mut self[..]);
        self
    }

    fn skip(mut self, n: usize) -> Self {
        let n = n.min(self.len());
        self.drain(..n);
        self
    }

    fn take(mut self, n: usize) -> Self {
        self.truncate(n);
        self
    }

    fn materialize(self) -> QueryResult<T> {
        debug!(total = self.len(), "materialized rows");
        QueryResult::new(self)
    }
}

enum Stage<T> {
    Filter(Predicate<T>),
    Order(OrderKey<T>),
    Skip(usize),
    Take(usize),
}

impl<T> Clone for Stage<T> {
    fn clone(&self) -> Self {
        match self {
            Stage::Filter(predicate) => Stage::Filter(predicate.clone()),
            Stage::Order(order) => Stage::Order(order.clone()),
            Stage::Skip(n) => Stage::Skip(*n),
            Stage::Take(n) => Stage::Take(*n),
        }
    }
}

/// Lazily evaluated query over a borrowed slice.
///
/// Stages are only recorded until [`Deferred::evaluate`] or
/// [`Sequence::materialize`] runs them, in the order they were added.
pub struct Deferred<'a, T> {
    source: &'a [T],
    stages: Vec<Stage<T>>,
}

impl<'a, T: 'static> Deferred<'a, T> {
    pub fn new(source: &'a [T]) -> Self {
        Self {
            source,
            stages: Vec::new(),
        }
    }

    /// Number of recorded stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Run the recorded stages and return the surviving records
    pub fn evaluate(&self) -> Vec<&'a T> {
        let mut rows: Vec<&'a T> = self.source.iter().collect();

        for stage in &self.stages {
            match stage {
                Stage::Filter(predicate) => rows.retain(|record| predicate.test(record)),
                Stage::Order(order) => order.sort(&mut rows[..]),
                Stage::Skip(n) => {
                    let n = (*n).min(rows.len());
                    rows.drain(..n);
                }
                Stage::Take(n) => rows.truncate(*n),
            }
        }

        debug!(
            source = self.source.len(),
            stages = self.stages.len(),
            rows = rows.len(),
            "evaluated deferred query"
        );
        rows
    }

    fn push(mut self, stage: Stage<T>) -> Self {
        self.stages.push(stage);
        self
    }
}

impl<T> Clone for Deferred<'_, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            stages: self.stages.clone(),
        }
    }
}

impl<'a, T: 'static> From<&'a [T]> for Deferred<'a, T> {
    fn from(source: &'a [T]) -> Self {
        Self::new(source)
    }
}

impl<'a, T: 'static> From<&'a Vec<T>> for Deferred<'a, T> {
    fn from(source: &'a Vec<T>) -> Self {
        Self::new(source.as_slice())
    }
}

impl<'a, T: 'static> Sequence for Deferred<'a, T> {
    type Item = T;
    type Row = &'a T;

    fn filter(self, predicate: Predicate<T>) -> Self {
        self.push(Stage::Filter(predicate))
    }

    fn order(self, order: OrderKey<T>) -> Self {
        self.push(Stage::Order(order))
    }

    fn skip(self, n: usize) -> Self {
        self.push(Stage::Skip(n))
    }

    fn take(self, n: usize) -> Self {
        self.push(Stage::Take(n))
    }

    fn materialize(self) -> QueryResult<&'a T> {
        QueryResult::new(self.evaluate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorts::{resolve_sort, SortSpec};
    use crate::testing::{ages, people, Person};

    fn adults() -> Predicate<Person> {
        Predicate::new(|p: &Person| p.age >= 30)
    }

    fn by_age() -> OrderKey<Person> {
        resolve_sort(&SortSpec::string("Age asc")).unwrap()
    }

    #[test]
    fn test_vec_stages() {
        let result = people().filter(adults()).order(by_age()).skip(1).take(3);
        assert_eq!(ages(&result), vec![35, 43, 50]);
    }

    #[test]
    fn test_vec_skip_past_end() {
        assert!(people().skip(20).is_empty());
        assert_eq!(people().skip(0).take(0).len(), 0);
    }

    #[test]
    fn test_deferred_runs_on_evaluate() {
        let source = people();
        let deferred = Deferred::from(&source)
            .filter(adults())
            .order(by_age())
            .skip(1)
            .take(3);
        assert_eq!(deferred.stage_count(), 4);

        let rows: Vec<i32> = deferred.evaluate().iter().map(|p| p.age).collect();
        assert_eq!(rows, vec![35, 43, 50]);
    }

    #[test]
    fn test_deferred_stage_order_matters() {
        let source = people();
        let take_then_sort = Deferred::new(&source).take(3).order(by_age());
        let rows: Vec<i32> = take_then_sort.evaluate().iter().map(|p| p.age).collect();
        assert_eq!(rows, vec![18, 25, 30]);

        let sort_then_take = Deferred::new(&source).order(by_age()).take(3);
        let rows: Vec<i32> = sort_then_take.evaluate().iter().map(|p| p.age).collect();
        assert_eq!(rows, vec![18, 25, 28]);
    }

    #[test]
    fn test_materialize_pairs_data_and_total() {
        let result = people().filter(adults()).materialize();
        assert_eq!(result.total(), 7);
        assert_eq!(result.total(), result.data().len());

        let source = people();
        let result = Deferred::new(&source).filter(adults()).materialize();
        assert_eq!(result.total(), 7);
        assert!(result.data().iter().all(|p| p.age >= 30));
    }

    #[test]
    fn test_deferred_clone_reevaluates() {
        let source = people();
        let deferred = Deferred::new(&source).filter(adults());
        let again = deferred.clone().take(2);
        assert_eq!(deferred.evaluate().len(), 7);
        assert_eq!(again.evaluate().len(), 2);
    }
}
