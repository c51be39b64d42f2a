//! Property-based tests for the query pipeline using proptest.

use proptest::prelude::*;
use dynq_queries::{
    compose, record, Deferred, Direction, DynamicQueryExt, FilterNode, Operator, PaginationSpec,
    Sequence, SortSpec,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: usize,
    value: i64,
    name: String,
}

record!(Item {
    "Id" => id: usize,
    "Value" => value: i64,
    "Name" => name: String,
});

fn items_strategy(max: usize) -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((-50i64..50, "[a-c]{1,2}"), 0..max).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(id, (value, name))| Item { id, value, name })
            .collect()
    })
}

fn value_filter(operator: Operator, threshold: i64) -> FilterNode {
    FilterNode::condition("Value", operator, threshold)
}

fn ids(items: &[Item]) -> Vec<usize> {
    items.iter().map(|item| item.id).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Equal and NotEqual split the input into complementary subsets.
    #[test]
    fn equal_and_not_equal_are_complements(
        items in items_strategy(60),
        threshold in -50i64..50,
    ) {
        let equal = items.clone().apply_filter(Some(&value_filter(Operator::Equal, threshold))).unwrap();
        let not_equal = items.clone().apply_filter(Some(&value_filter(Operator::NotEqual, threshold))).unwrap();

        prop_assert!(equal.iter().all(|item| item.value == threshold));
        prop_assert!(not_equal.iter().all(|item| item.value != threshold));
        prop_assert_eq!(equal.len() + not_equal.len(), items.len());
    }

    /// Greater, equal and less partition the input.
    #[test]
    fn comparisons_partition_input(
        items in items_strategy(60),
        threshold in -50i64..50,
    ) {
        let count = |operator| {
            items.clone().apply_filter(Some(&value_filter(operator, threshold))).unwrap().len()
        };

        let total = count(Operator::GreaterThan) + count(Operator::Equal) + count(Operator::LessThan);
        prop_assert_eq!(total, items.len());
        prop_assert_eq!(
            count(Operator::GreaterThanOrEqual),
            count(Operator::GreaterThan) + count(Operator::Equal)
        );
        prop_assert_eq!(
            count(Operator::LessThanOrEqual),
            count(Operator::LessThan) + count(Operator::Equal)
        );
    }

    /// AND of two conditions is the intersection, OR is the union.
    #[test]
    fn and_intersects_or_unites(
        items in items_strategy(60),
        threshold in -50i64..50,
        name in "[a-c]{1,2}",
    ) {
        let by_value = value_filter(Operator::GreaterThanOrEqual, threshold);
        let by_name = FilterNode::condition("Name", Operator::Equal, name.clone());

        let and = ids(&items.clone().apply_filter(Some(&FilterNode::and([by_value.clone(), by_name.clone()]))).unwrap());
        let or = ids(&items.clone().apply_filter(Some(&FilterNode::or([by_value, by_name]))).unwrap());

        let expected_and: Vec<usize> = items.iter()
            .filter(|item| item.value >= threshold && item.name == name)
            .map(|item| item.id)
            .collect();
        let expected_or: Vec<usize> = items.iter()
            .filter(|item| item.value >= threshold || item.name == name)
            .map(|item| item.id)
            .collect();

        prop_assert_eq!(and, expected_and);
        prop_assert_eq!(or, expected_or);
    }

    /// The composed predicate evaluates every child against the same record.
    #[test]
    fn composed_predicate_matches_per_record_evaluation(
        items in items_strategy(40),
        low in -50i64..0,
        high in 0i64..50,
    ) {
        let node = FilterNode::and([
            value_filter(Operator::GreaterThan, low),
            value_filter(Operator::LessThan, high),
        ]);
        let predicate = compose::<Item>(&node).unwrap().unwrap();

        for item in &items {
            prop_assert_eq!(predicate.test(item), item.value > low && item.value < high);
        }
    }

    /// Sorting is stable: ties keep their input order in both directions.
    #[test]
    fn sort_is_stable(items in items_strategy(60)) {
        for direction in [Direction::Ascending, Direction::Descending] {
            let sorted = items.clone().apply_sort(Some(&SortSpec::field("Value", direction))).unwrap();

            let mut expected = items.clone();
            match direction {
                Direction::Ascending => expected.sort_by_key(|item| item.value),
                Direction::Descending => expected.sort_by(|a, b| b.value.cmp(&a.value)),
            }
            prop_assert_eq!(ids(&sorted), ids(&expected));
        }
    }

    /// Descending then reversed equals ascending when keys are unique.
    #[test]
    fn reverse_of_descending_is_ascending(items in items_strategy(60)) {
        let ascending = items.clone().apply_sort(Some(&SortSpec::string("Id asc"))).unwrap();
        let mut descending = items.apply_sort(Some(&SortSpec::string("Id desc"))).unwrap();
        descending.reverse();

        prop_assert_eq!(ids(&descending), ids(&ascending));
    }

    /// skip(n) then take(m) yields min(m, max(0, len - n)) records.
    #[test]
    fn pagination_count(
        items in items_strategy(60),
        skip in 0i64..80,
        take in 0i64..80,
    ) {
        let page = items.clone().apply_pagination(Some(&PaginationSpec::new(Some(skip), Some(take))));
        let expected = (take as usize).min(items.len().saturating_sub(skip as usize));

        prop_assert_eq!(page.len(), expected);
        prop_assert_eq!(ids(&page), ids(&items[(skip as usize).min(items.len())..][..expected]));
    }

    /// Re-applying a take at least as large as the remainder changes nothing.
    #[test]
    fn pagination_is_idempotent(
        items in items_strategy(60),
        take in 0i64..80,
    ) {
        let spec = PaginationSpec::take(take);
        let once = items.apply_pagination(Some(&spec));
        let twice = once.clone().apply_pagination(Some(&spec));
        prop_assert_eq!(once, twice);
    }

    /// Materialized totals always match the data length.
    #[test]
    fn materialized_total_matches_data(
        items in items_strategy(60),
        threshold in -50i64..50,
        take in 0i64..30,
    ) {
        let node = value_filter(Operator::LessThanOrEqual, threshold);
        let spec = PaginationSpec::take(take);

        let eager = items.clone()
            .apply_filter(Some(&node)).unwrap()
            .apply_pagination(Some(&spec))
            .materialize();
        prop_assert_eq!(eager.total(), eager.data().len());

        let deferred = Deferred::new(&items)
            .apply_filter(Some(&node)).unwrap()
            .apply_pagination(Some(&spec))
            .materialize();
        prop_assert_eq!(deferred.total(), deferred.data().len());
        prop_assert_eq!(deferred.total(), eager.total());
    }
}
