//! Integration tests for Collection.
//!
//! Exercises the full public API: construction, the mutating and derivation
//! method families, hybrid key semantics, and the iteration protocol.

use std::ops::ControlFlow;

use collekt::{Collection, Key, Nested, NestedCollection, nested};
use rstest::rstest;

// =============================================================================
// Order Preservation
// =============================================================================

#[rstest]
fn test_add_without_keys_preserves_call_order() {
    let mut collection: Collection<String, i32> = Collection::new();
    collection.add(10).add(20).add(30);

    let values: Vec<i32> = collection.values().copied().collect();
    assert_eq!(values, vec![10, 20, 30]);
}

#[rstest]
fn test_mixed_keys_preserve_insertion_order() {
    let mut collection: Collection<String, i32> = Collection::new();
    collection.add(1).add_at("middle", 2).add(3);

    assert_eq!(
        collection.to_entries(),
        vec![
            (Key::index(0), 1),
            (Key::name("middle".to_string()), 2),
            (Key::index(1), 3),
        ],
    );
}

// =============================================================================
// Implicit Index Numbering
// =============================================================================

#[rstest]
fn test_append_reuses_index_after_removing_largest() {
    let mut collection: Collection<String, i32> = Collection::collect([1, 2, 3]);
    collection.remove(2).add(4);

    assert_eq!(
        collection.to_entries(),
        vec![
            (Key::index(0), 1),
            (Key::index(1), 2),
            (Key::index(2), 4),
        ],
    );
}

#[rstest]
fn test_explicit_integer_key_advances_numbering() {
    let mut collection: Collection<String, i32> = Collection::new();
    collection.add_at(5usize, 50).add(60);

    assert_eq!(collection.get(6), Some(&60));
}

#[rstest]
fn test_explicit_zero_key_is_a_real_key() {
    let mut collection: Collection<String, i32> = Collection::new();
    collection.add_at(0usize, 1).add_at(0usize, 2);

    // Index zero addresses position zero; the second call overwrites.
    assert_eq!(collection.to_entries(), vec![(Key::index(0), 2)]);
}

// =============================================================================
// Mutator Chaining
// =============================================================================

#[rstest]
fn test_chained_mutators_act_on_one_instance() {
    let mut collection: Collection<String, i32> = Collection::new();
    collection.add(1).add(2).remove(0);

    assert_eq!(collection.to_entries(), vec![(Key::index(1), 2)]);
}

#[rstest]
fn test_each_chains_into_further_calls() {
    let collection: Collection<String, i32> = Collection::collect([1, 2]);
    let mut total = 0;
    let count = collection
        .each(|value, _| {
            total += value;
            ControlFlow::Continue(())
        })
        .count();

    assert_eq!(total, 3);
    assert_eq!(count, 2);
}

// =============================================================================
// Mutation Isolation
// =============================================================================

#[rstest]
fn test_derived_collection_does_not_alias_receiver() {
    let collection: Collection<String, i32> = Collection::collect([1, 2]);
    let mut derived = collection.map(|value| *value);
    derived.add(3);

    assert_eq!(collection.len(), 2);
    assert_eq!(derived.len(), 3);
}

#[rstest]
fn test_mutating_receiver_does_not_affect_derivations() {
    let mut collection: Collection<String, i32> = Collection::collect([1, 2, 3]);
    let reversed = collection.reverse();
    collection.reset();

    assert_eq!(reversed.len(), 3);
    assert!(collection.is_empty());
}

// =============================================================================
// Flatten
// =============================================================================

#[rstest]
fn test_flatten_one_level_keeps_deeper_nesting() {
    let collection: NestedCollection<String, i32> = nested![1, [2, 3], [4, [5, 6]]];
    let flattened = collection.flatten(1);

    assert_eq!(flattened.len(), 5);
    let leaves: Vec<Option<i32>> = flattened
        .values()
        .map(|element| element.as_value().copied())
        .collect();
    assert_eq!(
        leaves,
        vec![Some(1), Some(2), Some(3), Some(4), None],
    );
    assert_eq!(
        flattened.get(4).and_then(Nested::as_many).map(Collection::len),
        Some(2),
    );
}

#[rstest]
fn test_flatten_two_levels_is_fully_flat() {
    let collection: NestedCollection<String, i32> = nested![1, [2, 3], [4, [5, 6]]];
    let flattened = collection.flatten(2);

    let leaves: Vec<i32> = flattened
        .values()
        .filter_map(|element| element.as_value().copied())
        .collect();
    assert_eq!(leaves, vec![1, 2, 3, 4, 5, 6]);
}

#[rstest]
fn test_flatten_depth_zero_flattens_completely() {
    let collection: NestedCollection<String, i32> = nested![[1, [2, [3, [4]]]]];
    let flattened = collection.flatten(0);

    let leaves: Vec<i32> = flattened
        .values()
        .filter_map(|element| element.as_value().copied())
        .collect();
    assert_eq!(leaves, vec![1, 2, 3, 4]);
}

#[rstest]
fn test_flatten_assigns_fresh_indices() {
    let mut collection: NestedCollection<String, i32> = NestedCollection::new();
    collection.add_at("a", Nested::value(1)).add_at(
        "b",
        Nested::many(Collection::collect([Nested::value(2)])),
    );
    let flattened = collection.flatten(1);

    let keys: Vec<Key<String>> = flattened.iter().map(|(key, _)| key.clone()).collect();
    assert_eq!(keys, vec![Key::index(0), Key::index(1)]);
}

#[rstest]
fn test_flatten_empty_collection() {
    let collection: NestedCollection<String, i32> = nested![];
    assert!(collection.flatten(1).is_empty());
}

// =============================================================================
// Unique
// =============================================================================

#[rstest]
fn test_unique_retains_first_occurrences_with_keys() {
    let collection: Collection<String, i32> = Collection::collect([1, 2, 2, 3, 1]);

    assert_eq!(
        collection.unique().to_entries(),
        vec![
            (Key::index(0), 1),
            (Key::index(1), 2),
            (Key::index(3), 3),
        ],
    );
}

#[rstest]
fn test_unique_compares_values_not_keys() {
    let mut collection: Collection<String, i32> = Collection::new();
    collection.add_at("a", 7).add_at("b", 7);

    assert_eq!(
        collection.unique().to_entries(),
        vec![(Key::name("a".to_string()), 7)],
    );
}

// =============================================================================
// Value vs Key Membership
// =============================================================================

#[rstest]
fn test_has_checks_values_and_has_key_checks_keys() {
    let collection = Collection::from_entries([("a", 1), ("b", 2)]);

    assert!(collection.has(&1));
    assert!(!collection.has_key(1));
    assert!(collection.has_key("a"));
    assert!(!collection.has(&3));
}

// =============================================================================
// Merge
// =============================================================================

#[rstest]
fn test_merge_concatenates_positional_entries() {
    let left: Collection<String, i32> = Collection::collect([1, 2]);
    let right: Collection<String, i32> = Collection::collect([3, 4]);

    let merged = left.merge(right);
    assert_eq!(
        merged.to_entries(),
        vec![
            (Key::index(0), 1),
            (Key::index(1), 2),
            (Key::index(2), 3),
            (Key::index(3), 4),
        ],
    );
}

#[rstest]
fn test_merge_overwrites_explicit_keys_in_place() {
    let left = Collection::from_entries([("x", 1), ("a", 9)]);
    let right = Collection::from_entries([("x", 2)]);

    let merged = left.merge(right);
    assert_eq!(
        merged.to_entries(),
        vec![
            (Key::name("x".to_string()), 2),
            (Key::name("a".to_string()), 9),
        ],
    );
}

#[rstest]
fn test_merge_renumbers_sparse_positional_keys() {
    let mut left: Collection<String, i32> = Collection::new();
    left.add_at(5usize, 50);
    let mut right: Collection<String, i32> = Collection::new();
    right.add_at(3usize, 30);

    let merged = left.merge(right);
    assert_eq!(
        merged.to_entries(),
        vec![(Key::index(0), 50), (Key::index(1), 30)],
    );
}

#[rstest]
fn test_merge_mixed_keys() {
    let mut left: Collection<String, i32> = Collection::new();
    left.add(1).add_at("x", 10).add(2);
    let mut right: Collection<String, i32> = Collection::new();
    right.add(3).add_at("x", 20);

    let merged = left.merge(right);
    assert_eq!(
        merged.to_entries(),
        vec![
            (Key::index(0), 1),
            (Key::name("x".to_string()), 20),
            (Key::index(1), 2),
            (Key::index(2), 3),
        ],
    );
}

#[rstest]
fn test_merge_accepts_plain_entry_sequences() {
    let left: Collection<String, i32> = Collection::collect([1]);
    let merged = left.merge(vec![(Key::index(0), 2), (Key::name("x".to_string()), 3)]);

    assert_eq!(
        merged.to_entries(),
        vec![
            (Key::index(0), 1),
            (Key::index(1), 2),
            (Key::name("x".to_string()), 3),
        ],
    );
}

// =============================================================================
// Flip
// =============================================================================

#[rstest]
fn test_flip_swaps_keys_and_values() {
    let mut collection: Collection<String, String> = Collection::new();
    collection.add("first".to_string()).add_at("label", "second".to_string());

    let flipped = collection.flip();
    assert_eq!(
        flipped.to_entries(),
        vec![
            (Key::name("first".to_string()), Key::index(0)),
            (
                Key::name("second".to_string()),
                Key::name("label".to_string()),
            ),
        ],
    );
}

#[rstest]
fn test_flip_collisions_overwrite_in_place() {
    let mut collection: Collection<String, String> = Collection::new();
    collection
        .add("x".to_string())
        .add("y".to_string())
        .add("x".to_string());

    let flipped = collection.flip();
    assert_eq!(
        flipped.to_entries(),
        vec![
            (Key::name("x".to_string()), Key::index(2)),
            (Key::name("y".to_string()), Key::index(1)),
        ],
    );
}

#[rstest]
fn test_flip_integer_values_become_indices() {
    let mut collection: Collection<String, usize> = Collection::new();
    collection.add_at("a", 3usize);

    let flipped = collection.flip();
    assert_eq!(flipped.get(3), Some(&Key::name("a".to_string())));
}

// =============================================================================
// Remaining Derivations
// =============================================================================

#[rstest]
fn test_reverse_carries_keys_with_values() {
    let mut collection: Collection<String, i32> = Collection::new();
    collection.add(1).add_at("mid", 2).add(3);

    assert_eq!(
        collection.reverse().to_entries(),
        vec![
            (Key::index(1), 3),
            (Key::name("mid".to_string()), 2),
            (Key::index(0), 1),
        ],
    );
}

#[rstest]
fn test_filter_preserves_original_keys() {
    let collection: Collection<String, i32> = Collection::collect([1, 2, 3, 4]);
    let even = collection.filter(|value| value % 2 == 0);

    assert_eq!(
        even.to_entries(),
        vec![(Key::index(1), 2), (Key::index(3), 4)],
    );
}

#[rstest]
fn test_map_keeps_keys_and_order() {
    let collection = Collection::from_entries([("a", 1), ("b", 2)]);
    let rendered = collection.map(|value| format!("#{value}"));

    assert_eq!(
        rendered.to_entries(),
        vec![
            (Key::name("a".to_string()), "#1".to_string()),
            (Key::name("b".to_string()), "#2".to_string()),
        ],
    );
}

#[rstest]
fn test_keys_derivation_reindexes() {
    let mut collection: Collection<String, i32> = Collection::new();
    collection.add(1).add_at("two", 2);

    assert_eq!(
        collection.keys().to_entries(),
        vec![
            (Key::index(0), Key::index(0)),
            (Key::index(1), Key::name("two".to_string())),
        ],
    );
}

#[rstest]
fn test_implode_joins_values() {
    let collection: Collection<String, i32> = Collection::collect([1, 2, 3]);
    assert_eq!(collection.implode("-"), "1-2-3");
}

#[rstest]
fn test_implode_on_single_value_has_no_separator() {
    let collection: Collection<String, i32> = Collection::singleton(7);
    assert_eq!(collection.implode(", "), "7");
}

// =============================================================================
// Sort
// =============================================================================

#[rstest]
fn test_sort_descending() {
    let mut collection: Collection<String, i32> = Collection::collect([2, 3, 1]);
    collection.sort(|left, right| right.cmp(left));

    let values: Vec<i32> = collection.values().copied().collect();
    assert_eq!(values, vec![3, 2, 1]);
}

#[rstest]
fn test_sort_then_pop_returns_new_last() {
    let mut collection: Collection<String, i32> = Collection::collect([2, 3, 1]);
    collection.sort(|left, right| left.cmp(right));
    assert_eq!(collection.pop(), Some(3));
}

// =============================================================================
// Empty-Collection Safety
// =============================================================================

#[rstest]
fn test_every_derivation_tolerates_empty_input() {
    let empty: Collection<String, usize> = Collection::new();

    assert!(empty.map(|value| value + 1).is_empty());
    assert!(empty.filter(|_| true).is_empty());
    assert!(empty.reverse().is_empty());
    assert!(empty.unique().is_empty());
    assert!(empty.keys().is_empty());
    assert!(empty.flip().is_empty());
    assert!(empty.merge(Collection::new()).is_empty());
    assert_eq!(empty.implode(","), "");
    assert_eq!(empty.to_entries(), vec![]);
}

#[rstest]
fn test_empty_accessors_return_sentinels() {
    let mut empty: Collection<String, i32> = Collection::new();

    assert_eq!(empty.get(0), None);
    assert!(!empty.has(&1));
    assert!(!empty.has_key("a"));
    assert_eq!(empty.pop(), None);
    assert_eq!(empty.first(), None);
    assert_eq!(empty.last(), None);
}
