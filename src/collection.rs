//! Order-preserving hybrid indexed/associative collection.
//!
//! This module provides [`Collection`], an ordered container whose entries
//! are keyed either by explicit keys or by auto-assigned sequential indices,
//! unified under [`Key`].
//!
//! # Overview
//!
//! `Collection` combines array-like ergonomics with keyed access in one
//! type. Its API splits into two method families:
//!
//! - **Mutating operations** ([`add`](Collection::add),
//!   [`add_at`](Collection::add_at), [`remove`](Collection::remove),
//!   [`reset`](Collection::reset), [`sort`](Collection::sort),
//!   [`pop`](Collection::pop)) operate in place and return the receiver for
//!   chaining.
//! - **Derivation operations** ([`map`](Collection::map),
//!   [`filter`](Collection::filter), [`reverse`](Collection::reverse),
//!   [`unique`](Collection::unique), [`keys`](Collection::keys),
//!   [`merge`](Collection::merge), [`flip`](Collection::flip),
//!   [`flatten`](Collection::flatten)) return a new collection with its own
//!   storage and leave the receiver untouched.
//!
//! Entries are held in insertion order in an inline-capacity buffer
//! (`SmallVec`), so small collections live entirely on the stack.
//!
//! # Time Complexity
//!
//! | Operation  | Complexity |
//! |------------|------------|
//! | `new`      | O(1)       |
//! | `add`      | O(n) (implicit index scan) |
//! | `add_at`   | O(n)       |
//! | `get`      | O(n)       |
//! | `remove`   | O(n)       |
//! | `pop`      | O(1)       |
//! | `sort`     | O(n log n) |
//! | `merge`    | O((n + m) · n) |
//! | `len`      | O(1)       |
//! | `iter`     | O(1) to create, O(n) to iterate |
//!
//! Lookup is a linear scan over the entry buffer; the type is tuned for the
//! small, ordered collections application code passes around, not for bulk
//! keyed storage.
//!
//! # Examples
//!
//! ```rust
//! use collekt::{Collection, Key};
//!
//! let mut collection: Collection<String, i32> = Collection::new();
//! collection.add(1).add(2).add_at("ten", 10);
//!
//! assert_eq!(collection.get(0), Some(&1));
//! assert_eq!(collection.get("ten"), Some(&10));
//!
//! // Derivations leave the receiver untouched.
//! let doubled = collection.map(|value| value * 2);
//! assert_eq!(doubled.get("ten"), Some(&20));
//! assert_eq!(collection.get("ten"), Some(&10));
//! ```
//!
//! # Thread Safety
//!
//! `Collection` is a plain value type: it is `Send`/`Sync` whenever `K` and
//! `V` are, but it provides no internal synchronization. Concurrent mutation
//! of one instance requires external locking.

use std::cmp::Ordering;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::ops::{ControlFlow, Index};

use smallvec::SmallVec;

use crate::key::{IntoKey, Key};
use crate::nested::Nested;

// =============================================================================
// Constants
// =============================================================================

/// Number of entries stored inline before the buffer spills to the heap.
const INLINE_CAPACITY: usize = 8;

/// Entry buffer: insertion-ordered key/value pairs with inline storage.
type Entries<K, V> = SmallVec<[(Key<K>, V); INLINE_CAPACITY]>;

// =============================================================================
// Collection Definition
// =============================================================================

/// An order-preserving hybrid indexed/associative container.
///
/// Every entry is stored under a unique [`Key`]: either a positional
/// [`Key::Index`] assigned on append, or an explicit key supplied by the
/// caller. Insertion order is preserved by all operations except those
/// documented to reorder ([`sort`](Self::sort), [`reverse`](Self::reverse))
/// or renumber ([`flatten`](Self::flatten), [`merge`](Self::merge),
/// [`flip`](Self::flip), [`keys`](Self::keys)).
///
/// # Type Parameters
///
/// * `K` - The explicit key type (`String` for string-keyed collections)
/// * `V` - The value type
///
/// # Examples
///
/// ```rust
/// use collekt::Collection;
///
/// let collection: Collection<String, i32> = Collection::collect([1, 2, 3]);
/// assert_eq!(collection.len(), 3);
/// assert_eq!(collection.get(1), Some(&2));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Collection<K, V> {
    entries: Entries<K, V>,
}

// =============================================================================
// Construction
// =============================================================================

impl<K, V> Collection<K, V> {
    /// Creates a new empty collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection: Collection<String, i32> = Collection::new();
    /// assert!(collection.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Creates a collection containing a single value under index `0`.
    ///
    /// This is the scalar arm of collection construction: a bare value
    /// becomes a one-element collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let collection: Collection<String, i32> = Collection::singleton(42);
    /// assert_eq!(collection.to_entries(), vec![(Key::index(0), 42)]);
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(value: V) -> Self {
        let mut entries = SmallVec::new();
        entries.push((Key::Index(0), value));
        Self { entries }
    }

    /// Creates a collection from a sequence of values.
    ///
    /// Values receive sequential [`Key::Index`] keys starting at `0`, in
    /// iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection: Collection<String, i32> = Collection::collect([10, 20, 30]);
    /// assert_eq!(collection.get(2), Some(&30));
    /// ```
    #[must_use]
    pub fn collect<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self {
            entries: values
                .into_iter()
                .enumerate()
                .map(|(index, value)| (Key::Index(index), value))
                .collect(),
        }
    }

    /// Returns the number of entries in the collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection: Collection<String, i32> = Collection::collect([1, 2]);
    /// assert_eq!(collection.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of entries (alias of [`len`](Self::len)).
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.len()
    }

    /// Returns `true` if the collection contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let empty: Collection<String, i32> = Collection::new();
    /// assert!(empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over `(key, value)` pairs in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection: Collection<String, i32> = Collection::collect([1, 2, 3]);
    /// let values: Vec<i32> = collection.iter().map(|(_, value)| *value).collect();
    /// assert_eq!(values, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> CollectionIterator<'_, K, V> {
        CollectionIterator {
            inner: self.entries.iter(),
        }
    }

    /// Returns an iterator over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Returns the first entry, `None` if the collection is empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<(&Key<K>, &V)> {
        self.entries.first().map(|(key, value)| (key, value))
    }

    /// Returns the last entry, `None` if the collection is empty.
    ///
    /// This is the borrowing counterpart of [`pop`](Self::pop).
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<(&Key<K>, &V)> {
        self.entries.last().map(|(key, value)| (key, value))
    }

    /// Consumes the collection and returns its entries in insertion order.
    #[must_use]
    pub fn into_entries(self) -> Vec<(Key<K>, V)> {
        self.entries.into_vec()
    }
}

// =============================================================================
// Mutating Operations
// =============================================================================

impl<K, V> Collection<K, V> {
    /// Appends a value under the next implicit index.
    ///
    /// The index is one past the largest integer key currently present
    /// (zero for a collection with no integer keys), computed at the time of
    /// the append. Removing the highest-indexed entry therefore lowers the
    /// next implicit index, mirroring append-to-list behavior.
    ///
    /// Returns the receiver for chaining.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let mut collection: Collection<String, i32> = Collection::new();
    /// collection.add(1).add(2);
    /// assert_eq!(collection.to_entries(), vec![(Key::index(0), 1), (Key::index(1), 2)]);
    ///
    /// // The implicit index tracks the keys actually present.
    /// collection.remove(1).add(3);
    /// assert_eq!(collection.to_entries(), vec![(Key::index(0), 1), (Key::index(1), 3)]);
    /// ```
    pub fn add(&mut self, value: V) -> &mut Self {
        let index = self.next_index();
        self.entries.push((Key::Index(index), value));
        self
    }

    /// Removes all entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let mut collection: Collection<String, i32> = Collection::collect([1, 2]);
    /// collection.reset();
    /// assert!(collection.is_empty());
    /// ```
    pub fn reset(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    /// Removes and returns the last value in insertion order.
    ///
    /// Returns `None` when the collection is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let mut collection: Collection<String, i32> = Collection::collect([1, 2]);
    /// assert_eq!(collection.pop(), Some(2));
    /// assert_eq!(collection.pop(), Some(1));
    /// assert_eq!(collection.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<V> {
        self.entries.pop().map(|(_, value)| value)
    }

    /// Reorders entries in place by comparing values.
    ///
    /// The sort is stable and carries keys along with their values; it never
    /// re-keys entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let mut collection: Collection<String, i32> = Collection::collect([3, 1, 2]);
    /// collection.sort(|left, right| left.cmp(right));
    ///
    /// assert_eq!(
    ///     collection.to_entries(),
    ///     vec![(Key::index(1), 1), (Key::index(2), 2), (Key::index(0), 3)],
    /// );
    /// ```
    pub fn sort<F>(&mut self, mut comparator: F) -> &mut Self
    where
        F: FnMut(&V, &V) -> Ordering,
    {
        self.entries
            .sort_by(|left, right| comparator(&left.1, &right.1));
        self
    }

    /// Invokes `callback(value, key)` for every entry in insertion order.
    ///
    /// Iteration stops early when the callback returns
    /// [`ControlFlow::Break`]. Returns the receiver for chaining; the
    /// collection is never mutated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::ops::ControlFlow;
    ///
    /// use collekt::Collection;
    ///
    /// let collection: Collection<String, i32> = Collection::collect([1, 2, 3]);
    /// let mut seen = Vec::new();
    /// collection.each(|value, _| {
    ///     seen.push(*value);
    ///     if *value == 2 {
    ///         ControlFlow::Break(())
    ///     } else {
    ///         ControlFlow::Continue(())
    ///     }
    /// });
    /// assert_eq!(seen, vec![1, 2]);
    /// ```
    pub fn each<F>(&self, mut callback: F) -> &Self
    where
        F: FnMut(&V, &Key<K>) -> ControlFlow<()>,
    {
        for (key, value) in &self.entries {
            if callback(value, key).is_break() {
                break;
            }
        }
        self
    }

    /// Next implicit index: one past the largest integer key present.
    fn next_index(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|(key, _)| key.as_index())
            .max()
            .map_or(0, |largest| largest + 1)
    }
}

// =============================================================================
// Keyed Access
// =============================================================================

impl<K: PartialEq, V> Collection<K, V> {
    /// Creates a collection from key/value entries.
    ///
    /// Entries are inserted left to right with full insertion semantics:
    /// a duplicate key overwrites the earlier value in place, and integer
    /// keys feed the implicit-index numbering.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection = Collection::from_entries([("a", 1), ("b", 2)]);
    /// assert_eq!(collection.get("b"), Some(&2));
    /// ```
    #[must_use]
    pub fn from_entries<Q, I>(entries: I) -> Self
    where
        Q: IntoKey<K>,
        I: IntoIterator<Item = (Q, V)>,
    {
        let mut collection = Self::new();
        for (key, value) in entries {
            collection.add_at(key, value);
        }
        collection
    }

    /// Stores a value under an explicit key.
    ///
    /// If the key is already present the value is overwritten in place;
    /// otherwise the entry is appended. An integer key addresses that exact
    /// position and participates in the implicit-index numbering used by
    /// [`add`](Self::add).
    ///
    /// Returns the receiver for chaining.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let mut collection: Collection<String, i32> = Collection::new();
    /// collection.add_at("score", 10).add_at("score", 20);
    /// assert_eq!(collection.get("score"), Some(&20));
    /// assert_eq!(collection.len(), 1);
    /// ```
    pub fn add_at<Q>(&mut self, key: Q, value: V) -> &mut Self
    where
        Q: IntoKey<K>,
    {
        let key = key.into_key();
        match self.position_of(&key) {
            Some(position) => self.entries[position].1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Removes the entry stored under `key`.
    ///
    /// Missing keys are ignored: the call is a no-op, never an error.
    /// Returns the receiver for chaining.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let mut collection: Collection<String, i32> = Collection::collect([1, 2]);
    /// collection.remove(0).remove(7);
    /// assert_eq!(collection.len(), 1);
    /// assert_eq!(collection.get(1), Some(&2));
    /// ```
    pub fn remove<Q>(&mut self, key: Q) -> &mut Self
    where
        Q: IntoKey<K>,
    {
        let key = key.into_key();
        if let Some(position) = self.position_of(&key) {
            self.entries.remove(position);
        }
        self
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// A missing key resolves to `None`, never an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection = Collection::from_entries([("a", 1)]);
    /// assert_eq!(collection.get("a"), Some(&1));
    /// assert_eq!(collection.get("b"), None);
    /// assert_eq!(collection.get(0), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: Q) -> Option<&V>
    where
        Q: IntoKey<K>,
    {
        let key = key.into_key();
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: Q) -> Option<&mut V>
    where
        Q: IntoKey<K>,
    {
        let key = key.into_key();
        self.entries
            .iter_mut()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` if an entry is stored under `key`.
    ///
    /// Membership by key is distinct from membership by value: see
    /// [`has`](Self::has).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection = Collection::from_entries([("a", 1)]);
    /// assert!(collection.has_key("a"));
    /// assert!(!collection.has_key(1));
    /// ```
    #[must_use]
    pub fn has_key<Q>(&self, key: Q) -> bool
    where
        Q: IntoKey<K>,
    {
        let key = key.into_key();
        self.position_of(&key).is_some()
    }

    /// Position of `key` in the entry buffer.
    fn position_of(&self, key: &Key<K>) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing == key)
    }
}

// =============================================================================
// Value Membership
// =============================================================================

impl<K, V: PartialEq> Collection<K, V> {
    /// Returns `true` if any entry holds a value equal to `value`.
    ///
    /// This is a linear scan comparing **values**; key membership is
    /// [`has_key`](Self::has_key), and the two are never conflated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection = Collection::from_entries([("a", 1), ("b", 2)]);
    /// assert!(collection.has(&1));
    /// assert!(!collection.has(&3));
    /// ```
    #[must_use]
    pub fn has(&self, value: &V) -> bool {
        self.entries.iter().any(|(_, stored)| stored == value)
    }
}

// =============================================================================
// Derivation Operations
// =============================================================================

impl<K: Clone, V> Collection<K, V> {
    /// Returns a new collection with each value replaced by
    /// `function(&value)`, same keys, same order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection = Collection::from_entries([("a", 1), ("b", 2)]);
    /// let doubled = collection.map(|value| value * 2);
    /// assert_eq!(doubled.get("b"), Some(&4));
    /// assert_eq!(collection.get("b"), Some(&2));
    /// ```
    #[must_use]
    pub fn map<U, F>(&self, mut function: F) -> Collection<K, U>
    where
        F: FnMut(&V) -> U,
    {
        Collection {
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), function(value)))
                .collect(),
        }
    }

    /// Returns a new collection whose values are the original keys, under
    /// fresh sequential indices.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let collection = Collection::from_entries([("a", 1), ("b", 2)]);
    /// let keys = collection.keys();
    /// assert_eq!(
    ///     keys.to_entries(),
    ///     vec![
    ///         (Key::index(0), Key::name("a".to_string())),
    ///         (Key::index(1), Key::name("b".to_string())),
    ///     ],
    /// );
    /// ```
    #[must_use]
    pub fn keys(&self) -> Collection<K, Key<K>> {
        Collection {
            entries: self
                .entries
                .iter()
                .enumerate()
                .map(|(index, (key, _))| (Key::Index(index), key.clone()))
                .collect(),
        }
    }
}

impl<K: Clone, V: Clone> Collection<K, V> {
    /// Returns the entries as a plain vector, preserving order and keys.
    ///
    /// This is the conversion boundary to surrounding code; see also
    /// [`into_entries`](Self::into_entries) for the consuming form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let collection: Collection<String, i32> = Collection::collect([1, 2]);
    /// assert_eq!(collection.to_entries(), vec![(Key::index(0), 1), (Key::index(1), 2)]);
    /// ```
    #[must_use]
    pub fn to_entries(&self) -> Vec<(Key<K>, V)> {
        self.entries.iter().cloned().collect()
    }

    /// Returns a new collection with entries in reverse insertion order.
    ///
    /// Keys travel with their values; nothing is renumbered.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let collection: Collection<String, i32> = Collection::collect([1, 2]);
    /// assert_eq!(
    ///     collection.reverse().to_entries(),
    ///     vec![(Key::index(1), 2), (Key::index(0), 1)],
    /// );
    /// ```
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self {
            entries: self.entries.iter().rev().cloned().collect(),
        }
    }

    /// Returns a new collection retaining only entries whose value satisfies
    /// the predicate.
    ///
    /// Original keys are preserved: the result is a sparse subset, not a
    /// renumbered sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let collection: Collection<String, i32> = Collection::collect([1, 2, 3, 4]);
    /// let even = collection.filter(|value| value % 2 == 0);
    /// assert_eq!(even.to_entries(), vec![(Key::index(1), 2), (Key::index(3), 4)]);
    /// ```
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V) -> bool,
    {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(_, value)| predicate(value))
                .cloned()
                .collect(),
        }
    }

    /// Returns a new collection retaining the first occurrence of each
    /// distinct value.
    ///
    /// Equality is by value, not by key; retained entries keep their keys
    /// and relative order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let collection: Collection<String, i32> = Collection::collect([1, 2, 2, 3, 1]);
    /// assert_eq!(
    ///     collection.unique().to_entries(),
    ///     vec![(Key::index(0), 1), (Key::index(1), 2), (Key::index(3), 3)],
    /// );
    /// ```
    #[must_use]
    pub fn unique(&self) -> Self
    where
        V: PartialEq,
    {
        let mut retained: Entries<K, V> = SmallVec::new();
        for (key, value) in &self.entries {
            if !retained.iter().any(|(_, kept)| kept == value) {
                retained.push((key.clone(), value.clone()));
            }
        }
        Self { entries: retained }
    }

    /// Returns a new collection combining own entries with `other`.
    ///
    /// Union semantics follow array merging: positional entries from both
    /// sides are concatenated under fresh sequential indices, while an
    /// incoming explicit key that is already present overwrites the earlier
    /// value in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let left: Collection<String, i32> = Collection::collect([1, 2]);
    /// let right: Collection<String, i32> = Collection::collect([3, 4]);
    /// let values: Vec<i32> = left.merge(right).values().copied().collect();
    /// assert_eq!(values, vec![1, 2, 3, 4]);
    ///
    /// let keyed = Collection::from_entries([("x", 1)]);
    /// let merged = keyed.merge(Collection::from_entries([("x", 2)]));
    /// assert_eq!(merged.to_entries(), vec![(Key::name("x".to_string()), 2)]);
    /// ```
    #[must_use]
    pub fn merge<I>(&self, other: I) -> Self
    where
        K: PartialEq,
        I: IntoIterator<Item = (Key<K>, V)>,
    {
        let mut merged = Self::new();
        let mut next_index = 0usize;
        for (key, value) in self.entries.iter().cloned().chain(other) {
            match key {
                Key::Index(_) => {
                    merged.entries.push((Key::Index(next_index), value));
                    next_index += 1;
                }
                Key::Name(name) => {
                    merged.add_at(Key::Name(name), value);
                }
            }
        }
        merged
    }

    /// Returns a new collection with former values as keys and former keys
    /// as values.
    ///
    /// Key collisions do not fail: a later entry silently overwrites the
    /// earlier one in place, consistent with mapping-insert semantics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{Collection, Key};
    ///
    /// let mut collection: Collection<String, String> = Collection::new();
    /// collection.add("first".to_string()).add("second".to_string());
    ///
    /// let flipped = collection.flip();
    /// assert_eq!(flipped.get("first"), Some(&Key::index(0)));
    /// assert_eq!(flipped.get("second"), Some(&Key::index(1)));
    /// ```
    #[must_use]
    pub fn flip(&self) -> Collection<K, Key<K>>
    where
        K: PartialEq,
        V: IntoKey<K>,
    {
        let mut flipped = Collection::new();
        for (key, value) in &self.entries {
            flipped.add_at(value.clone().into_key(), key.clone());
        }
        flipped
    }
}

// =============================================================================
// Flatten
// =============================================================================

impl<K: Clone, V: Clone> Collection<K, Nested<K, V>> {
    /// Returns a new collection with nested elements expanded up to `depth`
    /// levels, under fresh sequential indices.
    ///
    /// Leaf elements pass through unchanged. At `depth == 1` a nested
    /// collection contributes its values as-is (its keys are discarded);
    /// at greater depth it is recursively flattened with `depth - 1`.
    /// A depth of zero flattens nesting completely.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::{nested, NestedCollection};
    ///
    /// let collection: NestedCollection<String, i32> = nested![1, [2, 3], [4, [5, 6]]];
    ///
    /// // One level: the innermost group survives.
    /// let once = collection.flatten(1);
    /// assert_eq!(once.len(), 5);
    /// assert!(once.get(4usize).is_some_and(|element| element.is_many()));
    ///
    /// // Two levels: fully flat for this input.
    /// let twice = collection.flatten(2);
    /// let values: Vec<i32> = twice
    ///     .values()
    ///     .filter_map(|element| element.as_value().copied())
    ///     .collect();
    /// assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    /// ```
    #[must_use]
    pub fn flatten(&self, depth: usize) -> Self {
        let mut flattened = Vec::with_capacity(self.len());
        Self::flatten_into(&self.entries, depth, &mut flattened);
        Self::collect(flattened)
    }

    /// Recursive descent over elements, parameterized by remaining depth.
    fn flatten_into(
        entries: &[(Key<K>, Nested<K, V>)],
        depth: usize,
        output: &mut Vec<Nested<K, V>>,
    ) {
        for (_, element) in entries {
            match element {
                Nested::Value(_) => output.push(element.clone()),
                Nested::Many(inner) => {
                    if depth == 1 {
                        output.extend(inner.values().cloned());
                    } else {
                        Self::flatten_into(&inner.entries, depth.saturating_sub(1), output);
                    }
                }
            }
        }
    }
}

// =============================================================================
// Implode
// =============================================================================

impl<K, V: fmt::Display> Collection<K, V> {
    /// Joins all values into a single string using `separator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Collection;
    ///
    /// let collection: Collection<String, i32> = Collection::collect([1, 2, 3]);
    /// assert_eq!(collection.implode(", "), "1, 2, 3");
    /// ```
    #[must_use]
    pub fn implode(&self, separator: &str) -> String {
        let mut output = String::new();
        for (position, (_, value)) in self.entries.iter().enumerate() {
            if position > 0 {
                output.push_str(separator);
            }
            output.push_str(&value.to_string());
        }
        output
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over collection entries in insertion order.
pub struct CollectionIterator<'a, K, V> {
    inner: std::slice::Iter<'a, (Key<K>, V)>,
}

impl<'a, K, V> Iterator for CollectionIterator<'a, K, V> {
    type Item = (&'a Key<K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for CollectionIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> ExactSizeIterator for CollectionIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for CollectionIterator<'_, K, V> {}

/// Owning iterator over collection entries in insertion order.
pub struct CollectionIntoIterator<K, V> {
    inner: smallvec::IntoIter<[(Key<K>, V); INLINE_CAPACITY]>,
}

impl<K, V> Iterator for CollectionIntoIterator<K, V> {
    type Item = (Key<K>, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for CollectionIntoIterator<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for CollectionIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for CollectionIntoIterator<K, V> {}

impl<K, V> IntoIterator for Collection<K, V> {
    type Item = (Key<K>, V);
    type IntoIter = CollectionIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        CollectionIntoIterator {
            inner: self.entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a Collection<K, V> {
    type Item = (&'a Key<K>, &'a V);
    type IntoIter = CollectionIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl<K, V> Default for Collection<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<V> for Collection<K, V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::collect(iter)
    }
}

impl<K: PartialEq, V> FromIterator<(Key<K>, V)> for Collection<K, V> {
    fn from_iter<I: IntoIterator<Item = (Key<K>, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<K, V> From<Vec<V>> for Collection<K, V> {
    fn from(values: Vec<V>) -> Self {
        Self::collect(values)
    }
}

impl<K, V, const N: usize> From<[V; N]> for Collection<K, V> {
    fn from(values: [V; N]) -> Self {
        Self::collect(values)
    }
}

impl<K, V> Extend<V> for Collection<K, V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<K: PartialEq, V> Extend<(Key<K>, V)> for Collection<K, V> {
    fn extend<I: IntoIterator<Item = (Key<K>, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add_at(key, value);
        }
    }
}

// =============================================================================
// Subscript Access
// =============================================================================

/// Subscript read access, routed to [`Collection::get`].
///
/// Like the standard library maps, the indexing operator panics when the key
/// is absent; [`Collection::get`] is the non-panicking form.
impl<K: PartialEq, V, Q: IntoKey<K>> Index<Q> for Collection<K, V> {
    type Output = V;

    fn index(&self, key: Q) -> &Self::Output {
        self.get(key).expect("no entry found for key")
    }
}

// =============================================================================
// Formatting
// =============================================================================

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Collection<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.entries.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Collection<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (position, (key, value)) in self.entries.iter().enumerate() {
            if position > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for Collection<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for (key, value) in self {
            sequence.serialize_element(&(key, value))?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct CollectionVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> CollectionVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for CollectionVisitor<K, V>
where
    K: serde::Deserialize<'de> + PartialEq,
    V: serde::Deserialize<'de>,
{
    type Value = Collection<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of key-value entries")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut collection = Collection::new();
        while let Some((key, value)) = access.next_element::<(Key<K>, V)>()? {
            collection.add_at(key, value);
        }
        Ok(collection)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Collection<K, V>
where
    K: serde::Deserialize<'de> + PartialEq,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(CollectionVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
