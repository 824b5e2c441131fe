//! Recursive collection elements.
//!
//! This module provides [`Nested`], the element type that makes the
//! recursive [`flatten`](crate::Collection::flatten) operation expressible
//! in a static type system, and the [`nested!`](crate::nested) macro for
//! building nested literals.
//!
//! # Overview
//!
//! A dynamically typed array can hold scalars and arrays side by side; a
//! Rust collection cannot. [`Nested`] restores that shape as a sum type:
//! every element is either a leaf value or a whole nested collection of
//! further elements.
//!
//! # Examples
//!
//! ```rust
//! use collekt::{nested, NestedCollection};
//!
//! // The macro turns bracketed groups into nested collections.
//! let collection: NestedCollection<String, i32> = nested![1, [2, 3], [4, [5, 6]]];
//!
//! assert_eq!(collection.len(), 3);
//! assert!(collection.get(1usize).is_some_and(|element| element.is_many()));
//! ```

use crate::collection::Collection;

// =============================================================================
// Nested Definition
// =============================================================================

/// A collection element that is either a leaf value or a nested collection.
///
/// `Nested` is the element type accepted by
/// [`Collection::flatten`](crate::Collection::flatten): flattening descends
/// into [`Nested::Many`] elements and passes [`Nested::Value`] elements
/// through unchanged.
///
/// # Type Parameters
///
/// * `K` - The explicit key type of the nested collections
/// * `V` - The leaf value type
///
/// # Examples
///
/// ```rust
/// use collekt::{Collection, Nested};
///
/// let leaf: Nested<String, i32> = Nested::value(1);
/// let group: Nested<String, i32> =
///     Nested::many(Collection::collect([Nested::value(2), Nested::value(3)]));
///
/// assert!(leaf.is_value());
/// assert!(group.is_many());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "K: serde::Serialize, V: serde::Serialize",
        deserialize = "K: serde::Deserialize<'de> + PartialEq, V: serde::Deserialize<'de>"
    ))
)]
pub enum Nested<K, V> {
    /// A leaf value.
    Value(V),
    /// A nested collection of further elements.
    Many(Box<Collection<K, Nested<K, V>>>),
}

/// A collection of [`Nested`] elements.
///
/// Shorthand for the self-referential type that
/// [`Collection::flatten`](crate::Collection::flatten) operates on.
pub type NestedCollection<K, V> = Collection<K, Nested<K, V>>;

impl<K, V> Nested<K, V> {
    /// Wraps a leaf value.
    #[inline]
    #[must_use]
    pub const fn value(value: V) -> Self {
        Self::Value(value)
    }

    /// Wraps a nested collection.
    #[inline]
    #[must_use]
    pub fn many(collection: Collection<K, Self>) -> Self {
        Self::Many(Box::new(collection))
    }

    /// Returns `true` if this element is a leaf value.
    #[inline]
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns `true` if this element is a nested collection.
    #[inline]
    #[must_use]
    pub const fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Returns a reference to the leaf value, `None` for a nested collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Nested;
    ///
    /// let leaf: Nested<String, i32> = Nested::value(7);
    /// assert_eq!(leaf.as_value(), Some(&7));
    /// ```
    #[inline]
    #[must_use]
    pub const fn as_value(&self) -> Option<&V> {
        match self {
            Self::Value(value) => Some(value),
            Self::Many(_) => None,
        }
    }

    /// Returns a reference to the nested collection, `None` for a leaf.
    #[inline]
    #[must_use]
    pub fn as_many(&self) -> Option<&Collection<K, Self>> {
        match self {
            Self::Value(_) => None,
            Self::Many(collection) => Some(collection),
        }
    }

    /// Unwraps the leaf value, `None` for a nested collection.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Value(value) => Some(value),
            Self::Many(_) => None,
        }
    }
}

// =============================================================================
// nested! Macro
// =============================================================================

/// Builds a collection of [`Nested`] elements from a bracketed literal.
///
/// Bracketed groups become [`Nested::Many`] children; every other element
/// becomes a [`Nested::Value`] leaf. Elements must be single token trees:
/// literals, identifiers, nested bracket groups, or parenthesized
/// expressions.
///
/// # Examples
///
/// ```rust
/// use collekt::{nested, NestedCollection};
///
/// let collection: NestedCollection<String, i32> = nested![1, [2, 3], [4, [5, 6]]];
///
/// let flat: Vec<i32> = collection
///     .flatten(2)
///     .iter()
///     .filter_map(|(_, element)| element.as_value().copied())
///     .collect();
/// assert_eq!(flat, vec![1, 2, 3, 4, 5, 6]);
/// ```
#[macro_export]
macro_rules! nested {
    (@element [ $($inner:tt)* ]) => {
        $crate::Nested::many($crate::nested![ $($inner)* ])
    };
    (@element $value:expr) => {
        $crate::Nested::value($value)
    };
    () => {
        $crate::Collection::new()
    };
    ($($element:tt),+ $(,)?) => {
        $crate::Collection::collect(::std::vec![ $( $crate::nested!(@element $element) ),+ ])
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Key;
    use rstest::rstest;

    #[rstest]
    fn test_value_accessors() {
        let leaf: Nested<String, i32> = Nested::value(1);
        assert!(leaf.is_value());
        assert!(!leaf.is_many());
        assert_eq!(leaf.as_value(), Some(&1));
        assert_eq!(leaf.as_many(), None);
        assert_eq!(leaf.into_value(), Some(1));
    }

    #[rstest]
    fn test_many_accessors() {
        let group: Nested<String, i32> =
            Nested::many(Collection::collect([Nested::value(1), Nested::value(2)]));
        assert!(group.is_many());
        assert!(!group.is_value());
        assert_eq!(group.as_value(), None);
        assert_eq!(group.as_many().map(Collection::len), Some(2));
        assert_eq!(group.into_value(), None);
    }

    #[rstest]
    fn test_nested_macro_empty() {
        let collection: NestedCollection<String, i32> = nested![];
        assert!(collection.is_empty());
    }

    #[rstest]
    fn test_nested_macro_flat() {
        let collection: NestedCollection<String, i32> = nested![1, 2, 3];
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.get(0usize), Some(&Nested::value(1)));
        assert_eq!(collection.get(2usize), Some(&Nested::value(3)));
    }

    #[rstest]
    fn test_nested_macro_groups() {
        let collection: NestedCollection<String, i32> = nested![1, [2, 3]];
        assert_eq!(collection.len(), 2);

        let group = collection.get(1usize).and_then(Nested::as_many);
        assert_eq!(group.map(Collection::len), Some(2));
        assert_eq!(
            group.and_then(|inner| inner.get(Key::index(0))),
            Some(&Nested::value(2))
        );
    }

    #[rstest]
    fn test_nested_macro_parenthesized_expressions() {
        let base = 10;
        let collection: NestedCollection<String, i32> = nested![(base + 1), [(base + 2)]];
        assert_eq!(collection.get(0usize), Some(&Nested::value(11)));
    }

    #[rstest]
    fn test_equality_is_structural() {
        let left: NestedCollection<String, i32> = nested![1, [2, 3]];
        let right: NestedCollection<String, i32> = nested![1, [2, 3]];
        assert_eq!(left, right);

        let different: NestedCollection<String, i32> = nested![1, [2, 4]];
        assert_ne!(left, different);
    }
}
