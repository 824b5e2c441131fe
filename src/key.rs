//! Hybrid collection keys.
//!
//! This module provides [`Key`], the key type used by
//! [`Collection`](crate::Collection), and [`IntoKey`], the conversion trait
//! that lets lookup and insertion methods accept plain indices and string
//! keys directly.
//!
//! # Overview
//!
//! A collection key is either *positional* or *associative*:
//!
//! - [`Key::Index`] holds a non-negative integer position. Index keys
//!   participate in implicit numbering: appending a value without a key
//!   stores it one past the largest index currently present.
//! - [`Key::Name`] holds an explicit caller-supplied key of type `K`.
//!
//! # Examples
//!
//! ```rust
//! use collekt::Key;
//!
//! let positional: Key<String> = Key::index(3);
//! let associative: Key<String> = Key::name("title".to_string());
//!
//! assert!(positional.is_index());
//! assert_eq!(positional.as_index(), Some(3));
//! assert!(associative.is_name());
//! ```

use std::fmt;

// =============================================================================
// Key Definition
// =============================================================================

/// A hybrid collection key: a positional index or an explicit name.
///
/// `Key` is the type under which every [`Collection`](crate::Collection)
/// entry is stored. Values appended without a key receive sequential
/// [`Key::Index`] keys, while explicitly keyed values are stored under
/// [`Key::Name`] (or an explicit `Index`, which participates in the implicit
/// numbering).
///
/// # Examples
///
/// ```rust
/// use collekt::{Collection, Key};
///
/// let mut collection: Collection<String, i32> = Collection::new();
/// collection.add(10).add_at("ten", 10);
///
/// let keys: Vec<Key<String>> = collection.iter().map(|(key, _)| key.clone()).collect();
/// assert_eq!(keys, vec![Key::index(0), Key::name("ten".to_string())]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key<K> {
    /// A positional integer key.
    Index(usize),
    /// An explicit caller-supplied key.
    Name(K),
}

impl<K> Key<K> {
    /// Creates a positional key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Key;
    ///
    /// let key: Key<String> = Key::index(0);
    /// assert_eq!(key.as_index(), Some(0));
    /// ```
    #[inline]
    #[must_use]
    pub const fn index(index: usize) -> Self {
        Self::Index(index)
    }

    /// Creates an explicit key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collekt::Key;
    ///
    /// let key = Key::name("title".to_string());
    /// assert_eq!(key.as_name(), Some(&"title".to_string()));
    /// ```
    #[inline]
    #[must_use]
    pub const fn name(name: K) -> Self {
        Self::Name(name)
    }

    /// Returns `true` if this is a positional key.
    #[inline]
    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    /// Returns `true` if this is an explicit key.
    #[inline]
    #[must_use]
    pub const fn is_name(&self) -> bool {
        matches!(self, Self::Name(_))
    }

    /// Returns the position of a positional key, `None` for an explicit key.
    #[inline]
    #[must_use]
    pub const fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(_) => None,
        }
    }

    /// Returns a reference to the explicit key, `None` for a positional key.
    #[inline]
    #[must_use]
    pub const fn as_name(&self) -> Option<&K> {
        match self {
            Self::Index(_) => None,
            Self::Name(name) => Some(name),
        }
    }
}

impl<K: fmt::Display> fmt::Display for Key<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(formatter, "{index}"),
            Self::Name(name) => write!(formatter, "{name}"),
        }
    }
}

// =============================================================================
// IntoKey Conversion
// =============================================================================

/// Conversion into a [`Key`].
///
/// Lookup and insertion methods on [`Collection`](crate::Collection) accept
/// any `IntoKey` argument, so call sites can pass a plain `usize` for
/// positional access or a string for associative access instead of spelling
/// out the `Key` variant:
///
/// ```rust
/// use collekt::Collection;
///
/// let mut collection: Collection<String, i32> = Collection::new();
/// collection.add(1).add_at("two", 2);
///
/// assert_eq!(collection.get(0), Some(&1));
/// assert_eq!(collection.get("two"), Some(&2));
/// ```
///
/// Integer arguments always convert to [`Key::Index`]; the implicit-append
/// numbering treats them exactly like auto-assigned positions. Collections
/// keyed by a custom `K` construct [`Key::Name`] directly, which converts via
/// the identity implementation.
pub trait IntoKey<K> {
    /// Converts `self` into a [`Key`].
    fn into_key(self) -> Key<K>;
}

impl<K> IntoKey<K> for Key<K> {
    #[inline]
    fn into_key(self) -> Key<K> {
        self
    }
}

impl<K> IntoKey<K> for usize {
    #[inline]
    fn into_key(self) -> Key<K> {
        Key::Index(self)
    }
}

impl IntoKey<String> for String {
    #[inline]
    fn into_key(self) -> Key<String> {
        Key::Name(self)
    }
}

impl IntoKey<String> for &str {
    #[inline]
    fn into_key(self) -> Key<String> {
        Key::Name(self.to_string())
    }
}

impl IntoKey<String> for &String {
    #[inline]
    fn into_key(self) -> Key<String> {
        Key::Name(self.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
