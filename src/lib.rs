//! # collekt
//!
//! An order-preserving hybrid indexed/associative collection with a fluent,
//! chainable API.
//!
//! ## Overview
//!
//! The crate provides one core type, [`Collection`]: an ordered container
//! whose entries are keyed either by explicit keys or by auto-assigned
//! sequential indices ([`Key`]), with two method families:
//!
//! - **Mutating operations** (`add`, `add_at`, `remove`, `reset`, `sort`,
//!   `pop`) operate in place and return the receiver for chaining.
//! - **Derivation operations** (`map`, `filter`, `flatten`, `reverse`,
//!   `unique`, `keys`, `merge`, `flip`) return a new, independently owned
//!   collection and leave the receiver untouched.
//!
//! Recursive flattening is expressed through the [`Nested`] element type and
//! the [`nested!`] literal macro.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` implementations for [`Collection`],
//!   [`Key`], and [`Nested`]
//!
//! ## Example
//!
//! ```rust
//! use collekt::Collection;
//!
//! let mut collection: Collection<String, i32> = Collection::new();
//! collection.add(1).add(2).add_at("ten", 10);
//!
//! let even = collection.filter(|value| value % 2 == 0);
//! assert_eq!(even.len(), 2);
//! assert_eq!(collection.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod collection;
pub mod key;
pub mod nested;

pub use collection::{Collection, CollectionIntoIterator, CollectionIterator};
pub use key::{IntoKey, Key};
pub use nested::{Nested, NestedCollection};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use collekt::prelude::*;
///
/// let collection: Collection<String, i32> = Collection::collect([1, 2, 3]);
/// assert_eq!(collection.len(), 3);
/// ```
pub mod prelude {
    pub use crate::collection::{Collection, CollectionIntoIterator, CollectionIterator};
    pub use crate::key::{IntoKey, Key};
    pub use crate::nested::{Nested, NestedCollection};
}
