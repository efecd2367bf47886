//! The ordered map contract shared by both tree variants.
//!
//! [`BinarySearchTree`](crate::BinarySearchTree) and
//! [`RedBlackTree`](crate::RedBlackTree) implement [`OrderedMap`] with the
//! same observable behavior, so callers written against the trait accept
//! either.
//!
//! # Key and value arguments
//!
//! Keys are taken as `impl Into<Option<K>>` (or `impl Into<Option<&Q>>` for
//! lookups): a plain key is present, `None` is an absent key and fails with
//! [`MapError::InvalidArgument`](crate::MapError::InvalidArgument) before the
//! tree is touched. Values are taken as `impl Into<Option<V>>`; what an
//! absent value means is decided by the map's
//! [`NullValuePolicy`](crate::NullValuePolicy).
//!
//! # Examples
//!
//! ```rust
//! use ordtree::{BinarySearchTree, OrderedMap, RedBlackTree};
//!
//! fn fill<M: OrderedMap<String, u32>>(map: &mut M) {
//!     for (index, word) in ["pear", "apple", "fig"].into_iter().enumerate() {
//!         map.put(word.to_string(), index as u32).unwrap();
//!     }
//! }
//!
//! let mut plain: BinarySearchTree<String, u32> = BinarySearchTree::new();
//! let mut balanced: RedBlackTree<String, u32> = RedBlackTree::new();
//! fill(&mut plain);
//! fill(&mut balanced);
//!
//! assert_eq!(plain.keys(), balanced.keys());
//! assert_eq!(balanced.get("fig").unwrap(), Some(&2));
//! ```

use std::borrow::Borrow;

use crate::config::MapConfig;
use crate::error::MapResult;

/// A map from unique, totally ordered keys to values.
///
/// | Operation      | `BinarySearchTree` | `RedBlackTree` |
/// |----------------|--------------------|----------------|
/// | `get`          | O(h)               | O(log N)       |
/// | `put` / `set`  | O(h)               | O(log N)       |
/// | `remove`       | O(h)               | O(log N)       |
/// | `select`/`rank`| O(h)               | O(log N)       |
/// | `len`          | O(1)               | O(1)           |
/// | `keys`         | O(N)               | O(N)           |
///
/// `h` is the height of the unbalanced tree, N in the worst case.
pub trait OrderedMap<K: Ord, V> {
    /// The configuration the map was built with.
    fn config(&self) -> &MapConfig;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the map holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `key` if it is not already present.
    ///
    /// Returns `Ok(true)` if a new entry was created. A present key keeps
    /// its value and yields `Ok(false)`.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidArgument`](crate::MapError::InvalidArgument) if
    /// `key` is absent.
    fn put(&mut self, key: impl Into<Option<K>>, value: impl Into<Option<V>>) -> MapResult<bool>;

    /// Inserts `key` or overwrites its value.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidArgument`](crate::MapError::InvalidArgument) if
    /// `key` is absent.
    fn set(&mut self, key: impl Into<Option<K>>, value: impl Into<Option<V>>) -> MapResult<()>;

    /// Overwrites the value of a present key.
    ///
    /// Returns `Ok(false)` without changing anything if `key` is missing.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidArgument`](crate::MapError::InvalidArgument) if
    /// `key` is absent.
    fn replace(&mut self, key: impl Into<Option<K>>, value: impl Into<Option<V>>)
    -> MapResult<bool>;

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidArgument`](crate::MapError::InvalidArgument) if
    /// `key` is absent.
    fn get<'q, Q>(&self, key: impl Into<Option<&'q Q>>) -> MapResult<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'q;

    /// Returns `true` if `key` maps to a present value.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidArgument`](crate::MapError::InvalidArgument) if
    /// `key` is absent.
    fn contains_key<'q, Q>(&self, key: impl Into<Option<&'q Q>>) -> MapResult<bool>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'q,
    {
        Ok(self.get(key)?.is_some())
    }

    /// Removes `key`, returning `Ok(true)` if it was present.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidArgument`](crate::MapError::InvalidArgument) if
    /// `key` is absent.
    fn remove<'q, Q>(&mut self, key: impl Into<Option<&'q Q>>) -> MapResult<bool>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'q;

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// [`MapError::EmptyCollection`](crate::MapError::EmptyCollection) if
    /// the map is empty.
    fn remove_min(&mut self) -> MapResult<(K, Option<V>)>;

    /// Removes and returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// [`MapError::EmptyCollection`](crate::MapError::EmptyCollection) if
    /// the map is empty.
    fn remove_max(&mut self) -> MapResult<(K, Option<V>)>;

    /// Removes every entry.
    fn clear(&mut self);

    /// The entry with the smallest key.
    fn min(&self) -> Option<(&K, Option<&V>)>;

    /// The entry with the largest key.
    fn max(&self) -> Option<(&K, Option<&V>)>;

    /// The key with `rank` smaller keys, if `rank < len()`.
    fn select(&self, rank: usize) -> Option<&K>;

    /// Number of keys strictly smaller than `key`.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidArgument`](crate::MapError::InvalidArgument) if
    /// `key` is absent.
    fn rank<'q, Q>(&self, key: impl Into<Option<&'q Q>>) -> MapResult<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'q;

    /// Lazy in-order iteration over `(key, value)` pairs.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, Option<&'a V>)>
    where
        K: 'a,
        V: 'a;

    /// Every key in ascending order.
    fn keys<'a>(&'a self) -> Vec<&'a K>
    where
        K: 'a,
        V: 'a,
    {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Every present value, in key order.
    fn values<'a>(&'a self) -> Vec<&'a V>
    where
        K: 'a,
        V: 'a,
    {
        self.iter().filter_map(|(_, value)| value).collect()
    }
}

/// What a write should do once the null value policy has been applied.
pub(crate) enum Write<V> {
    Store(Option<V>),
    Remove,
}

/// Resolves an incoming value against the map's null value policy.
pub(crate) fn resolve_value<V>(config: &MapConfig, value: Option<V>) -> Write<V> {
    match value {
        None if !config.allows_null_values() => Write::Remove,
        value => Write::Store(value),
    }
}
