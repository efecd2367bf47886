//! Unbalanced binary search tree map.
//!
//! [`BinarySearchTree`] keeps keys in search-tree order with no rebalancing,
//! so its height depends on insertion order: ascending inserts produce a
//! list-shaped tree. Lookups and traversals are iterative; insertion and
//! removal recurse along the search path and rebuild cached subtree sizes
//! on the way back up.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::{BinarySearchTree, OrderedMap};
//!
//! let mut map: BinarySearchTree<&str, i32> = BinarySearchTree::new();
//! assert_eq!(map.put("T", 1), Ok(true));
//! assert_eq!(map.put("N", 2), Ok(true));
//! assert_eq!(map.put("T", 3), Ok(false)); // put never overwrites
//!
//! map.set("N", 20).unwrap();
//! assert_eq!(map.get("N").unwrap(), Some(&20));
//! assert_eq!(map.keys(), vec![&"N", &"T"]);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::config::MapConfig;
use crate::error::{InvariantViolation, MapResult, reject_empty, require_key};
use crate::map::{OrderedMap, Write, resolve_value};
use crate::node::{self, InsertMode, InsertOutcome, Link, Node};
use crate::traversal::{self, IntoIter, Iter, TraversalOrder};

type BstLink<K, V> = Link<K, V, ()>;
type BstNode<K, V> = Node<K, V, ()>;

// =============================================================================
// BinarySearchTree Definition
// =============================================================================

/// An ordered map backed by an unbalanced binary search tree.
///
/// Every node caches the size of its subtree, so [`len`](OrderedMap::len)
/// is O(1) and [`select`](OrderedMap::select) / [`rank`](OrderedMap::rank)
/// run in O(h).
pub struct BinarySearchTree<K, V> {
    root: BstLink<K, V>,
    config: MapConfig,
}

impl<K, V> BinarySearchTree<K, V> {
    /// Creates an empty map with the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_config(MapConfig::new())
    }

    /// Creates an empty map with the given configuration.
    #[must_use]
    pub const fn with_config(config: MapConfig) -> Self {
        Self { root: None, config }
    }

    /// Lazy in-order iterator over the entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, node::size(&self.root))
    }

    /// Keys in the given traversal order.
    pub fn traverse(&self, order: TraversalOrder) -> Vec<&K> {
        traversal::traverse(&self.root, order)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> BinarySearchTree<K, V> {
    /// Renders the tree one node per line, indented by depth.
    pub fn dump(&self, order: TraversalOrder) -> String {
        traversal::dump(&self.root, order)
    }
}

impl<K: Ord, V> BinarySearchTree<K, V> {
    /// Verifies key order and cached sizes.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        node::check_order_and_size(&self.root, None, None).map(|_| ())
    }

    fn write(&mut self, key: K, value: Option<V>, mode: InsertMode) -> InsertOutcome {
        let (root, outcome) = Self::insert(self.root.take(), key, value, mode);
        self.root = Some(root);
        if outcome.is_inserted() {
            tracing::trace!(len = node::size(&self.root), "bst insert");
        }
        outcome
    }

    fn insert(
        link: BstLink<K, V>,
        key: K,
        value: Option<V>,
        mode: InsertMode,
    ) -> (Box<BstNode<K, V>>, InsertOutcome) {
        let Some(mut node) = link else {
            return (Node::leaf(key, value, ()), InsertOutcome::Inserted);
        };
        let outcome = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, outcome) = Self::insert(node.left.take(), key, value, mode);
                node.left = Some(left);
                outcome
            }
            Ordering::Greater => {
                let (right, outcome) = Self::insert(node.right.take(), key, value, mode);
                node.right = Some(right);
                outcome
            }
            Ordering::Equal => node.store(value, mode),
        };
        node.update_size();
        (node, outcome)
    }

    fn remove_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = Self::delete(self.root.take(), key);
        self.root = root;
        if removed.is_some() {
            tracing::trace!(len = node::size(&self.root), "bst remove");
        }
        removed.is_some()
    }

    /// Removes `key` below `link`, returning the new subtree root and the
    /// detached node that now holds the removed entry.
    fn delete<Q>(
        link: BstLink<K, V>,
        key: &Q,
    ) -> (BstLink<K, V>, Option<Box<BstNode<K, V>>>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(mut node) = link else {
            return (None, None);
        };
        match key.cmp(node.key.borrow()) {
            Ordering::Less => {
                let (left, removed) = Self::delete(node.left.take(), key);
                node.left = left;
                node.update_size();
                (Some(node), removed)
            }
            Ordering::Greater => {
                let (right, removed) = Self::delete(node.right.take(), key);
                node.right = right;
                node.update_size();
                (Some(node), removed)
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => (None, Some(node)),
                (Some(child), None) | (None, Some(child)) => (Some(child), Some(node)),
                (Some(left), Some(right)) => {
                    // The successor's entry moves into this node; the
                    // successor's node carries the removed entry out.
                    let (right, mut successor) = Self::delete_min(right);
                    node.swap_entry(&mut successor);
                    node.left = Some(left);
                    node.right = right;
                    node.update_size();
                    (Some(node), Some(successor))
                }
            },
        }
    }

    fn delete_min(mut node: Box<BstNode<K, V>>) -> (BstLink<K, V>, Box<BstNode<K, V>>) {
        match node.left.take() {
            None => (node.right.take(), node),
            Some(left) => {
                let (left, min) = Self::delete_min(left);
                node.left = left;
                node.update_size();
                (Some(node), min)
            }
        }
    }

    fn delete_max(mut node: Box<BstNode<K, V>>) -> (BstLink<K, V>, Box<BstNode<K, V>>) {
        match node.right.take() {
            None => (node.left.take(), node),
            Some(right) => {
                let (right, max) = Self::delete_max(right);
                node.right = right;
                node.update_size();
                (Some(node), max)
            }
        }
    }
}

// =============================================================================
// OrderedMap Implementation
// =============================================================================

impl<K: Ord, V> OrderedMap<K, V> for BinarySearchTree<K, V> {
    fn config(&self) -> &MapConfig {
        &self.config
    }

    #[inline]
    fn len(&self) -> usize {
        node::size(&self.root)
    }

    fn put(&mut self, key: impl Into<Option<K>>, value: impl Into<Option<V>>) -> MapResult<bool> {
        let key = require_key(key.into(), "put")?;
        match resolve_value(&self.config, value.into()) {
            Write::Store(value) => Ok(self
                .write(key, value, InsertMode::KeepExisting)
                .is_inserted()),
            Write::Remove => {
                self.remove_key(&key);
                Ok(false)
            }
        }
    }

    fn set(&mut self, key: impl Into<Option<K>>, value: impl Into<Option<V>>) -> MapResult<()> {
        let key = require_key(key.into(), "set")?;
        match resolve_value(&self.config, value.into()) {
            Write::Store(value) => {
                self.write(key, value, InsertMode::Overwrite);
            }
            Write::Remove => {
                self.remove_key(&key);
            }
        }
        Ok(())
    }

    fn replace(
        &mut self,
        key: impl Into<Option<K>>,
        value: impl Into<Option<V>>,
    ) -> MapResult<bool> {
        let key = require_key(key.into(), "replace")?;
        match resolve_value(&self.config, value.into()) {
            Write::Store(value) => Ok(node::find_mut(&mut self.root, &key)
                .map(|node| node.store(value, InsertMode::Overwrite))
                .is_some()),
            Write::Remove => Ok(self.remove_key(&key)),
        }
    }

    fn get<'q, Q>(&self, key: impl Into<Option<&'q Q>>) -> MapResult<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'q,
    {
        let key = require_key(key.into(), "get")?;
        Ok(node::find(&self.root, key).and_then(|node| node.value.as_ref()))
    }

    fn remove<'q, Q>(&mut self, key: impl Into<Option<&'q Q>>) -> MapResult<bool>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'q,
    {
        let key = require_key(key.into(), "remove")?;
        Ok(self.remove_key(key))
    }

    fn remove_min(&mut self) -> MapResult<(K, Option<V>)> {
        let root = self
            .root
            .take()
            .ok_or_else(|| reject_empty("remove_min"))?;
        let (root, min) = Self::delete_min(root);
        self.root = root;
        tracing::trace!(len = node::size(&self.root), "bst remove_min");
        Ok(min.into_entry())
    }

    fn remove_max(&mut self) -> MapResult<(K, Option<V>)> {
        let root = self
            .root
            .take()
            .ok_or_else(|| reject_empty("remove_max"))?;
        let (root, max) = Self::delete_max(root);
        self.root = root;
        tracing::trace!(len = node::size(&self.root), "bst remove_max");
        Ok(max.into_entry())
    }

    fn clear(&mut self) {
        // Dismantle iteratively so a list-shaped tree cannot overflow the
        // stack through recursive drops.
        drop(IntoIter::new(self.root.take(), 0));
    }

    fn min(&self) -> Option<(&K, Option<&V>)> {
        node::min_node(&self.root).map(Node::entry)
    }

    fn max(&self) -> Option<(&K, Option<&V>)> {
        node::max_node(&self.root).map(Node::entry)
    }

    fn select(&self, rank: usize) -> Option<&K> {
        node::select(&self.root, rank).map(|node| &node.key)
    }

    fn rank<'q, Q>(&self, key: impl Into<Option<&'q Q>>) -> MapResult<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'q,
    {
        let key = require_key(key.into(), "rank")?;
        Ok(node::rank(&self.root, key))
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, Option<&'a V>)>
    where
        K: 'a,
        V: 'a,
    {
        Self::iter(self)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for BinarySearchTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for BinarySearchTree<K, V> {
    /// Rebuilds the tree bottom-up from a post-order walk, so cloning a
    /// list-shaped tree needs no recursion.
    fn clone(&self) -> Self {
        let mut built: Vec<Box<BstNode<K, V>>> = Vec::new();
        for (source, _) in traversal::visit(&self.root, TraversalOrder::PostOrder) {
            let right = source.right.as_ref().and_then(|_| built.pop());
            let left = source.left.as_ref().and_then(|_| built.pop());
            built.push(Box::new(Node {
                key: source.key.clone(),
                value: source.value.clone(),
                meta: (),
                size: source.size,
                left,
                right,
            }));
        }
        Self {
            root: built.pop(),
            config: self.config,
        }
    }
}

impl<K, V> Drop for BinarySearchTree<K, V> {
    fn drop(&mut self) {
        drop(IntoIter::new(self.root.take(), 0));
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BinarySearchTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for BinarySearchTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.write(key, Some(value), InsertMode::Overwrite);
        }
    }
}

impl<K, V> IntoIterator for BinarySearchTree<K, V> {
    type Item = (K, Option<V>);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let length = node::size(&self.root);
        IntoIter::new(self.root.take(), length)
    }
}

impl<'a, K, V> IntoIterator for &'a BinarySearchTree<K, V> {
    type Item = (&'a K, Option<&'a V>);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for BinarySearchTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        node::size(&self.root) == node::size(&other.root) && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for BinarySearchTree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BinarySearchTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for BinarySearchTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        traversal::fmt_entries(formatter, self.iter())
    }
}
