//! Left-leaning red-black tree map.
//!
//! This module provides [`RedBlackTree`], an ordered map that stays balanced
//! under any insertion or removal order.
//!
//! # Overview
//!
//! The tree is a left-leaning red-black tree: a binary encoding of a 2-3
//! tree where every red link leans left. It maintains these invariants:
//!
//! 1. Absent children count as black
//! 2. No red node has a red child
//! 3. Every path from a node to a null leaf crosses the same number of
//!    black links
//! 4. The root is black once a public operation returns
//! 5. New nodes are red
//! 6. Red links only lean left
//!
//! These keep the height below `2 log2(N + 1)`.
//!
//! Repair happens on the way back up each recursive call, using three
//! primitives: rotate left, rotate right and color flip. Removal first
//! pushes a red link down the search path ("borrowing" from a sibling or
//! merging with it) so the node finally unlinked is always part of a 3- or
//! 4-node, then repairs upward with the same primitives.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::{OrderedMap, RedBlackTree};
//!
//! let mut map: RedBlackTree<i32, i32> = RedBlackTree::new();
//! for key in 0..1_000 {
//!     map.put(key, key * 2).unwrap();
//! }
//!
//! assert!(map.height() <= 20);
//! assert_eq!(map.check_invariants().map(|_| ()), Ok(()));
//!
//! assert_eq!(map.remove(&500), Ok(true));
//! assert_eq!(map.get(&500), Ok(None));
//! assert_eq!(map.len(), 999);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::config::MapConfig;
use crate::error::{InvariantViolation, MapResult, reject_empty, require_key};
use crate::map::{OrderedMap, Write, resolve_value};
use crate::node::{self, InsertMode, InsertOutcome, Link, Node};
use crate::traversal::{self, IntoIter, Iter, NodeLabel, TraversalOrder};

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a red-black tree node, i.e. of the link from its parent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    /// The node is glued to its parent into a 3- or 4-node.
    Red,
    /// An ordinary link.
    Black,
}

impl Color {
    /// The opposite color.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

impl NodeLabel for Color {
    fn label(&self) -> Option<&'static str> {
        match self {
            Self::Red => Some("red"),
            Self::Black => Some("black"),
        }
    }
}

type RbLink<K, V> = Link<K, V, Color>;
type RbNode<K, V> = Node<K, V, Color>;

/// Checks if an optional node is red. Absent nodes are black.
fn is_red<K, V>(link: &RbLink<K, V>) -> bool {
    link.as_ref().is_some_and(|node| node.meta == Color::Red)
}

/// Checks if the left child of an optional node is red.
fn is_left_red<K, V>(link: &RbLink<K, V>) -> bool {
    link.as_ref().is_some_and(|node| is_red(&node.left))
}

// =============================================================================
// RedBlackTree Definition
// =============================================================================

/// An ordered map backed by a left-leaning red-black tree.
///
/// Exposes the same [`OrderedMap`] contract as
/// [`BinarySearchTree`](crate::BinarySearchTree) with logarithmic height.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `get`          | O(log N)   |
/// | `put` / `set`  | O(log N)   |
/// | `remove`       | O(log N)   |
/// | `remove_min`   | O(log N)   |
/// | `select`       | O(log N)   |
/// | `len`          | O(1)       |
#[derive(Clone)]
pub struct RedBlackTree<K, V> {
    root: RbLink<K, V>,
    config: MapConfig,
}

impl<K, V> RedBlackTree<K, V> {
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
    pub fn iter(&self) -> Iter<'_, K, V, Color> {
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

    /// Color of the root, `None` when empty.
    pub fn root_color(&self) -> Option<Color> {
        self.root.as_ref().map(|root| root.meta)
    }

    /// Forces the root black, as every public mutation must leave it.
    fn blacken_root(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.meta = Color::Black;
        }
    }

    /// Reddens the root when both its children are black, so the first
    /// step of a removal always starts inside a 3-node.
    fn redden_root_for_removal(&mut self) {
        if let Some(root) = self.root.as_mut()
            && !is_red(&root.left)
            && !is_red(&root.right)
        {
            root.meta = Color::Red;
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> RedBlackTree<K, V> {
    /// Renders the tree one node per line, indented by depth and tagged
    /// with each node's color.
    pub fn dump(&self, order: TraversalOrder) -> String {
        traversal::dump(&self.root, order)
    }
}

// =============================================================================
// Rebalancing primitives
// =============================================================================

impl<K, V> RedBlackTree<K, V> {
    /// Promotes the red right child of `node`.
    ///
    /// ```text
    ///      node                 right
    ///     /    \    (red)      /     \
    ///   a       right   =>   node     c
    ///          /     \      /    \
    ///         b       c    a      b
    /// ```
    fn rotate_left(mut node: Box<RbNode<K, V>>) -> Box<RbNode<K, V>> {
        let Some(mut right) = node.right.take() else {
            return node;
        };
        node.right = right.left.take();
        right.meta = node.meta;
        node.meta = Color::Red;
        node.update_size();
        right.left = Some(node);
        right.update_size();
        right
    }

    /// Promotes the red left child of `node`.
    ///
    /// The promoted child takes the old color of `node`, which turns red.
    fn rotate_right(mut node: Box<RbNode<K, V>>) -> Box<RbNode<K, V>> {
        let Some(mut left) = node.left.take() else {
            return node;
        };
        node.left = left.right.take();
        left.meta = node.meta;
        node.meta = Color::Red;
        node.update_size();
        left.right = Some(node);
        left.update_size();
        left
    }

    /// Toggles the colors of `node` and both of its children.
    fn flip_colors(node: &mut RbNode<K, V>) {
        node.meta = node.meta.flipped();
        for child in [node.left.as_mut(), node.right.as_mut()].into_iter().flatten() {
            child.meta = child.meta.flipped();
        }
    }

    /// Restores the left-leaning shape at `node` after a change below it
    /// and recomputes its size.
    fn fix_up(mut node: Box<RbNode<K, V>>) -> Box<RbNode<K, V>> {
        if is_red(&node.right) && !is_red(&node.left) {
            node = Self::rotate_left(node);
        }
        if is_red(&node.left) && is_left_red(&node.left) {
            node = Self::rotate_right(node);
        }
        if is_red(&node.left) && is_red(&node.right) {
            Self::flip_colors(&mut node);
        }
        node.update_size();
        node
    }

    /// Makes the left child or one of its children red, borrowing from the
    /// right sibling when it has a red link to spare.
    fn move_red_left(mut node: Box<RbNode<K, V>>) -> Box<RbNode<K, V>> {
        Self::flip_colors(&mut node);
        if is_left_red(&node.right) {
            node.right = node.right.take().map(Self::rotate_right);
            node = Self::rotate_left(node);
            Self::flip_colors(&mut node);
        }
        node
    }

    /// Makes the right child or one of its children red, borrowing from the
    /// left sibling when it has a red link to spare.
    fn move_red_right(mut node: Box<RbNode<K, V>>) -> Box<RbNode<K, V>> {
        Self::flip_colors(&mut node);
        if is_left_red(&node.left) {
            node = Self::rotate_right(node);
            Self::flip_colors(&mut node);
        }
        node
    }

    /// Unlinks the smallest node below `node`.
    ///
    /// Returns the new subtree root and the detached node.
    fn delete_min(mut node: Box<RbNode<K, V>>) -> (RbLink<K, V>, Box<RbNode<K, V>>) {
        if node.left.is_none() {
            return (node.right.take(), node);
        }
        if !is_red(&node.left) && !is_left_red(&node.left) {
            node = Self::move_red_left(node);
        }
        let Some(left) = node.left.take() else {
            return (node.right.take(), node);
        };
        let (left, min) = Self::delete_min(left);
        node.left = left;
        (Some(Self::fix_up(node)), min)
    }

    /// Unlinks the largest node below `node`.
    fn delete_max(mut node: Box<RbNode<K, V>>) -> (RbLink<K, V>, Box<RbNode<K, V>>) {
        if is_red(&node.left) {
            node = Self::rotate_right(node);
        }
        if node.right.is_none() {
            return (node.left.take(), node);
        }
        if !is_red(&node.right) && !is_left_red(&node.right) {
            node = Self::move_red_right(node);
        }
        let Some(right) = node.right.take() else {
            return (node.left.take(), node);
        };
        let (right, max) = Self::delete_max(right);
        node.right = right;
        (Some(Self::fix_up(node)), max)
    }
}

impl<K: Ord, V> RedBlackTree<K, V> {
    /// Verifies every red-black invariant, key order and cached sizes.
    ///
    /// Returns the black height of the tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        if is_red(&self.root) {
            return Err(InvariantViolation::RedRoot);
        }
        Self::check_subtree(&self.root, None, None).map(|(black_height, _)| black_height)
    }

    /// Returns `(black height, size)` of the subtree.
    fn check_subtree(
        link: &RbLink<K, V>,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Result<(usize, usize), InvariantViolation> {
        let Some(node) = link.as_deref() else {
            return Ok((0, 0));
        };
        node::check_bounds(&node.key, lower, upper)?;
        if is_red(&node.right) {
            return Err(InvariantViolation::RightLeaningRed);
        }
        if node.meta == Color::Red && is_red(&node.left) {
            return Err(InvariantViolation::ConsecutiveReds);
        }
        let (left_black, left_size) = Self::check_subtree(&node.left, lower, Some(&node.key))?;
        let (right_black, right_size) = Self::check_subtree(&node.right, Some(&node.key), upper)?;
        if left_black != right_black {
            return Err(InvariantViolation::UnbalancedBlackHeight {
                left: left_black,
                right: right_black,
            });
        }
        let size = node::check_size(node, left_size + right_size + 1)?;
        let own = usize::from(node.meta == Color::Black);
        Ok((left_black + own, size))
    }

    fn write(&mut self, key: K, value: Option<V>, mode: InsertMode) -> InsertOutcome {
        let (root, outcome) = Self::insert(self.root.take(), key, value, mode);
        self.root = Some(root);
        self.blacken_root();
        if outcome.is_inserted() {
            tracing::trace!(len = node::size(&self.root), "red-black insert");
        }
        outcome
    }

    fn insert(
        link: RbLink<K, V>,
        key: K,
        value: Option<V>,
        mode: InsertMode,
    ) -> (Box<RbNode<K, V>>, InsertOutcome) {
        let Some(mut node) = link else {
            return (Node::leaf(key, value, Color::Red), InsertOutcome::Inserted);
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
        (Self::fix_up(node), outcome)
    }

    fn remove_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if node::find(&self.root, key).is_none() {
            return false;
        }
        self.redden_root_for_removal();
        let (root, removed) = match self.root.take() {
            Some(root) => Self::delete(root, key),
            None => (None, None),
        };
        self.root = root;
        self.blacken_root();
        if removed.is_some() {
            tracing::trace!(len = node::size(&self.root), "red-black remove");
        }
        removed.is_some()
    }

    /// Removes `key` below `node`, returning the new subtree root and the
    /// detached node that now holds the removed entry.
    ///
    /// The caller guarantees `key` is present.
    fn delete<Q>(
        mut node: Box<RbNode<K, V>>,
        key: &Q,
    ) -> (RbLink<K, V>, Option<Box<RbNode<K, V>>>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if key.cmp(node.key.borrow()) == Ordering::Less {
            if node.left.is_none() {
                return (Some(node), None);
            }
            if !is_red(&node.left) && !is_left_red(&node.left) {
                node = Self::move_red_left(node);
            }
            let Some(left) = node.left.take() else {
                return (Some(Self::fix_up(node)), None);
            };
            let (left, removed) = Self::delete(left, key);
            node.left = left;
            return (Some(Self::fix_up(node)), removed);
        }

        if is_red(&node.left) {
            node = Self::rotate_right(node);
        }
        if key.cmp(node.key.borrow()) == Ordering::Equal && node.right.is_none() {
            return (node.left.take(), Some(node));
        }
        if node.right.is_none() {
            return (Some(Self::fix_up(node)), None);
        }
        if !is_red(&node.right) && !is_left_red(&node.right) {
            node = Self::move_red_right(node);
        }
        let Some(right) = node.right.take() else {
            return (Some(Self::fix_up(node)), None);
        };
        let removed = if key.cmp(node.key.borrow()) == Ordering::Equal {
            // Swap in the successor's entry and unlink the successor.
            let (right, mut successor) = Self::delete_min(right);
            node.swap_entry(&mut successor);
            node.right = right;
            Some(successor)
        } else {
            let (right, removed) = Self::delete(right, key);
            node.right = right;
            removed
        };
        (Some(Self::fix_up(node)), removed)
    }

    fn remove_extreme(
        &mut self,
        operation: &'static str,
        delete: fn(Box<RbNode<K, V>>) -> (RbLink<K, V>, Box<RbNode<K, V>>),
    ) -> MapResult<(K, Option<V>)> {
        self.redden_root_for_removal();
        let root = self.root.take().ok_or_else(|| reject_empty(operation))?;
        let (root, removed) = delete(root);
        self.root = root;
        self.blacken_root();
        tracing::trace!(len = node::size(&self.root), operation, "red-black remove extreme");
        Ok(removed.into_entry())
    }
}

// =============================================================================
// OrderedMap Implementation
// =============================================================================

impl<K: Ord, V> OrderedMap<K, V> for RedBlackTree<K, V> {
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
        self.remove_extreme("remove_min", Self::delete_min)
    }

    fn remove_max(&mut self) -> MapResult<(K, Option<V>)> {
        self.remove_extreme("remove_max", Self::delete_max)
    }

    fn clear(&mut self) {
        self.root = None;
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

impl<K, V> Default for RedBlackTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RedBlackTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RedBlackTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.write(key, Some(value), InsertMode::Overwrite);
        }
    }
}

impl<K, V> IntoIterator for RedBlackTree<K, V> {
    type Item = (K, Option<V>);
    type IntoIter = IntoIter<K, V, Color>;

    fn into_iter(self) -> Self::IntoIter {
        let length = node::size(&self.root);
        IntoIter::new(self.root, length)
    }
}

impl<'a, K, V> IntoIterator for &'a RedBlackTree<K, V> {
    type Item = (&'a K, Option<&'a V>);
    type IntoIter = Iter<'a, K, V, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RedBlackTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        node::size(&self.root) == node::size(&other.root) && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RedBlackTree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RedBlackTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for RedBlackTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        traversal::fmt_entries(formatter, self.iter())
    }
}
