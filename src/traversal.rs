//! Traversals shared by both tree variants.
//!
//! In-order iteration is lazy and uses an explicit stack, so a degenerate
//! (list-shaped) binary search tree can be walked without deep recursion.
//! Every call starts a fresh traversal.
//!
//! Pre-order and post-order exist for debugging dumps only.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::{BinarySearchTree, OrderedMap, TraversalOrder};
//!
//! let mut map: BinarySearchTree<&str, String> = BinarySearchTree::new();
//! for key in ["M", "C", "X", "A"] {
//!     map.put(key, key.to_lowercase()).unwrap();
//! }
//!
//! assert_eq!(map.traverse(TraversalOrder::PreOrder), vec![&"M", &"C", &"A", &"X"]);
//! assert_eq!(map.traverse(TraversalOrder::InOrder), vec![&"A", &"C", &"M", &"X"]);
//! assert_eq!(map.traverse(TraversalOrder::PostOrder), vec![&"A", &"C", &"X", &"M"]);
//! ```

use std::fmt;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::node::{Link, Node};

/// Inline capacity of traversal stacks. A red-black tree of this height
/// already holds millions of entries, so the stack rarely spills.
const STACK_INLINE: usize = 48;

// =============================================================================
// TraversalOrder
// =============================================================================

/// The order in which a traversal visits nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraversalOrder {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, node, right subtree. Yields ascending keys.
    #[default]
    InOrder,
    /// Left subtree, right subtree, then node.
    PostOrder,
}

/// Per-node text appended to dump lines.
pub(crate) trait NodeLabel {
    fn label(&self) -> Option<&'static str>;
}

impl NodeLabel for () {
    fn label(&self) -> Option<&'static str> {
        None
    }
}

// =============================================================================
// Iter
// =============================================================================

/// A lazy in-order iterator over the entries of a tree.
///
/// Yields `(key, value)` pairs in ascending key order. The value is `None`
/// for entries stored without a value.
pub struct Iter<'a, K, V, M = ()> {
    stack: SmallVec<[&'a Node<K, V, M>; STACK_INLINE]>,
    remaining: usize,
}

impl<'a, K, V, M> Iter<'a, K, V, M> {
    pub(crate) fn new(root: &'a Link<K, V, M>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root.as_deref());
        iterator
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V, M>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, K, V, M> Iterator for Iter<'a, K, V, M> {
    type Item = (&'a K, Option<&'a V>);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, M> ExactSizeIterator for Iter<'_, K, V, M> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, M> FusedIterator for Iter<'_, K, V, M> {}

// =============================================================================
// IntoIter
// =============================================================================

/// An owning in-order iterator, dismantling the tree as it goes.
pub struct IntoIter<K, V, M = ()> {
    stack: SmallVec<[Box<Node<K, V, M>>; STACK_INLINE]>,
    remaining: usize,
}

impl<K, V, M> IntoIter<K, V, M> {
    pub(crate) fn new(root: Link<K, V, M>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut link: Link<K, V, M>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V, M> Iterator for IntoIter<K, V, M> {
    type Item = (K, Option<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.push_left_spine(node.right.take());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.into_entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, M> ExactSizeIterator for IntoIter<K, V, M> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, M> FusedIterator for IntoIter<K, V, M> {}

impl<K, V, M> Drop for IntoIter<K, V, M> {
    fn drop(&mut self) {
        // Detach nodes one at a time instead of dropping whole subtrees.
        for _ in self.by_ref() {}
    }
}

// =============================================================================
// Ordered visits
// =============================================================================

/// Visits every node in `order`, pairing it with its depth (root is 0).
pub(crate) fn visit<K, V, M>(
    root: &Link<K, V, M>,
    order: TraversalOrder,
) -> Vec<(&Node<K, V, M>, usize)> {
    let mut visited = Vec::new();
    let mut stack: SmallVec<[(&Node<K, V, M>, usize); STACK_INLINE]> = SmallVec::new();

    match order {
        TraversalOrder::PreOrder => {
            stack.extend(root.as_deref().map(|node| (node, 0)));
            while let Some((node, depth)) = stack.pop() {
                visited.push((node, depth));
                stack.extend(node.right.as_deref().map(|right| (right, depth + 1)));
                stack.extend(node.left.as_deref().map(|left| (left, depth + 1)));
            }
        }
        TraversalOrder::InOrder => {
            let mut current = root.as_deref().map(|node| (node, 0));
            loop {
                while let Some((node, depth)) = current {
                    stack.push((node, depth));
                    current = node.left.as_deref().map(|left| (left, depth + 1));
                }
                let Some((node, depth)) = stack.pop() else {
                    break;
                };
                visited.push((node, depth));
                current = node.right.as_deref().map(|right| (right, depth + 1));
            }
        }
        TraversalOrder::PostOrder => {
            // Node, right, left reversed is left, right, node.
            stack.extend(root.as_deref().map(|node| (node, 0)));
            while let Some((node, depth)) = stack.pop() {
                visited.push((node, depth));
                stack.extend(node.left.as_deref().map(|left| (left, depth + 1)));
                stack.extend(node.right.as_deref().map(|right| (right, depth + 1)));
            }
            visited.reverse();
        }
    }

    visited
}

/// Keys of every node in `order`.
pub(crate) fn traverse<K, V, M>(root: &Link<K, V, M>, order: TraversalOrder) -> Vec<&K> {
    visit(root, order)
        .into_iter()
        .map(|(node, _)| &node.key)
        .collect()
}

/// One line per node in `order`, indented two spaces per level.
pub(crate) fn dump<K, V, M>(root: &Link<K, V, M>, order: TraversalOrder) -> String
where
    K: fmt::Debug,
    V: fmt::Debug,
    M: NodeLabel,
{
    let mut output = String::new();
    for (node, depth) in visit(root, order) {
        let value = node
            .value
            .as_ref()
            .map_or_else(|| "none".to_owned(), |value| format!("{value:?}"));
        output.push_str(&"  ".repeat(depth));
        output.push_str(&format!("{:?} => {value}", node.key));
        if let Some(label) = node.meta.label() {
            output.push_str(&format!(" [{label}]"));
        }
        output.push('\n');
    }
    output
}

/// Writes entries as `{k: v, ...}`, printing absent values as `none`.
pub(crate) fn fmt_entries<'a, K, V, I>(formatter: &mut fmt::Formatter<'_>, entries: I) -> fmt::Result
where
    K: fmt::Display + 'a,
    V: fmt::Display + 'a,
    I: IntoIterator<Item = (&'a K, Option<&'a V>)>,
{
    write!(formatter, "{{")?;
    let mut first = true;
    for (key, value) in entries {
        if first {
            first = false;
        } else {
            write!(formatter, ", ")?;
        }
        match value {
            Some(value) => write!(formatter, "{key}: {value}")?,
            None => write!(formatter, "{key}: none")?,
        }
    }
    write!(formatter, "}}")
}
