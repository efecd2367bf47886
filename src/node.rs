//! Node shape and read-only searches shared by both tree variants.
//!
//! A node is generic over a metadata slot `M`: the plain binary search tree
//! stores `()`, the red-black tree stores its [`Color`](crate::Color). Every
//! helper here only reads keys, values, links and cached sizes, so both
//! variants share them unchanged.

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::error::InvariantViolation;

/// An owned, possibly absent subtree.
pub(crate) type Link<K, V, M> = Option<Box<Node<K, V, M>>>;

// =============================================================================
// Node Definition
// =============================================================================

/// A tree node. Each node exclusively owns both of its subtrees.
#[derive(Clone)]
pub(crate) struct Node<K, V, M> {
    pub(crate) key: K,
    pub(crate) value: Option<V>,
    pub(crate) meta: M,
    /// Nodes in the subtree rooted here, this one included.
    pub(crate) size: usize,
    pub(crate) left: Link<K, V, M>,
    pub(crate) right: Link<K, V, M>,
}

impl<K, V, M> Node<K, V, M> {
    /// Creates a detached node with `size == 1`.
    pub(crate) fn leaf(key: K, value: Option<V>, meta: M) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            meta,
            size: 1,
            left: None,
            right: None,
        })
    }

    /// Recomputes the cached size from the children.
    pub(crate) fn update_size(&mut self) {
        self.size = 1 + size(&self.left) + size(&self.right);
    }

    /// Stores `value` according to `mode` and reports what happened.
    pub(crate) fn store(&mut self, value: Option<V>, mode: InsertMode) -> InsertOutcome {
        match mode {
            InsertMode::KeepExisting => InsertOutcome::Kept,
            InsertMode::Overwrite => {
                self.value = value;
                InsertOutcome::Updated
            }
        }
    }

    /// Exchanges the entries of two nodes, leaving links and metadata alone.
    pub(crate) fn swap_entry(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.key, &mut other.key);
        std::mem::swap(&mut self.value, &mut other.value);
    }

    /// Consumes a detached node, returning its entry.
    pub(crate) fn into_entry(self: Box<Self>) -> (K, Option<V>) {
        let node = *self;
        (node.key, node.value)
    }

    pub(crate) fn entry(&self) -> (&K, Option<&V>) {
        (&self.key, self.value.as_ref())
    }
}

/// Cached size of a subtree, `0` when absent.
#[inline]
pub(crate) fn size<K, V, M>(link: &Link<K, V, M>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

// =============================================================================
// Insertion bookkeeping
// =============================================================================

/// How an insertion treats a key that is already present.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum InsertMode {
    /// Leave the stored value untouched (`put`).
    KeepExisting,
    /// Replace the stored value (`set`, `replace`).
    Overwrite,
}

/// What an insertion did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum InsertOutcome {
    Inserted,
    Updated,
    Kept,
}

impl InsertOutcome {
    pub(crate) const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}

// =============================================================================
// Searches
// =============================================================================

/// Finds the node holding `key` without recursion.
pub(crate) fn find<'a, K, V, M, Q>(link: &'a Link<K, V, M>, key: &Q) -> Option<&'a Node<K, V, M>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = link.as_deref();
    while let Some(node) = current {
        current = match key.cmp(node.key.borrow()) {
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
            Ordering::Equal => return Some(node),
        };
    }
    None
}

/// Mutable variant of [`find`].
pub(crate) fn find_mut<'a, K, V, M, Q>(
    link: &'a mut Link<K, V, M>,
    key: &Q,
) -> Option<&'a mut Node<K, V, M>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = link.as_deref_mut();
    while let Some(node) = current {
        current = match key.cmp(node.key.borrow()) {
            Ordering::Less => node.left.as_deref_mut(),
            Ordering::Greater => node.right.as_deref_mut(),
            Ordering::Equal => return Some(node),
        };
    }
    None
}

/// Leftmost node of a subtree.
pub(crate) fn min_node<K, V, M>(link: &Link<K, V, M>) -> Option<&Node<K, V, M>> {
    let mut node = link.as_deref()?;
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    Some(node)
}

/// Rightmost node of a subtree.
pub(crate) fn max_node<K, V, M>(link: &Link<K, V, M>) -> Option<&Node<K, V, M>> {
    let mut node = link.as_deref()?;
    while let Some(right) = node.right.as_deref() {
        node = right;
    }
    Some(node)
}

/// Node holding the key of the given zero-based rank, using cached sizes.
pub(crate) fn select<K, V, M>(link: &Link<K, V, M>, rank: usize) -> Option<&Node<K, V, M>> {
    let mut remaining = rank;
    let mut current = link.as_deref();
    while let Some(node) = current {
        let left_size = size(&node.left);
        current = match remaining.cmp(&left_size) {
            Ordering::Less => node.left.as_deref(),
            Ordering::Equal => return Some(node),
            Ordering::Greater => {
                remaining -= left_size + 1;
                node.right.as_deref()
            }
        };
    }
    None
}

/// Number of keys strictly smaller than `key`.
pub(crate) fn rank<K, V, M, Q>(link: &Link<K, V, M>, key: &Q) -> usize
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut smaller = 0;
    let mut current = link.as_deref();
    while let Some(node) = current {
        current = match key.cmp(node.key.borrow()) {
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => {
                smaller += size(&node.left) + 1;
                node.right.as_deref()
            }
            Ordering::Equal => return smaller + size(&node.left),
        };
    }
    smaller
}

/// Number of nodes on the longest root-to-leaf path.
pub(crate) fn height<K, V, M>(link: &Link<K, V, M>) -> usize {
    let mut level: Vec<&Node<K, V, M>> = link.as_deref().into_iter().collect();
    let mut height = 0;
    while !level.is_empty() {
        height += 1;
        level = level
            .iter()
            .flat_map(|node| [node.left.as_deref(), node.right.as_deref()])
            .flatten()
            .collect();
    }
    height
}

// =============================================================================
// Structural checks
// =============================================================================

/// Verifies key order and cached sizes below `link`, returning its size.
///
/// `lower` and `upper` are exclusive bounds inherited from the ancestors.
pub(crate) fn check_order_and_size<K: Ord, V, M>(
    link: &Link<K, V, M>,
    lower: Option<&K>,
    upper: Option<&K>,
) -> Result<usize, InvariantViolation> {
    let Some(node) = link.as_deref() else {
        return Ok(0);
    };
    check_bounds(&node.key, lower, upper)?;
    let left = check_order_and_size(&node.left, lower, Some(&node.key))?;
    let right = check_order_and_size(&node.right, Some(&node.key), upper)?;
    check_size(node, left + right + 1)
}

pub(crate) fn check_bounds<K: Ord>(
    key: &K,
    lower: Option<&K>,
    upper: Option<&K>,
) -> Result<(), InvariantViolation> {
    let above_lower = lower.is_none_or(|lower| lower < key);
    let below_upper = upper.is_none_or(|upper| key < upper);
    if above_lower && below_upper {
        Ok(())
    } else {
        Err(InvariantViolation::Unordered)
    }
}

pub(crate) fn check_size<K, V, M>(
    node: &Node<K, V, M>,
    actual: usize,
) -> Result<usize, InvariantViolation> {
    if node.size == actual {
        Ok(actual)
    } else {
        Err(InvariantViolation::SizeMismatch {
            cached: node.size,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type TestLink = Link<i32, &'static str, ()>;

    /// Builds a perfectly balanced tree over the sorted `keys`.
    fn build(keys: &[i32]) -> TestLink {
        if keys.is_empty() {
            return None;
        }
        let middle = keys.len() / 2;
        let mut node = Node::leaf(keys[middle], Some("v"), ());
        node.left = build(&keys[..middle]);
        node.right = build(&keys[middle + 1..]);
        node.update_size();
        Some(node)
    }

    #[rstest]
    fn test_leaf_has_size_one() {
        let node = Node::leaf(1, Some("one"), ());
        assert_eq!(node.size, 1);
        assert!(node.left.is_none() && node.right.is_none());
    }

    #[rstest]
    fn test_update_size_counts_children() {
        let root = build(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(size(&root), 7);
        assert_eq!(size::<i32, &str, ()>(&None), 0);
    }

    #[rstest]
    fn test_store_respects_mode() {
        let mut node = Node::leaf(1, Some("old"), ());
        assert_eq!(
            node.store(Some("new"), InsertMode::KeepExisting),
            InsertOutcome::Kept
        );
        assert_eq!(node.value, Some("old"));
        assert_eq!(
            node.store(Some("new"), InsertMode::Overwrite),
            InsertOutcome::Updated
        );
        assert_eq!(node.value, Some("new"));
    }

    #[rstest]
    #[case(1, true)]
    #[case(4, true)]
    #[case(7, true)]
    #[case(0, false)]
    #[case(8, false)]
    fn test_find(#[case] key: i32, #[case] present: bool) {
        let root = build(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(find(&root, &key).is_some(), present);
    }

    #[rstest]
    fn test_find_mut_updates_in_place() {
        let mut root = build(&[1, 2, 3]);
        if let Some(node) = find_mut(&mut root, &3) {
            node.value = Some("changed");
        }
        assert_eq!(find(&root, &3).and_then(|node| node.value), Some("changed"));
    }

    #[rstest]
    fn test_min_max() {
        let root = build(&[2, 4, 6, 8]);
        assert_eq!(min_node(&root).map(|node| node.key), Some(2));
        assert_eq!(max_node(&root).map(|node| node.key), Some(8));
        assert!(min_node::<i32, &str, ()>(&None).is_none());
    }

    #[rstest]
    fn test_select_and_rank_agree() {
        let keys = [10, 20, 30, 40, 50, 60];
        let root = build(&keys);
        for (index, key) in keys.iter().enumerate() {
            assert_eq!(select(&root, index).map(|node| node.key), Some(*key));
            assert_eq!(rank(&root, key), index);
        }
        assert!(select(&root, keys.len()).is_none());
        assert_eq!(rank(&root, &35), 3);
        assert_eq!(rank(&root, &100), 6);
    }

    #[rstest]
    fn test_height() {
        assert_eq!(height(&build(&[1, 2, 3, 4, 5, 6, 7])), 3);
        assert_eq!(height::<i32, &str, ()>(&None), 0);
    }

    #[rstest]
    fn test_check_order_and_size_detects_mismatch() {
        let mut root = build(&[1, 2, 3]);
        assert_eq!(check_order_and_size(&root, None, None), Ok(3));
        if let Some(node) = root.as_mut() {
            node.size = 5;
        }
        assert_eq!(
            check_order_and_size(&root, None, None),
            Err(InvariantViolation::SizeMismatch {
                cached: 5,
                actual: 3
            })
        );
    }

    #[rstest]
    fn test_check_order_and_size_detects_disorder() {
        let mut root = build(&[1, 2, 3]);
        if let Some(node) = root.as_mut() {
            let mut left = node.left.take().expect("left child");
            node.swap_entry(&mut left);
            node.left = Some(left);
        }
        assert_eq!(
            check_order_and_size(&root, None, None),
            Err(InvariantViolation::Unordered)
        );
    }
}
