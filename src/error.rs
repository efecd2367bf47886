//! Error types for ordered map operations.
//!
//! Every keyed operation validates its key before touching the tree, so an
//! error never leaves a map half-modified.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::{BinarySearchTree, MapError, OrderedMap};
//!
//! let mut map: BinarySearchTree<String, i32> = BinarySearchTree::new();
//! let error = map.put(None, 1).unwrap_err();
//! assert_eq!(error, MapError::InvalidArgument { operation: "put" });
//! assert!(error.is_invalid_argument());
//! ```

use thiserror::Error;

// =============================================================================
// MapError
// =============================================================================

/// Errors returned by [`OrderedMap`](crate::OrderedMap) operations.
///
/// Expected absences (a missing key on `get`, `remove` or `replace`, or a
/// duplicate key on `put`) are reported through the `Ok` value instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    /// An absent key was passed to a keyed operation.
    #[error("{operation}: key must not be absent")]
    InvalidArgument {
        /// The operation that rejected the key.
        operation: &'static str,
    },

    /// A structural operation needed at least one entry.
    #[error("{operation}: map is empty")]
    EmptyCollection {
        /// The operation that found the map empty.
        operation: &'static str,
    },
}

impl MapError {
    /// Creates an [`MapError::InvalidArgument`] for the given operation.
    #[must_use]
    pub const fn invalid_argument(operation: &'static str) -> Self {
        Self::InvalidArgument { operation }
    }

    /// Creates an [`MapError::EmptyCollection`] for the given operation.
    #[must_use]
    pub const fn empty_collection(operation: &'static str) -> Self {
        Self::EmptyCollection { operation }
    }

    /// Returns `true` if this is an [`MapError::InvalidArgument`].
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` if this is an [`MapError::EmptyCollection`].
    #[must_use]
    pub const fn is_empty_collection(&self) -> bool {
        matches!(self, Self::EmptyCollection { .. })
    }

    /// Returns the name of the operation that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::InvalidArgument { operation } | Self::EmptyCollection { operation } => *operation,
        }
    }
}

/// Result alias used throughout the crate.
pub type MapResult<T> = Result<T, MapError>;

/// Unwraps an optional key argument or reports it as invalid.
pub(crate) fn require_key<T>(key: Option<T>, operation: &'static str) -> MapResult<T> {
    key.ok_or_else(|| {
        tracing::debug!(operation, "rejected absent key");
        MapError::invalid_argument(operation)
    })
}

/// Reports a removal attempted on an empty map.
pub(crate) fn reject_empty(operation: &'static str) -> MapError {
    tracing::debug!(operation, "removal from empty map");
    MapError::empty_collection(operation)
}

// =============================================================================
// InvariantViolation
// =============================================================================

/// A structural invariant found broken by a tree's `check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The root of a red-black tree is red.
    #[error("root is red")]
    RedRoot,

    /// A red node has a red child.
    #[error("red node has a red child")]
    ConsecutiveReds,

    /// A red link leans right.
    #[error("red link leans right")]
    RightLeaningRed,

    /// Two paths from the same node reach null leaves through different
    /// numbers of black links.
    #[error("unbalanced black height: left {left}, right {right}")]
    UnbalancedBlackHeight {
        /// Black height through the left child.
        left: usize,
        /// Black height through the right child.
        right: usize,
    },

    /// A child key is on the wrong side of its parent.
    #[error("keys out of order")]
    Unordered,

    /// A cached subtree size disagrees with its children.
    #[error("cached size {cached} but subtree holds {actual} nodes")]
    SizeMismatch {
        /// The size stored in the node.
        cached: usize,
        /// The size computed from its children.
        actual: usize,
    },
}
