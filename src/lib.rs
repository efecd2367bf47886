//! # ordtree
//!
//! Ordered maps built on binary search trees.
//!
//! ## Overview
//!
//! Two interchangeable implementations of the [`OrderedMap`] contract:
//!
//! - **[`BinarySearchTree`]**: an unbalanced tree whose shape follows the
//!   insertion order. Simple, and fast on random input.
//! - **[`RedBlackTree`]**: a left-leaning red-black tree that stays within
//!   `2 * log2(N + 1)` levels regardless of insertion order.
//!
//! Both keep keys unique and sorted, cache subtree sizes for order
//! statistics ([`OrderedMap::select`], [`OrderedMap::rank`]) and expose
//! pre-, in- and post-order traversal plus an indented structural dump.
//!
//! ## Feature Flags
//!
//! - `clients`: sample consumers of the map contract
//!   ([`clients::FrequencyFilter`], [`clients::FileSystem`])
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use ordtree::prelude::*;
//!
//! let mut map: RedBlackTree<i32, i32> = RedBlackTree::new();
//! for key in 1..=7 {
//!     map.put(key, key * 10).unwrap();
//! }
//!
//! assert_eq!(map.get(&4).unwrap(), Some(&40));
//! assert_eq!(map.select(0), Some(&1));
//! assert_eq!(map.rank(&5).unwrap(), 4);
//! assert!(map.check_invariants().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use ordtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bst::BinarySearchTree;
    pub use crate::config::{MapConfig, NullValuePolicy};
    pub use crate::error::{MapError, MapResult};
    pub use crate::map::OrderedMap;
    pub use crate::red_black::{Color, RedBlackTree};
    pub use crate::traversal::TraversalOrder;

    #[cfg(feature = "clients")]
    pub use crate::clients::*;
}

pub mod bst;
pub mod config;
pub mod error;
pub mod map;
mod node;
pub mod red_black;
pub mod traversal;

#[cfg(feature = "clients")]
pub mod clients;

pub use bst::BinarySearchTree;
pub use config::{MapConfig, NullValuePolicy};
pub use error::{InvariantViolation, MapError, MapResult};
pub use map::OrderedMap;
pub use red_black::{Color, RedBlackTree};
pub use traversal::{IntoIter, Iter, TraversalOrder};

// Both maps own their nodes outright, so they move between threads freely.
static_assertions::assert_impl_all!(BinarySearchTree<String, String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(RedBlackTree<String, String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(MapError: std::error::Error, Send, Sync, Copy);
