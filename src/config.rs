//! Per-instance map configuration.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::{MapConfig, NullValuePolicy, OrderedMap, RedBlackTree};
//!
//! let config = MapConfig::new().with_null_value_policy(NullValuePolicy::Overwrite);
//! let mut map: RedBlackTree<&str, i32> = RedBlackTree::with_config(config);
//!
//! map.set("a", None).unwrap();
//! assert_eq!(map.len(), 1);
//! assert_eq!(map.get("a").unwrap(), None);
//! ```

/// What a map does when asked to store an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullValuePolicy {
    /// Storing an absent value removes the key instead.
    #[default]
    TreatAsRemove,
    /// The absent value is stored like any other value.
    Overwrite,
}

/// Construction-time options shared by both tree variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapConfig {
    /// Handling of absent values passed to `put`, `set` and `replace`.
    pub on_null_value: NullValuePolicy,
}

impl MapConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            on_null_value: NullValuePolicy::TreatAsRemove,
        }
    }

    /// Returns a copy with the given null value policy.
    #[must_use]
    pub const fn with_null_value_policy(mut self, policy: NullValuePolicy) -> Self {
        self.on_null_value = policy;
        self
    }

    /// Returns `true` if absent values are stored rather than removing.
    #[must_use]
    pub const fn allows_null_values(&self) -> bool {
        matches!(self.on_null_value, NullValuePolicy::Overwrite)
    }
}
