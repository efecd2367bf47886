//! Consumers that use an ordered map only through [`OrderedMap`].
//!
//! - [`FrequencyFilter`]: prefix frequency tables, one map per prefix length
//! - [`FileSystem`]: a file catalog indexed by name and by date
//!
//! Both are generic over the map implementation, so either tree variant
//! plugs in.
//!
//! [`OrderedMap`]: crate::OrderedMap

mod file_system;
mod frequency_filter;

pub use file_system::FileData;
pub use file_system::FileSystem;
pub use frequency_filter::FrequencyFilter;
