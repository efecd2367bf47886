//! Prefix frequency tables.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::clients::FrequencyFilter;
//!
//! let mut filter: FrequencyFilter = FrequencyFilter::new(2);
//! for word in ["tree", "trie", "heap", "tree"] {
//!     filter.add_word(word).unwrap();
//! }
//!
//! assert_eq!(filter.count("tr").unwrap(), 3);
//! assert_eq!(filter.frequent(1, 3).unwrap(), vec!["t"]);
//! assert_eq!(filter.frequent(2, 1).unwrap(), vec!["he", "tr"]);
//! ```

use crate::error::MapResult;
use crate::map::OrderedMap;
use crate::red_black::RedBlackTree;

/// Counts how often each prefix occurs, keeping one ordered table per
/// prefix length from 1 up to a fixed maximum.
///
/// Prefixes are measured in `char`s, so multi-byte text is never split
/// inside a code point.
pub struct FrequencyFilter<M = RedBlackTree<String, usize>> {
    tables: Vec<M>,
}

impl<M> FrequencyFilter<M>
where
    M: OrderedMap<String, usize> + Default,
{
    /// Creates a filter tracking prefixes of length `1..=max_prefix_len`.
    #[must_use]
    pub fn new(max_prefix_len: usize) -> Self {
        Self {
            tables: (0..max_prefix_len).map(|_| M::default()).collect(),
        }
    }

    /// The longest prefix length tracked.
    pub fn max_prefix_len(&self) -> usize {
        self.tables.len()
    }

    /// Counts every tracked prefix of `word`. Words shorter than a prefix
    /// length do not count towards that length.
    ///
    /// # Errors
    ///
    /// Propagates map errors; none occur for well-formed input.
    pub fn add_word(&mut self, word: &str) -> MapResult<()> {
        for (index, table) in self.tables.iter_mut().enumerate() {
            let Some(prefix) = prefix(word, index + 1) else {
                break;
            };
            match table.get(prefix)?.copied() {
                Some(count) => table.set(prefix.to_owned(), count + 1)?,
                None => {
                    table.put(prefix.to_owned(), 1)?;
                }
            }
        }
        Ok(())
    }

    /// How often `prefix` has been seen, `0` if never or if its length is
    /// not tracked.
    ///
    /// # Errors
    ///
    /// Propagates map errors; none occur for well-formed input.
    pub fn count(&self, prefix: &str) -> MapResult<usize> {
        let Some(table) = self.table(prefix.chars().count()) else {
            return Ok(0);
        };
        if !table.contains_key(prefix)? {
            return Ok(0);
        }
        Ok(table.get(prefix)?.copied().unwrap_or(0))
    }

    /// Prefixes of `length` seen at least `threshold` times, ascending.
    ///
    /// # Errors
    ///
    /// Propagates map errors; none occur for well-formed input.
    pub fn frequent(&self, length: usize, threshold: usize) -> MapResult<Vec<&str>> {
        let Some(table) = self.table(length) else {
            return Ok(Vec::new());
        };
        let mut frequent = Vec::new();
        for key in table.keys() {
            if table.get(key.as_str())?.is_some_and(|count| *count >= threshold) {
                frequent.push(key.as_str());
            }
        }
        Ok(frequent)
    }

    /// Renders every table as `length N: prefix=count ...`, one per line.
    pub fn dump(&self) -> String {
        let mut output = String::new();
        for (index, table) in self.tables.iter().enumerate() {
            output.push_str(&format!("length {}:", index + 1));
            for (prefix, count) in table.iter() {
                output.push_str(&format!(" {prefix}={}", count.copied().unwrap_or(0)));
            }
            output.push('\n');
        }
        output
    }

    fn table(&self, length: usize) -> Option<&M> {
        length.checked_sub(1).and_then(|index| self.tables.get(index))
    }
}

/// The first `length` chars of `word`, if it has that many.
fn prefix(word: &str, length: usize) -> Option<&str> {
    match word.char_indices().nth(length) {
        Some((end, _)) => Some(&word[..end]),
        None => (word.chars().count() == length).then_some(word),
    }
}
