//! A file catalogue indexed by name and by date.

use crate::error::MapResult;
use crate::map::OrderedMap;
use crate::red_black::RedBlackTree;

/// A catalogued file.
///
/// Dates are compared as strings, so an ISO-8601 form such as
/// `2024-03-01` keeps them chronological.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileData {
    /// Unique file name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Modification date.
    pub date: String,
}

impl FileData {
    /// Creates a file record.
    pub fn new(name: impl Into<String>, size: u64, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            date: date.into(),
        }
    }
}

/// Two ordered indexes over the same files: one keyed by unique name,
/// one grouping files that share a date.
///
/// # Examples
///
/// ```rust
/// use ordtree::clients::{FileData, FileSystem};
///
/// let mut files: FileSystem = FileSystem::new();
/// files.add(FileData::new("b.txt", 10, "2024-01-02")).unwrap();
/// files.add(FileData::new("a.txt", 20, "2024-01-02")).unwrap();
///
/// assert_eq!(files.names(), ["a.txt", "b.txt"]);
/// assert_eq!(files.find_by_date("2024-01-02").unwrap().len(), 2);
/// ```
pub struct FileSystem<N = RedBlackTree<String, FileData>, D = RedBlackTree<String, Vec<FileData>>> {
    by_name: N,
    by_date: D,
}

impl<N, D> FileSystem<N, D>
where
    N: OrderedMap<String, FileData> + Default,
    D: OrderedMap<String, Vec<FileData>> + Default,
{
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: N::default(),
            by_date: D::default(),
        }
    }

    /// Number of catalogued files.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no file is catalogued.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Catalogues `file`. Returns `Ok(false)` and changes nothing if a
    /// file with the same name is already present.
    ///
    /// # Errors
    ///
    /// Propagates map errors; none occur for well-formed input.
    pub fn add(&mut self, file: FileData) -> MapResult<bool> {
        if self.by_name.contains_key(file.name.as_str())? {
            return Ok(false);
        }
        let mut same_day = self
            .by_date
            .get(file.date.as_str())?
            .cloned()
            .unwrap_or_default();
        same_day.push(file.clone());
        self.by_date.set(file.date.clone(), same_day)?;
        self.by_name.put(file.name.clone(), file)
    }

    /// The file called `name`.
    ///
    /// # Errors
    ///
    /// Propagates map errors; none occur for well-formed input.
    pub fn find_by_name(&self, name: &str) -> MapResult<Option<&FileData>> {
        self.by_name.get(name)
    }

    /// Files dated `date`, in the order they were added.
    ///
    /// # Errors
    ///
    /// Propagates map errors; none occur for well-formed input.
    pub fn find_by_date(&self, date: &str) -> MapResult<&[FileData]> {
        Ok(self.by_date.get(date)?.map_or(&[][..], Vec::as_slice))
    }

    /// Every file name, ascending.
    pub fn names(&self) -> Vec<&str> {
        self.by_name.keys().into_iter().map(String::as_str).collect()
    }

    /// Every date with at least one file, ascending.
    pub fn dates(&self) -> Vec<&str> {
        self.by_date.keys().into_iter().map(String::as_str).collect()
    }

    /// Removes the file called `name` from both indexes. Returns
    /// `Ok(false)` if no such file exists.
    ///
    /// # Errors
    ///
    /// Propagates map errors; none occur for well-formed input.
    pub fn remove(&mut self, name: &str) -> MapResult<bool> {
        let Some(date) = self.by_name.get(name)?.map(|file| file.date.clone()) else {
            return Ok(false);
        };
        self.by_name.remove(name)?;

        let mut same_day = self.by_date.get(date.as_str())?.cloned().unwrap_or_default();
        same_day.retain(|file| file.name != name);
        if same_day.is_empty() {
            self.by_date.remove(date.as_str())?;
        } else {
            self.by_date.set(date, same_day)?;
        }
        Ok(true)
    }
}

impl<N, D> Default for FileSystem<N, D>
where
    N: OrderedMap<String, FileData> + Default,
    D: OrderedMap<String, Vec<FileData>> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}
