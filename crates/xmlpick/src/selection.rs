//! The set of paths a user has marked for export

use indexmap::set::Iter;
use indexmap::IndexSet;

use crate::error::Result;
use crate::path::Path;

/// Set of selected paths.
///
/// Membership ignores order; iteration follows insertion order so a UI can
/// list selections the way they were made.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet(IndexSet<Path>);

impl SelectionSet {
    pub fn new() -> Self {
        Self(IndexSet::new())
    }

    /// Parse every string into a path, failing on the first malformed one
    pub fn parse_all<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|text| Path::parse(text.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.0.contains(path)
    }

    /// Adds a path. Returns false if it was already selected
    pub fn insert(&mut self, path: Path) -> bool {
        self.0.insert(path)
    }

    /// Removes a path, keeping the order of the remaining ones.
    /// Returns false if it was not selected
    pub fn remove(&mut self, path: &Path) -> bool {
        self.0.shift_remove(path)
    }

    /// Flips membership of `path`. Returns true if it is now selected
    pub fn toggle(&mut self, path: Path) -> bool {
        if self.remove(&path) {
            false
        } else {
            self.0.insert(path);
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> Iter<'_, Path> {
        self.0.iter()
    }

    /// Union of both sets, `self` first
    pub fn union(&self, other: &Self) -> Self {
        self.iter().chain(other.iter()).cloned().collect()
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Path;
    type IntoIter = Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Path> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = Path>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Path> for SelectionSet {
    fn extend<I: IntoIterator<Item = Path>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
