use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::SourceUnit;

/// Ordered set of source units keyed by path.
///
/// Insertion order is preserved and a unit is stored at most once, which is
/// the shape every dependency list in this crate needs.
#[derive(Debug, Clone, Default)]
pub struct UnitList {
    units: IndexMap<PathBuf, Arc<SourceUnit>>,
}

impl UnitList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `unit` unless it is already present. Returns true if added.
    pub fn push(&mut self, unit: Arc<SourceUnit>) -> bool {
        if self.units.contains_key(unit.path()) {
            return false;
        }
        self.units.insert(unit.path().to_path_buf(), unit);
        true
    }

    pub fn contains(&self, unit: &SourceUnit) -> bool {
        self.units.contains_key(unit.path())
    }

    pub fn get(&self, path: &Path) -> Option<&Arc<SourceUnit>> {
        self.units.get(path)
    }

    /// Remove `unit`, keeping the order of the rest. Returns true if removed.
    pub fn remove(&mut self, unit: &SourceUnit) -> bool {
        self.units.shift_remove(unit.path()).is_some()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SourceUnit>> {
        self.units.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.units.keys().map(PathBuf::as_path)
    }

    pub fn to_vec(&self) -> Vec<Arc<SourceUnit>> {
        self.units.values().cloned().collect()
    }

    pub fn into_vec(self) -> Vec<Arc<SourceUnit>> {
        self.units.into_values().collect()
    }
}

impl Extend<Arc<SourceUnit>> for UnitList {
    fn extend<T: IntoIterator<Item = Arc<SourceUnit>>>(&mut self, iter: T) {
        for unit in iter {
            self.push(unit);
        }
    }
}

impl FromIterator<Arc<SourceUnit>> for UnitList {
    fn from_iter<T: IntoIterator<Item = Arc<SourceUnit>>>(iter: T) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a> IntoIterator for &'a UnitList {
    type Item = &'a Arc<SourceUnit>;
    type IntoIter = indexmap::map::Values<'a, PathBuf, Arc<SourceUnit>>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(path: &str) -> Arc<SourceUnit> {
        SourceUnit::builder(path).shared()
    }

    #[test]
    fn push_keeps_first_position() {
        let mut list = UnitList::new();
        assert!(list.push(unit("a.js")));
        assert!(list.push(unit("b.js")));
        assert!(!list.push(unit("a.js")));

        let paths: Vec<_> = list.paths().collect();
        assert_eq!(paths, [Path::new("a.js"), Path::new("b.js")]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut list: UnitList = ["a.js", "b.js", "c.js"].into_iter().map(unit).collect();
        assert!(list.remove(&unit("b.js")));
        assert!(!list.remove(&unit("b.js")));

        let paths: Vec<_> = list.paths().collect();
        assert_eq!(paths, [Path::new("a.js"), Path::new("c.js")]);
    }
}
