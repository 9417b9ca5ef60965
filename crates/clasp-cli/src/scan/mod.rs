//! File system scanner producing source units.
//!
//! [`FsScanner`] expands locators into `.js` files, reads and parses them in
//! parallel and answers repeated lookups from a [`MetadataCache`].

mod parser;
mod walk;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clasp_graph::{GraphError, SourceUnit, UnitScanner};
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::cache::{MetadataCache, modified_millis};
use crate::error::Result;

pub use parser::SourceParser;
pub use walk::{absolute, collect_files};

/// Scans the file system for Closure sources.
///
/// The scanner is shared by reference across rayon workers, so the cache is
/// behind a mutex that is only held for lookups and inserts.
#[derive(Debug)]
pub struct FsScanner {
    parser: SourceParser,
    cache: Mutex<MetadataCache>,
}

impl FsScanner {
    /// A scanner with an in-memory cache only.
    pub fn new() -> Self {
        Self::with_cache(MetadataCache::in_memory())
    }

    pub fn with_cache(cache: MetadataCache) -> Self {
        Self {
            parser: SourceParser::new(),
            cache: Mutex::new(cache),
        }
    }

    /// A scanner backed by the cache file at `path`, or in-memory when `None`.
    pub fn open(cache_file: Option<&Path>) -> Self {
        match cache_file {
            Some(path) => Self::with_cache(MetadataCache::open(path)),
            None => Self::new(),
        }
    }

    /// Persist the metadata cache, if it has a file.
    pub fn save_cache(&self) -> Result<()> {
        self.cache.lock().save()
    }

    fn load(&self, path: &Path) -> std::result::Result<Arc<SourceUnit>, GraphError> {
        let modified = modified_millis(path);
        if let Some(modified) = modified {
            if let Some(unit) = self.cache.lock().get(path, modified) {
                trace!(path = %path.display(), "metadata cache hit");
                return Ok(unit);
            }
        }

        let source = fs::read_to_string(path).map_err(|e| GraphError::scan(path, e))?;
        let unit = self
            .parser
            .parse(path, &source)
            .map(Arc::new)
            .map_err(|e| GraphError::scan(path, e))?;
        if let Some(modified) = modified {
            self.cache.lock().insert(Arc::clone(&unit), modified);
        }
        Ok(unit)
    }
}

impl UnitScanner for FsScanner {
    fn scan(&self, locators: &[PathBuf]) -> clasp_graph::Result<Vec<Arc<SourceUnit>>> {
        let files = collect_files(locators)?;
        let files: Vec<PathBuf> = files.into_iter().collect();

        // Collected per file so the first failing file, in locator order, is
        // the one reported.
        let loaded: Vec<_> = files.par_iter().map(|path| self.load(path)).collect();
        let units = loaded.into_iter().collect::<clasp_graph::Result<Vec<_>>>()?;

        debug!(locators = locators.len(), units = units.len(), "scanned sources");
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, name: &str, content: &str) -> PathBuf {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn scans_directories_in_file_name_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/b.js", "goog.provide('b');");
        write(dir.path(), "src/a.js", "goog.provide('a');\ngoog.require('b');");

        let scanner = FsScanner::new();
        let units = scanner.scan(&[dir.path().join("src")]).unwrap();
        let provides: Vec<_> = units.iter().map(|u| u.provides()[0].as_str()).collect();
        assert_eq!(provides, ["a", "b"]);
        assert_eq!(units[0].requires(), ["b"]);
    }

    #[test]
    fn repeated_scans_share_units() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.js", "goog.provide('a');");

        let scanner = FsScanner::new();
        let first = scanner.scan(std::slice::from_ref(&path)).unwrap();
        let second = scanner.scan(&[path]).unwrap();
        assert!(Arc::ptr_eq(&first[0], &second[0]));
    }

    #[test]
    fn cache_file_is_written_and_reused() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.js", "goog.provide('a');");
        let cache_file = dir.path().join("cache.json");

        let scanner = FsScanner::open(Some(&cache_file));
        scanner.scan(std::slice::from_ref(&path)).unwrap();
        scanner.save_cache().unwrap();
        assert!(cache_file.is_file());

        let mut cache = MetadataCache::open(&cache_file);
        let modified = modified_millis(&path).unwrap();
        assert_eq!(cache.get(&path, modified).unwrap().provides(), ["a"]);
    }

    #[test]
    fn unreadable_file_is_a_scan_error() {
        let dir = TempDir::new().unwrap();
        let scanner = FsScanner::new();
        let err = scanner.scan(&[dir.path().join("nope.js")]).unwrap_err();
        assert!(matches!(err, GraphError::Scan { .. }));
    }

    #[test]
    fn unparsable_file_is_a_scan_error_naming_the_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/ok.js", "goog.provide('ok');");
        let broken = write(dir.path(), "src/broken.js", "goog.provide('broken'");

        let scanner = FsScanner::new();
        let err = scanner.scan(&[dir.path().join("src")]).unwrap_err();
        match err {
            GraphError::Scan { locator, .. } => assert_eq!(locator, broken),
            other => panic!("expected Scan, got {other:?}"),
        }
    }
}
