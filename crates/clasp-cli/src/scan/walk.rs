//! Locator expansion: files stay files, directories become their `.js` files.

use std::path::{Path, PathBuf};

use clasp_graph::GraphError;
use indexmap::IndexSet;
use path_clean::PathClean;
use walkdir::{DirEntry, WalkDir};

const SOURCE_EXTENSION: &str = "js";

/// Expand `locators` into absolute, normalized file paths.
///
/// Directories are walked recursively in file-name order, skipping hidden
/// entries. A path reached twice is kept at its first position.
pub fn collect_files(locators: &[PathBuf]) -> Result<IndexSet<PathBuf>, GraphError> {
    let mut files = IndexSet::new();

    for locator in locators {
        let path = absolute(locator).map_err(|e| GraphError::scan(locator, e))?;
        let metadata = std::fs::metadata(&path).map_err(|e| GraphError::scan(locator, e))?;

        if !metadata.is_dir() {
            files.insert(path);
            continue;
        }

        let walker = WalkDir::new(&path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
        for entry in walker {
            let entry = entry.map_err(|e| GraphError::scan(locator, e))?;
            if entry.file_type().is_file() && is_source(entry.path()) {
                files.insert(entry.into_path());
            }
        }
    }

    Ok(files)
}

/// `path` made absolute against the current directory and cleaned.
pub fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    Ok(std::path::absolute(path)?.clean())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn directories_expand_sorted_without_hidden_entries() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("lib/.cache")).unwrap();
        fs::write(root.join("lib/b.js"), "").unwrap();
        fs::write(root.join("lib/a.js"), "").unwrap();
        fs::write(root.join("lib/notes.txt"), "").unwrap();
        fs::write(root.join("lib/.cache/c.js"), "").unwrap();
        fs::write(root.join("lib/.hidden.js"), "").unwrap();

        let files = collect_files(&[root.join("lib")]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.js", "b.js"]);
    }

    #[test]
    fn explicit_files_are_kept_once_in_first_position() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("src/a.js"), "").unwrap();
        fs::write(root.join("src/b.js"), "").unwrap();

        let files = collect_files(&[
            root.join("src/b.js"),
            root.join("src"),
            root.join("src/../src/a.js"),
        ])
        .unwrap();
        let files: Vec<_> = files.into_iter().collect();
        assert_eq!(files, [root.join("src/b.js"), root.join("src/a.js")]);
    }

    #[test]
    fn missing_locator_is_a_scan_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        match collect_files(&[missing.clone()]) {
            Err(GraphError::Scan { locator, .. }) => assert_eq!(locator, missing),
            other => panic!("expected scan error, got {other:?}"),
        }
    }
}
