//! Parsed-file metadata cache.
//!
//! Stores what a scan found in each file together with the file's
//! modification time, so unchanged files are not read again. The on-disk
//! format is a single JSON object:
//!
//! ```json
//! { "/src/app.js": { "provides": ["app"], "requires": ["goog.dom"], "isModule": false, "modifiedDates": 1718000000000 } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use clasp_graph::SourceUnit;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, ResultExt};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    provides: Vec<String>,
    requires: Vec<String>,
    #[serde(default)]
    is_module: bool,
    modified_dates: u64,
}

#[derive(Debug, Clone)]
struct Cached {
    unit: Arc<SourceUnit>,
    modified: u64,
}

/// In-memory view of the cache file, keyed by file path.
#[derive(Debug, Default)]
pub struct MetadataCache {
    file: Option<PathBuf>,
    entries: BTreeMap<PathBuf, Cached>,
}

impl MetadataCache {
    /// A cache that lives for one run and is never written.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the cache stored at `file`.
    ///
    /// A missing, unreadable or malformed file yields an empty cache; it is
    /// rewritten on [`MetadataCache::save`].
    pub fn open(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let entries = match fs::read_to_string(&file) {
            Ok(content) => parse_entries(&file, &content),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %file.display(), error = %err, "ignoring unreadable cache file");
                }
                BTreeMap::new()
            }
        };
        debug!(path = %file.display(), entries = entries.len(), "opened metadata cache");
        Self {
            file: Some(file),
            entries,
        }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The cached unit for `path` if it was recorded at `modified`.
    ///
    /// A stale entry is evicted.
    pub fn get(&mut self, path: &Path, modified: u64) -> Option<Arc<SourceUnit>> {
        match self.entries.get(path) {
            Some(cached) if cached.modified == modified => Some(Arc::clone(&cached.unit)),
            Some(_) => {
                self.entries.remove(path);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, unit: Arc<SourceUnit>, modified: u64) {
        self.entries
            .insert(unit.path().to_path_buf(), Cached { unit, modified });
    }

    /// Write entries whose files still exist back to the cache file.
    ///
    /// Does nothing for an in-memory cache.
    pub fn save(&self) -> Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let entries: BTreeMap<&Path, CacheEntry> = self
            .entries
            .iter()
            .filter(|(path, _)| path.is_file())
            .map(|(path, cached)| {
                let entry = CacheEntry {
                    provides: cached.unit.provides().to_vec(),
                    requires: cached.unit.requires().to_vec(),
                    is_module: cached.unit.is_module(),
                    modified_dates: cached.modified,
                };
                (path.as_path(), entry)
            })
            .collect();

        if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        let json = serde_json::to_string(&entries)?;
        fs::write(file, json).with_path(file)?;
        debug!(path = %file.display(), entries = entries.len(), "saved metadata cache");
        Ok(())
    }
}

fn parse_entries(file: &Path, content: &str) -> BTreeMap<PathBuf, Cached> {
    let raw: BTreeMap<PathBuf, serde_json::Value> = match serde_json::from_str(content) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(path = %file.display(), error = %err, "ignoring malformed cache file");
            return BTreeMap::new();
        }
    };

    // Entries that do not have the expected shape are dropped one by one.
    raw.into_iter()
        .filter_map(|(path, value)| {
            let entry: CacheEntry = serde_json::from_value(value).ok()?;
            let unit = SourceUnit::builder(path.clone())
                .provides(entry.provides)
                .requires(entry.requires)
                .module(entry.is_module)
                .shared();
            Some((
                path,
                Cached {
                    unit,
                    modified: entry.modified_dates,
                },
            ))
        })
        .collect()
}

/// Modification time of `path` in milliseconds since the Unix epoch.
pub fn modified_millis(path: &Path) -> Option<u64> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let millis = modified.duration_since(UNIX_EPOCH).ok()?.as_millis();
    u64::try_from(millis).ok()
}
