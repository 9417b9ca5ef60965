//! File-based config discovery for CLI use
//!
//! Handles finding and loading module config files from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde_json::Value;
use tracing::debug;

use crate::config::ModuleConfig;
use crate::error::{ConfigError, Result};

/// Conventional config file names, in lookup order.
pub const CONFIG_FILE_NAMES: &[&str] = &["clasp.modules.json", "modules.json"];

/// File-based configuration discovery
///
/// Searches for a module config in conventional locations and loads it with
/// paths resolved against the file's directory. Library users should call
/// [`ModuleConfig::from_value`] directly.
///
/// # Example
///
/// ```no_run
/// use clasp_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    pub fn find(&self) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }

    /// Load config from discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<ModuleConfig> {
        let path = self.find().ok_or_else(|| ConfigError::NotFound {
            root: self.root.clone(),
        })?;
        load_from(&path)
    }
}

/// Load a config file, resolving relative paths against its directory.
pub fn load_from(path: &Path) -> Result<ModuleConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidJson {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let base_dir = std::path::absolute(parent).map(|p| p.clean()).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = ModuleConfig::from_value(&value)?.resolve_paths(&base_dir);
    debug!(
        path = %path.display(),
        modules = config.modules.len(),
        "loaded module config"
    );
    Ok(config)
}

/// Discover and load config from the current directory (convenience function)
pub fn discover() -> Result<ModuleConfig> {
    let root = std::env::current_dir().map_err(|source| ConfigError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    ConfigDiscovery::new(root).load()
}
