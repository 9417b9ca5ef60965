//! CLI settings with multi-source loading.
//!
//! Merges settings from CLI args, environment variables, and an optional
//! `clasp.json` file.
//! Priority: CLI > Environment > File > Defaults

mod loading;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::OutputFormat;

pub use loading::SETTINGS_FILE_NAME;

/// Options shared by every command.
///
/// Keys are snake_case so that `CLASP_CACHE_FILE` maps onto `cache_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Files or directories scanned for sources
    #[serde(default)]
    pub js: Vec<PathBuf>,

    /// Metadata cache file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,

    /// Output format for command results
    #[serde(default)]
    pub format: OutputFormat,

    /// Whether the root module must start with Closure's base.js
    #[serde(default = "default_bootstrap")]
    pub bootstrap: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            js: Vec::new(),
            cache_file: None,
            format: OutputFormat::Text,
            bootstrap: default_bootstrap(),
        }
    }
}

fn default_bootstrap() -> bool {
    true
}

/// Settings given on the command line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub js: Vec<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<bool>,
}
