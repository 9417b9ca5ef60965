//! Error types for module config loading and validation.

use std::path::PathBuf;

use clasp_graph::GraphError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Discovery
    #[error("no module config found in {}", .root.display())]
    NotFound { root: PathBuf },

    // Parsing
    #[error("invalid JSON in {}: {message}", .path.display())]
    InvalidJson { path: PathBuf, message: String },

    #[error("invalid config value for '{field}'{}", .hint.as_deref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue {
        field: String,
        hint: Option<String>,
    },

    #[error("Wrong config file: empty list of modules")]
    MissingModules,

    /// A field that is optional for planning but needed by the caller.
    #[error("config field '{0}' is required here")]
    MissingField(&'static str),

    // Validation
    #[error("module '{module}' input not found: {}", .path.display())]
    InputNotFound { module: String, path: PathBuf },

    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    /// Descriptor-level errors reported by the graph layer.
    #[error(transparent)]
    Module(#[from] GraphError),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
