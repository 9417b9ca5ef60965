//! Error handling for the clasp CLI.
//!
//! Library errors from `clasp-graph` and `clasp-config` are folded into a small
//! hierarchy whose messages end with an actionable hint.
//!
//! - **Top-level errors** (`CliError`) represent broad categories of failures
//! - **Domain-specific errors** (`ConfigError`, `BuildError`) carry the detail
//! - **Error conversion** is automatic via `#[from]` attributes
//!
//! # Example
//!
//! ```rust,no_run
//! use clasp_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_settings(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Check the --settings argument")
//! }
//! ```

pub mod miette;

use std::path::PathBuf;

use clasp_graph::GraphError;
use thiserror::Error;

pub use self::miette::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Module config or CLI settings problems
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dependency resolution or module planning failures
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Module config not found in {}\n\nHint: Create a clasp.modules.json file or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// Errors reported while loading or validating the module config
    #[error("{0}")]
    Module(clasp_config::ConfigError),

    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

/// Errors raised while resolving sources and planning modules.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{source}\n\nHint: {hint}")]
    Graph {
        #[source]
        source: GraphError,
        hint: &'static str,
    },

    #[error("No inputs given\n\nHint: Pass at least one --input <PATH> or a module config with --config")]
    NoInputs,

    #[error("Failed to write {}: {source}\n\nHint: Check directory permissions or choose a different --output", .path.display())]
    OutputNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// The graph error behind this build error, if any.
    pub fn graph(&self) -> Option<&GraphError> {
        match self {
            Self::Graph { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GraphError> for BuildError {
    fn from(source: GraphError) -> Self {
        let hint = graph_hint(&source);
        Self::Graph { source, hint }
    }
}

impl From<GraphError> for CliError {
    fn from(err: GraphError) -> Self {
        Self::Build(err.into())
    }
}

impl From<clasp_config::ConfigError> for CliError {
    fn from(err: clasp_config::ConfigError) -> Self {
        match err {
            // Descriptor errors are planning errors, reported like any other.
            clasp_config::ConfigError::Module(graph) => graph.into(),
            clasp_config::ConfigError::NotFound { root } => ConfigError::NotFound(root).into(),
            other => ConfigError::Module(other).into(),
        }
    }
}

fn graph_hint(err: &GraphError) -> &'static str {
    match err {
        GraphError::DuplicateProvide { .. } => {
            "Each namespace must be provided by exactly one file; remove one of the copies from --js"
        }
        GraphError::UnknownNamespace { .. } => {
            "Add the directory that provides it to --js, or fix the goog.require call"
        }
        GraphError::CircularDependency { .. } => {
            "Move the shared code into a namespace both sides can require"
        }
        GraphError::RootModuleNotFound | GraphError::MultipleRootModules { .. } => {
            "Exactly one module in the config may omit 'deps'"
        }
        GraphError::MissingModuleInputs(_) | GraphError::MalformedModuleDescriptor { .. } => {
            "Every module needs an 'inputs' string or array of strings"
        }
        GraphError::UnknownParentModule { .. } | GraphError::UnreachableModules { .. } => {
            "Every module's 'deps' must name a module that leads back to the root"
        }
        GraphError::MultipleParentModules { .. } => {
            "Modules form a tree: list a single parent in 'deps'"
        }
        GraphError::MissingBootstrapUnit => {
            "Add the Closure library to --js, or pass --no-bootstrap"
        }
        GraphError::AmbiguousBootstrapUnit { .. } => {
            "Keep a single copy of the Closure library under --js"
        }
        GraphError::Scan { .. } => "Check that the path exists and is readable",
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}
