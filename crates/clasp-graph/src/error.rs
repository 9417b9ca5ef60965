//! Errors raised while resolving namespaces and assembling the module tree.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Every failure the graph layer can report.
///
/// All variants are fatal: the first one aborts the build and no partial
/// output is produced.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Two different source units provide the same namespace.
    #[error(
        "Namespace \"{namespace}\" provided more than once in sources:\n  {}\n  {}",
        .first.display(),
        .second.display()
    )]
    DuplicateProvide {
        namespace: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A required namespace is not provided by any known unit.
    #[error("Namespace \"{namespace}\" never provided.{}", describe_requirer(.required_by, .required_in))]
    UnknownNamespace {
        namespace: String,
        /// Namespace whose provider declared the failing require.
        required_by: Option<String>,
        /// File that declared the failing require.
        required_in: Option<PathBuf>,
    },

    /// Resolution revisited a namespace that is still on the traversal stack.
    #[error("Encountered circular dependency: {}", .path.join(" -> "))]
    CircularDependency { path: Vec<String> },

    #[error("Root module not found. Exactly one module must declare no deps.")]
    RootModuleNotFound,

    #[error("Only one root module should be declared, found: {}", .names.join(", "))]
    MultipleRootModules { names: Vec<String> },

    #[error("Module '{0}' has no 'inputs' field")]
    MissingModuleInputs(String),

    #[error("Module '{name}' is malformed: {reason}")]
    MalformedModuleDescriptor { name: String, reason: String },

    #[error("Module '{module}' depends on unknown module '{parent}'")]
    UnknownParentModule { module: String, parent: String },

    #[error("Module '{module}' declares more than one parent module: {}", .parents.join(", "))]
    MultipleParentModules {
        module: String,
        parents: Vec<String>,
    },

    /// Modules whose parent chain never reaches the root.
    #[error("Modules not reachable from the root module: {}", .names.join(", "))]
    UnreachableModules { names: Vec<String> },

    #[error("No Closure base.js file found.")]
    MissingBootstrapUnit,

    #[error("More than one Closure base.js file found at these paths:\n{}", format_paths(.paths))]
    AmbiguousBootstrapUnit { paths: Vec<PathBuf> },

    /// The unit scanner failed for a locator.
    #[error("failed to scan '{}': {source}", .locator.display())]
    Scan {
        locator: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl GraphError {
    /// Wrap an arbitrary scanner failure for `locator`.
    pub fn scan(
        locator: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Scan {
            locator: locator.into(),
            source: source.into(),
        }
    }
}

fn describe_requirer(required_by: &Option<String>, required_in: &Option<PathBuf>) -> String {
    match (required_by, required_in) {
        (Some(ns), Some(path)) => format!(" Required by \"{ns}\" in {}", path.display()),
        (None, Some(path)) => format!(" Required in {}", path.display()),
        (Some(ns), None) => format!(" Required by \"{ns}\""),
        (None, None) => String::new(),
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
