use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Namespace that marks the bootstrap file.
pub const BOOTSTRAP_NAMESPACE: &str = "goog";

/// File name that marks the bootstrap file.
pub const BOOTSTRAP_FILE_NAME: &str = "base.js";

/// One scanned source file and the namespaces it declares.
///
/// Identity is the resolved path: two units with the same path are the same
/// unit regardless of where they were scanned from. Units are immutable once
/// built and are shared as `Arc<SourceUnit>` between the dependency tree and
/// every module that includes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnit {
    path: PathBuf,
    provides: Vec<String>,
    requires: Vec<String>,
    is_module: bool,
    is_bootstrap: bool,
}

impl SourceUnit {
    /// Start building a unit for `path`.
    pub fn builder(path: impl Into<PathBuf>) -> SourceUnitBuilder {
        SourceUnitBuilder {
            path: path.into(),
            provides: Vec::new(),
            requires: Vec::new(),
            is_module: false,
            is_bootstrap: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Provided namespaces in declaration order, without duplicates.
    pub fn provides(&self) -> &[String] {
        &self.provides
    }

    /// Required namespaces in declaration order.
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    /// Whether the file declared itself with `goog.module`.
    pub fn is_module(&self) -> bool {
        self.is_module
    }

    /// Whether this is the bootstrap unit every build needs first.
    pub fn is_bootstrap(&self) -> bool {
        self.is_bootstrap
    }

    /// Share the unit.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl PartialEq for SourceUnit {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for SourceUnit {}

impl std::hash::Hash for SourceUnit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl std::fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Returns true when `path` and `provides` describe the Closure `base.js`.
pub fn is_bootstrap_file(path: &Path, provides: &[String]) -> bool {
    path.file_name().is_some_and(|name| name == BOOTSTRAP_FILE_NAME)
        && provides.first().is_some_and(|ns| ns == BOOTSTRAP_NAMESPACE)
}

pub struct SourceUnitBuilder {
    path: PathBuf,
    provides: Vec<String>,
    requires: Vec<String>,
    is_module: bool,
    is_bootstrap: Option<bool>,
}

impl SourceUnitBuilder {
    pub fn provides<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for ns in namespaces {
            self = self.provide(ns);
        }
        self
    }

    /// Add one provided namespace. Repeats are ignored.
    pub fn provide(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        if !self.provides.contains(&namespace) {
            self.provides.push(namespace);
        }
        self
    }

    pub fn requires<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(namespaces.into_iter().map(Into::into));
        self
    }

    pub fn require(mut self, namespace: impl Into<String>) -> Self {
        self.requires.push(namespace.into());
        self
    }

    pub fn module(mut self, is_module: bool) -> Self {
        self.is_module = is_module;
        self
    }

    /// Override bootstrap detection. Without this the `base.js` rule applies.
    pub fn bootstrap(mut self, is_bootstrap: bool) -> Self {
        self.is_bootstrap = Some(is_bootstrap);
        self
    }

    pub fn build(self) -> SourceUnit {
        let is_bootstrap = self
            .is_bootstrap
            .unwrap_or_else(|| is_bootstrap_file(&self.path, &self.provides));
        SourceUnit {
            path: self.path,
            provides: self.provides,
            requires: self.requires,
            is_module: self.is_module,
            is_bootstrap,
        }
    }

    pub fn shared(self) -> Arc<SourceUnit> {
        Arc::new(self.build())
    }
}
