//! End-to-end planning: scan, index, build the module tree, normalize.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::builder::{ModuleDescriptor, ModuleGraphBuilder, UnitScanner};
use crate::module_tree::{BootstrapPolicy, ModuleTree, Normalized};
use crate::{DepsTree, Result, SourceUnit, UnitList};

/// Name of the implicit module used for single-output builds.
pub const SINGLE_MODULE_NAME: &str = "main";

/// Drives a build from locators to a normalized module tree.
///
/// The source pool is everything under `sources` plus every module input, so
/// inputs do not have to be listed twice.
#[derive(Debug)]
pub struct BuildDriver<S> {
    scanner: S,
    bootstrap: BootstrapPolicy,
}

impl<S: UnitScanner> BuildDriver<S> {
    pub fn new(scanner: S) -> Self {
        Self {
            scanner,
            bootstrap: BootstrapPolicy::default(),
        }
    }

    pub fn bootstrap(mut self, policy: BootstrapPolicy) -> Self {
        self.bootstrap = policy;
        self
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    /// Scan `sources` and `inputs` into one deduplicated pool and index it.
    pub fn index(&self, sources: &[PathBuf], inputs: &[PathBuf]) -> Result<Arc<DepsTree>> {
        let started = Instant::now();
        let mut pool: UnitList = self.scanner.scan(sources)?.into_iter().collect();
        if !inputs.is_empty() {
            pool.extend(self.scanner.scan(inputs)?);
        }

        let tree = DepsTree::new(pool.into_vec())?;
        debug!(
            units = tree.units().len(),
            namespaces = tree.namespace_count(),
            elapsed = ?started.elapsed(),
            "indexed source pool"
        );
        Ok(Arc::new(tree))
    }

    /// Build order for a single output: the given inputs and everything they
    /// need, bootstrap first.
    pub fn order(&self, sources: &[PathBuf], inputs: &[PathBuf]) -> Result<Vec<Arc<SourceUnit>>> {
        let builder = ModuleGraphBuilder::new()
            .module(ModuleDescriptor::new(SINGLE_MODULE_NAME).inputs(inputs.iter().cloned()));
        let tree = self.modules(sources, builder)?;
        Ok(tree.get_deps(tree.root(), true))
    }

    /// Build and normalize the module tree declared by `builder`.
    pub fn modules(
        &self,
        sources: &[PathBuf],
        builder: ModuleGraphBuilder,
    ) -> Result<ModuleTree<Normalized>> {
        let started = Instant::now();
        let inputs: Vec<PathBuf> = builder
            .modules()
            .iter()
            .flat_map(|m| m.inputs.iter().cloned())
            .collect();

        let deps_tree = self.index(sources, &inputs)?;
        let tree = builder
            .bootstrap(self.bootstrap)
            .build(deps_tree, &self.scanner)?
            .build()?;

        info!(
            modules = tree.len(),
            units = tree.get_deps(tree.root(), true).len(),
            elapsed = ?started.elapsed(),
            "module tree ready"
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn pool() -> UnitList {
        [
            SourceUnit::builder("goog/base.js").provide("goog").shared(),
            SourceUnit::builder("a.js").provide("a").shared(),
            SourceUnit::builder("b.js").provide("b").require("a").shared(),
            SourceUnit::builder("main.js").require("b").shared(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn single_build_order_starts_with_bootstrap() {
        let driver = BuildDriver::new(pool());
        let sources: Vec<PathBuf> = ["goog/base.js", "a.js", "b.js"].map(PathBuf::from).to_vec();
        let order = driver
            .order(&sources, &[PathBuf::from("main.js")])
            .unwrap();

        let paths: Vec<_> = order.iter().map(|u| u.path()).collect();
        assert_eq!(
            paths,
            [
                Path::new("goog/base.js"),
                Path::new("a.js"),
                Path::new("b.js"),
                Path::new("main.js")
            ]
        );
    }

    #[test]
    fn inputs_join_the_pool() {
        let driver = BuildDriver::new(pool());
        let tree = driver.index(&[PathBuf::from("a.js")], &[PathBuf::from("b.js")]).unwrap();
        assert_eq!(tree.units().len(), 2);
        assert!(tree.provider("b").is_some());
    }
}
