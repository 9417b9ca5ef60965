//! Namespace index and dependency-first resolution.
//!
//! A [`DepsTree`] is built once from the full pool of scanned units. It maps
//! every provided namespace to its unit and answers resolution queries by
//! depth-first traversal: a unit is emitted only after everything it
//! requires, so the output is always a valid build order.

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{GraphError, Result, SourceUnit, UnitList};

/// Read-only `namespace -> unit` index over a pool of source units.
///
/// The tree never changes after construction, so it is `Send + Sync` and can
/// answer queries from several threads at once.
#[derive(Debug, Default)]
pub struct DepsTree {
    units: Vec<Arc<SourceUnit>>,
    provides: FxHashMap<String, Arc<SourceUnit>>,
}

impl DepsTree {
    /// Index `units`.
    ///
    /// A namespace provided by two different paths is rejected with
    /// [`GraphError::DuplicateProvide`]. The same unit listed twice is fine.
    pub fn new<I>(units: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<SourceUnit>>,
    {
        let units: Vec<_> = units.into_iter().collect();
        let mut provides: FxHashMap<String, Arc<SourceUnit>> = FxHashMap::default();

        for unit in &units {
            for namespace in unit.provides() {
                if let Some(existing) = provides.get(namespace) {
                    if existing.path() != unit.path() {
                        return Err(GraphError::DuplicateProvide {
                            namespace: namespace.clone(),
                            first: existing.path().to_path_buf(),
                            second: unit.path().to_path_buf(),
                        });
                    }
                }
                provides.insert(namespace.clone(), Arc::clone(unit));
            }
        }

        trace!(
            units = units.len(),
            namespaces = provides.len(),
            "indexed provides"
        );
        Ok(Self { units, provides })
    }

    /// Every unit the tree was built from, in input order.
    pub fn units(&self) -> &[Arc<SourceUnit>] {
        &self.units
    }

    /// The unit providing `namespace`, if any.
    pub fn provider(&self, namespace: &str) -> Option<&Arc<SourceUnit>> {
        self.provides.get(namespace)
    }

    pub fn namespace_count(&self) -> usize {
        self.provides.len()
    }

    /// Resolve `namespace` and everything it transitively requires.
    ///
    /// The returned list is dependency-first and ends with the provider of
    /// `namespace`.
    pub fn resolve(&self, namespace: &str) -> Result<Vec<Arc<SourceUnit>>> {
        let mut out = UnitList::new();
        self.resolve_into(namespace, &mut Vec::new(), &mut out)?;
        Ok(out.into_vec())
    }

    /// Resolve `namespace` into `out` using an explicit traversal stack.
    ///
    /// `traversal_path` holds the namespaces currently being resolved, outermost
    /// first. It is returned to its original contents on success. Units already
    /// in `out` are not visited again.
    pub fn resolve_into(
        &self,
        namespace: &str,
        traversal_path: &mut Vec<String>,
        out: &mut UnitList,
    ) -> Result<()> {
        self.visit(namespace, traversal_path, out, None)
    }

    /// Compute the ordered build set for `inputs`.
    ///
    /// For each input, its requires are resolved and then the input itself is
    /// appended. The result is the union in first-discovery order with no
    /// unit listed twice.
    pub fn get_dependencies(&self, inputs: &[Arc<SourceUnit>]) -> Result<Vec<Arc<SourceUnit>>> {
        Ok(self.dependency_list(inputs)?.into_vec())
    }

    pub(crate) fn dependency_list(&self, inputs: &[Arc<SourceUnit>]) -> Result<UnitList> {
        let mut out = UnitList::new();
        let mut traversal = Vec::new();

        for input in inputs {
            for namespace in input.requires() {
                self.visit(namespace, &mut traversal, &mut out, Some(input.path()))?;
            }
            out.push(Arc::clone(input));
        }

        Ok(out)
    }

    fn visit(
        &self,
        namespace: &str,
        traversal: &mut Vec<String>,
        out: &mut UnitList,
        origin: Option<&Path>,
    ) -> Result<()> {
        let Some(unit) = self.provides.get(namespace) else {
            let required_by = traversal.last().cloned();
            let required_in = required_by
                .as_deref()
                .and_then(|ns| self.provides.get(ns))
                .map(|u| u.path().to_path_buf())
                .or_else(|| origin.map(Path::to_path_buf));
            return Err(GraphError::UnknownNamespace {
                namespace: namespace.to_string(),
                required_by,
                required_in,
            });
        };

        if traversal.iter().any(|ns| ns == namespace) {
            let mut path = traversal.clone();
            path.push(namespace.to_string());
            return Err(GraphError::CircularDependency { path });
        }

        if out.contains(unit) {
            return Ok(());
        }

        trace!(namespace, path = %unit.path().display(), "resolving");
        traversal.push(namespace.to_string());
        for required in unit.requires() {
            self.visit(required, traversal, out, origin)?;
        }
        traversal.pop();
        out.push(Arc::clone(unit));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(path: &str, provides: &[&str], requires: &[&str]) -> Arc<SourceUnit> {
        SourceUnit::builder(path)
            .provides(provides.iter().copied())
            .requires(requires.iter().copied())
            .shared()
    }

    fn paths(units: &[Arc<SourceUnit>]) -> Vec<String> {
        units.iter().map(|u| u.path().display().to_string()).collect()
    }

    #[test]
    fn resolve_orders_dependencies_first() {
        let tree = DepsTree::new([
            unit("c.js", &["c"], &["b", "a"]),
            unit("b.js", &["b"], &["a"]),
            unit("a.js", &["a"], &[]),
        ])
        .unwrap();

        assert_eq!(paths(&tree.resolve("c").unwrap()), ["a.js", "b.js", "c.js"]);
    }

    #[test]
    fn duplicate_provide_is_rejected() {
        let err = DepsTree::new([unit("one.js", &["x"], &[]), unit("two.js", &["x"], &[])])
            .unwrap_err();
        match err {
            GraphError::DuplicateProvide {
                namespace,
                first,
                second,
            } => {
                assert_eq!(namespace, "x");
                assert_eq!(first, Path::new("one.js"));
                assert_eq!(second, Path::new("two.js"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn same_unit_twice_is_tolerated() {
        let a = unit("a.js", &["a"], &[]);
        let tree = DepsTree::new([Arc::clone(&a), a]).unwrap();
        assert_eq!(tree.namespace_count(), 1);
    }

    #[test]
    fn cycle_reports_full_path() {
        let tree = DepsTree::new([
            unit("a.js", &["a"], &["b"]),
            unit("b.js", &["b"], &["c"]),
            unit("c.js", &["c"], &["a"]),
        ])
        .unwrap();

        match tree.resolve("a").unwrap_err() {
            GraphError::CircularDependency { path } => {
                assert_eq!(path, ["a", "b", "c", "a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_namespace_names_last_requirer() {
        let tree = DepsTree::new([
            unit("app.js", &["app"], &["util"]),
            unit("util.js", &["util"], &["missing"]),
        ])
        .unwrap();

        match tree.resolve("app").unwrap_err() {
            GraphError::UnknownNamespace {
                namespace,
                required_by,
                required_in,
            } => {
                assert_eq!(namespace, "missing");
                assert_eq!(required_by.as_deref(), Some("util"));
                assert_eq!(required_in.as_deref(), Some(Path::new("util.js")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_top_level_require_names_input_file() {
        let tree = DepsTree::new(Vec::new()).unwrap();
        let input = unit("main.js", &[], &["nowhere"]);

        match tree.get_dependencies(&[input]).unwrap_err() {
            GraphError::UnknownNamespace {
                required_by,
                required_in,
                ..
            } => {
                assert_eq!(required_by, None);
                assert_eq!(required_in.as_deref(), Some(Path::new("main.js")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn get_dependencies_appends_inputs_once() {
        let a = unit("a.js", &["a"], &[]);
        let b = unit("b.js", &["b"], &["a"]);
        let tree = DepsTree::new([Arc::clone(&a), Arc::clone(&b)]).unwrap();

        let main = unit("main.js", &[], &["b", "a"]);
        let deps = tree.get_dependencies(&[main, Arc::clone(&b)]).unwrap();
        assert_eq!(paths(&deps), ["a.js", "b.js", "main.js"]);
    }

    #[test]
    fn resolution_is_idempotent() {
        let tree = DepsTree::new([
            unit("a.js", &["a"], &[]),
            unit("b.js", &["b"], &["a"]),
        ])
        .unwrap();

        let first = paths(&tree.resolve("b").unwrap());
        let second = paths(&tree.resolve("b").unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn traversal_path_is_restored() {
        let tree = DepsTree::new([unit("a.js", &["a"], &[])]).unwrap();
        let mut traversal = vec!["outer".to_string()];
        let mut out = UnitList::new();
        tree.resolve_into("a", &mut traversal, &mut out).unwrap();
        assert_eq!(traversal, ["outer"]);
        assert_eq!(out.len(), 1);
    }
}
