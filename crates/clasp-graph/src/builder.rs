//! Turn a flat module description into a validated [`ModuleTree`].
//!
//! Modules are declared by name with the name of their parent (`deps`) and
//! the files they start from (`inputs`). The builder checks that the
//! declarations form a single tree, inverts the parent links into child
//! lists, and materializes the tree depth-first from the root, scanning each
//! module's inputs as it goes.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::module_tree::{BootstrapPolicy, Constructed, ModuleId, ModuleTree};
use crate::wrapper::Wrapper;
use crate::{DepsTree, GraphError, Result, SourceUnit, UnitList};

/// Produces source units for a set of locators.
///
/// Locators are files or directories; implementations return the units in
/// locator order with no path listed twice.
pub trait UnitScanner {
    fn scan(&self, locators: &[PathBuf]) -> Result<Vec<Arc<SourceUnit>>>;
}

impl<T: UnitScanner + ?Sized> UnitScanner for &T {
    fn scan(&self, locators: &[PathBuf]) -> Result<Vec<Arc<SourceUnit>>> {
        (**self).scan(locators)
    }
}

/// An already scanned pool acts as a scanner over exact paths.
impl UnitScanner for UnitList {
    fn scan(&self, locators: &[PathBuf]) -> Result<Vec<Arc<SourceUnit>>> {
        let mut found = UnitList::new();
        for locator in locators {
            let unit = self
                .get(locator)
                .ok_or_else(|| GraphError::scan(locator, "not a known source unit"))?;
            found.push(Arc::clone(unit));
        }
        Ok(found.into_vec())
    }
}

/// Declaration of one output module.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub name: String,
    /// Name of the parent module. Empty for the root.
    pub deps: Vec<String>,
    /// Locators of this module's own inputs.
    pub inputs: Vec<PathBuf>,
    pub wrapper: Wrapper,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deps: Vec::new(),
            inputs: Vec::new(),
            wrapper: Wrapper::None,
        }
    }

    pub fn dep(mut self, parent: impl Into<String>) -> Self {
        self.deps.push(parent.into());
        self
    }

    pub fn input(mut self, locator: impl Into<PathBuf>) -> Self {
        self.inputs.push(locator.into());
        self
    }

    pub fn inputs<I, P>(mut self, locators: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.inputs.extend(locators.into_iter().map(Into::into));
        self
    }

    pub fn wrapper(mut self, wrapper: Wrapper) -> Self {
        self.wrapper = wrapper;
        self
    }

    pub fn is_root(&self) -> bool {
        self.deps.is_empty()
    }

    /// Read a descriptor from its JSON form.
    ///
    /// `deps` and `inputs` accept a single string or an array of strings.
    /// `wrapper` is an optional template string.
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        let malformed = |reason: &str| GraphError::MalformedModuleDescriptor {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let object = value
            .as_object()
            .ok_or_else(|| malformed("module has no info object"))?;

        let deps = string_list(object.get("deps"))
            .ok_or_else(|| malformed("'deps' must be a string or an array of strings"))?;
        let inputs = string_list(object.get("inputs"))
            .ok_or_else(|| malformed("'inputs' must be a string or an array of strings"))?;
        if inputs.is_empty() {
            return Err(GraphError::MissingModuleInputs(name.to_string()));
        }

        let wrapper = match object.get("wrapper") {
            None | Some(Value::Null) => Wrapper::None,
            Some(Value::String(template)) => Wrapper::Template(template.clone()),
            Some(_) => return Err(malformed("'wrapper' must be a string")),
        };

        Ok(Self {
            name: name.to_string(),
            deps,
            inputs: inputs.into_iter().map(PathBuf::from).collect(),
            wrapper,
        })
    }
}

/// `None` when present with the wrong shape; absent and null are empty.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::String(s)) => Some(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(_) => None,
    }
}

/// Builds a [`ModuleTree`] from module descriptors.
#[derive(Debug, Default)]
pub struct ModuleGraphBuilder {
    modules: Vec<ModuleDescriptor>,
    bootstrap: BootstrapPolicy,
}

impl ModuleGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every descriptor from a JSON object of `name -> descriptor`.
    pub fn from_json(modules: &Value) -> Result<Self> {
        let object = modules
            .as_object()
            .ok_or_else(|| GraphError::MalformedModuleDescriptor {
                name: "modules".to_string(),
                reason: "expected an object of module descriptors".to_string(),
            })?;

        let mut builder = Self::new();
        for (name, value) in object {
            builder.add_module(ModuleDescriptor::from_value(name, value)?);
        }
        Ok(builder)
    }

    pub fn module(mut self, descriptor: ModuleDescriptor) -> Self {
        self.add_module(descriptor);
        self
    }

    pub fn add_module(&mut self, descriptor: ModuleDescriptor) {
        self.modules.push(descriptor);
    }

    pub fn bootstrap(mut self, policy: BootstrapPolicy) -> Self {
        self.bootstrap = policy;
        self
    }

    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    /// Validate the declarations and materialize the tree.
    pub fn build<S>(self, deps_tree: Arc<DepsTree>, scanner: &S) -> Result<ModuleTree<Constructed>>
    where
        S: UnitScanner + ?Sized,
    {
        let parents = self.validate()?;
        let root = parents
            .iter()
            .position(Option::is_none)
            .ok_or(GraphError::RootModuleNotFound)?;

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.modules.len()];
        for (index, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                children[*parent].push(index);
            }
        }

        let mut modules: Vec<Option<ModuleDescriptor>> = self.modules.into_iter().map(Some).collect();
        let mut visited = 0usize;

        let root_descriptor = take(&mut modules, root)?;
        let entry_units = scanner.scan(&root_descriptor.inputs)?;
        let mut tree = ModuleTree::new(deps_tree, root_descriptor.name, entry_units)
            .with_bootstrap(self.bootstrap);
        let root_id = tree.root();
        tree.set_wrapper(root_id, root_descriptor.wrapper);
        visited += 1;

        let mut pending: Vec<(usize, ModuleId)> = children[root]
            .iter()
            .rev()
            .map(|child| (*child, root_id))
            .collect();

        while let Some((index, parent_id)) = pending.pop() {
            let descriptor = take(&mut modules, index)?;
            let entry_units = scanner.scan(&descriptor.inputs)?;
            debug!(module = %descriptor.name, inputs = entry_units.len(), "attaching module");

            let id = tree.add_child(parent_id, descriptor.name, entry_units)?;
            tree.set_wrapper(id, descriptor.wrapper);
            visited += 1;

            pending.extend(children[index].iter().rev().map(|child| (*child, id)));
        }

        if visited < modules.len() {
            let names = modules
                .into_iter()
                .flatten()
                .map(|descriptor| descriptor.name)
                .collect();
            return Err(GraphError::UnreachableModules { names });
        }

        Ok(tree)
    }

    /// Resolve each module's parent index, `None` for the root.
    fn validate(&self) -> Result<Vec<Option<usize>>> {
        let mut index: IndexMap<&str, usize> = IndexMap::with_capacity(self.modules.len());
        for (i, descriptor) in self.modules.iter().enumerate() {
            if descriptor.inputs.is_empty() {
                return Err(GraphError::MissingModuleInputs(descriptor.name.clone()));
            }
            if index.insert(descriptor.name.as_str(), i).is_some() {
                return Err(GraphError::MalformedModuleDescriptor {
                    name: descriptor.name.clone(),
                    reason: "module is declared more than once".to_string(),
                });
            }
        }

        let roots: Vec<String> = self
            .modules
            .iter()
            .filter(|d| d.is_root())
            .map(|d| d.name.clone())
            .collect();
        match roots.len() {
            0 => return Err(GraphError::RootModuleNotFound),
            1 => {}
            _ => return Err(GraphError::MultipleRootModules { names: roots }),
        }

        self.modules
            .iter()
            .map(|descriptor| {
                let mut declared: Vec<&str> = Vec::new();
                for dep in &descriptor.deps {
                    if !declared.contains(&dep.as_str()) {
                        declared.push(dep);
                    }
                }
                match declared.as_slice() {
                    [] => Ok(None),
                    [parent] => index.get(parent).copied().map(Some).ok_or_else(|| {
                        GraphError::UnknownParentModule {
                            module: descriptor.name.clone(),
                            parent: (*parent).to_string(),
                        }
                    }),
                    many => Err(GraphError::MultipleParentModules {
                        module: descriptor.name.clone(),
                        parents: many.iter().map(|p| (*p).to_string()).collect(),
                    }),
                }
            })
            .collect()
    }
}

fn take(modules: &mut [Option<ModuleDescriptor>], index: usize) -> Result<ModuleDescriptor> {
    modules[index]
        .take()
        .ok_or_else(|| GraphError::MalformedModuleDescriptor {
            name: format!("#{index}"),
            reason: "module reached twice while building the tree".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unit(path: &str, provides: &[&str], requires: &[&str]) -> Arc<SourceUnit> {
        SourceUnit::builder(path)
            .provides(provides.iter().copied())
            .requires(requires.iter().copied())
            .shared()
    }

    fn pool() -> UnitList {
        [
            unit("base.js", &["goog"], &[]),
            unit("root.js", &["app"], &[]),
            unit("child.js", &["app.child"], &["app"]),
            unit("leaf.js", &["app.leaf"], &["app.child"]),
        ]
        .into_iter()
        .collect()
    }

    fn deps_tree(pool: &UnitList) -> Arc<DepsTree> {
        Arc::new(DepsTree::new(pool.to_vec()).unwrap())
    }

    #[test]
    fn builds_nested_tree_in_declared_order() {
        let pool = pool();
        let tree = ModuleGraphBuilder::new()
            .module(ModuleDescriptor::new("leaf").dep("child").input("leaf.js"))
            .module(ModuleDescriptor::new("root").input("root.js"))
            .module(ModuleDescriptor::new("child").dep("root").input("child.js"))
            .build(deps_tree(&pool), &pool)
            .unwrap();

        let names: Vec<_> = tree
            .pre_order()
            .into_iter()
            .map(|id| tree.node(id).name().to_string())
            .collect();
        assert_eq!(names, ["root", "child", "leaf"]);

        let leaf = tree.module("leaf").unwrap();
        let child = tree.module("child").unwrap();
        assert_eq!(tree.node(leaf).parent(), Some(child));
    }

    #[test]
    fn missing_root_is_reported() {
        let pool = pool();
        let err = ModuleGraphBuilder::new()
            .module(ModuleDescriptor::new("a").dep("b").input("root.js"))
            .module(ModuleDescriptor::new("b").dep("a").input("child.js"))
            .build(deps_tree(&pool), &pool)
            .unwrap_err();
        assert!(matches!(err, GraphError::RootModuleNotFound));
    }

    #[test]
    fn two_roots_are_reported() {
        let pool = pool();
        let err = ModuleGraphBuilder::new()
            .module(ModuleDescriptor::new("a").input("root.js"))
            .module(ModuleDescriptor::new("b").input("child.js"))
            .build(deps_tree(&pool), &pool)
            .unwrap_err();
        match err {
            GraphError::MultipleRootModules { names } => assert_eq!(names, ["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn cycle_outside_root_is_unreachable() {
        let pool = pool();
        let err = ModuleGraphBuilder::new()
            .module(ModuleDescriptor::new("root").input("root.js"))
            .module(ModuleDescriptor::new("x").dep("y").input("child.js"))
            .module(ModuleDescriptor::new("y").dep("x").input("leaf.js"))
            .build(deps_tree(&pool), &pool)
            .unwrap_err();
        match err {
            GraphError::UnreachableModules { names } => assert_eq!(names, ["x", "y"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_and_multiple_parents_are_rejected() {
        let pool = pool();
        let err = ModuleGraphBuilder::new()
            .module(ModuleDescriptor::new("root").input("root.js"))
            .module(ModuleDescriptor::new("child").dep("nope").input("child.js"))
            .build(deps_tree(&pool), &pool)
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownParentModule { .. }));

        let err = ModuleGraphBuilder::new()
            .module(ModuleDescriptor::new("root").input("root.js"))
            .module(ModuleDescriptor::new("child").input("child.js").dep("root"))
            .module(
                ModuleDescriptor::new("leaf")
                    .dep("root")
                    .dep("child")
                    .input("leaf.js"),
            )
            .build(deps_tree(&pool), &pool)
            .unwrap_err();
        assert!(matches!(err, GraphError::MultipleParentModules { .. }));
    }

    #[test]
    fn missing_inputs_names_module() {
        let err = ModuleDescriptor::from_value("child", &json!({ "deps": ["root"] })).unwrap_err();
        match err {
            GraphError::MissingModuleInputs(name) => assert_eq!(name, "child"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn descriptor_accepts_string_or_array() {
        let descriptor = ModuleDescriptor::from_value(
            "child",
            &json!({ "deps": "root", "inputs": ["a.js", "b.js"], "wrapper": "%source%" }),
        )
        .unwrap();
        assert_eq!(descriptor.deps, ["root"]);
        assert_eq!(descriptor.inputs, [PathBuf::from("a.js"), PathBuf::from("b.js")]);
        assert!(matches!(descriptor.wrapper, Wrapper::Template(ref t) if t == "%source%"));
    }

    #[test]
    fn non_object_descriptor_is_malformed() {
        let err = ModuleDescriptor::from_value("root", &json!("root.js")).unwrap_err();
        assert!(matches!(
            err,
            GraphError::MalformedModuleDescriptor { ref name, .. } if name == "root"
        ));

        let err = ModuleDescriptor::from_value("root", &json!({ "inputs": [1] })).unwrap_err();
        assert!(matches!(err, GraphError::MalformedModuleDescriptor { .. }));
    }

    #[test]
    fn from_json_keeps_document_order() {
        let builder = ModuleGraphBuilder::from_json(&json!({
            "root": { "inputs": "root.js" },
            "second": { "deps": "root", "inputs": "leaf.js" },
            "first": { "deps": "root", "inputs": "child.js" }
        }))
        .unwrap();
        let names: Vec<_> = builder.modules().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["root", "second", "first"]);
    }

    #[test]
    fn scanner_failure_is_propagated() {
        let pool = pool();
        let err = ModuleGraphBuilder::new()
            .module(ModuleDescriptor::new("root").input("missing.js"))
            .build(deps_tree(&pool), &pool)
            .unwrap_err();
        assert!(matches!(err, GraphError::Scan { .. }));
    }
}
