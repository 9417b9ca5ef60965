//! The module tree and its dependency lifecycle.
//!
//! A [`ModuleTree`] owns every [`ModuleNode`] in an arena and hands out
//! [`ModuleId`] handles. Parent links are plain ids, so nodes never own their
//! parents and the tree can be walked in either direction without reference
//! cycles.
//!
//! The tree moves through three states, tracked in the type:
//!
//! ```text
//! ModuleTree<Constructed> --calculate_deps()--> ModuleTree<Calculated>
//!                                                      |
//!                                               normalize_deps()
//!                                                      v
//!                                              ModuleTree<Normalized>
//! ```
//!
//! - **Constructed**: nodes carry their entry units only.
//! - **Calculated**: every node holds the dependency-first closure of its
//!   own entry units; the root additionally starts with the bootstrap unit.
//! - **Normalized**: any unit needed by two or more sibling subtrees has been
//!   hoisted to their common parent, and removed below it.

use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::wrapper::{Wrapper, WrapperContext, WrapperOptions};
use crate::{DepsTree, GraphError, Result, SourceUnit, UnitList};

/// Handle to a node inside one [`ModuleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(usize);

/// Tree state: nodes attached, no dependencies computed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Constructed;

/// Tree state: per-node dependency closures computed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Calculated;

/// Tree state: shared dependencies hoisted. Read-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct Normalized;

/// Whether the root must start with the bootstrap unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPolicy {
    /// Exactly one bootstrap unit must exist in the pool.
    #[default]
    Required,
    /// No bootstrap unit is prepended.
    Disabled,
}

/// One output module.
#[derive(Debug)]
pub struct ModuleNode {
    name: String,
    parent: Option<ModuleId>,
    children: Vec<ModuleId>,
    deps: UnitList,
    entry_units: Vec<Arc<SourceUnit>>,
    wrapper: Wrapper,
}

impl ModuleNode {
    fn new(name: String, parent: Option<ModuleId>, entry_units: Vec<Arc<SourceUnit>>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            deps: UnitList::new(),
            entry_units,
            wrapper: Wrapper::None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    pub fn children(&self) -> &[ModuleId] {
        &self.children
    }

    /// Units this module itself emits, dependency-first.
    pub fn direct_deps(&self) -> &UnitList {
        &self.deps
    }

    /// The module's declared inputs.
    pub fn entry_units(&self) -> &[Arc<SourceUnit>] {
        &self.entry_units
    }

    pub fn wrapper(&self) -> &Wrapper {
        &self.wrapper
    }
}

/// Arena-backed tree of output modules.
#[derive(Debug)]
pub struct ModuleTree<S = Normalized> {
    nodes: Vec<ModuleNode>,
    names: FxHashMap<String, ModuleId>,
    deps_tree: Arc<DepsTree>,
    bootstrap: BootstrapPolicy,
    _state: PhantomData<S>,
}

impl ModuleTree<Constructed> {
    /// Start a tree with a root module named `root_name`.
    pub fn new(
        deps_tree: Arc<DepsTree>,
        root_name: impl Into<String>,
        entry_units: Vec<Arc<SourceUnit>>,
    ) -> Self {
        let root_name = root_name.into();
        let mut names = FxHashMap::default();
        names.insert(root_name.clone(), ModuleId(0));
        Self {
            nodes: vec![ModuleNode::new(root_name, None, entry_units)],
            names,
            deps_tree,
            bootstrap: BootstrapPolicy::default(),
            _state: PhantomData,
        }
    }

    pub fn with_bootstrap(mut self, policy: BootstrapPolicy) -> Self {
        self.bootstrap = policy;
        self
    }

    /// Attach a new module below `parent`.
    ///
    /// Children keep the order in which they are added. Module names must be
    /// unique within the tree.
    pub fn add_child(
        &mut self,
        parent: ModuleId,
        name: impl Into<String>,
        entry_units: Vec<Arc<SourceUnit>>,
    ) -> Result<ModuleId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(GraphError::MalformedModuleDescriptor {
                name,
                reason: "module name is already used".to_string(),
            });
        }

        let id = ModuleId(self.nodes.len());
        self.nodes.push(ModuleNode::new(name.clone(), Some(parent), entry_units));
        self.nodes[parent.0].children.push(id);
        self.names.insert(name, id);
        Ok(id)
    }

    pub fn set_wrapper(&mut self, id: ModuleId, wrapper: Wrapper) {
        self.nodes[id.0].wrapper = wrapper;
    }

    /// Compute every node's dependency closure.
    ///
    /// Nodes are independent here, so their closures are resolved in
    /// parallel. The root's list starts with the bootstrap unit when the
    /// policy requires one.
    pub fn calculate_deps(self) -> Result<ModuleTree<Calculated>> {
        let bootstrap = match self.bootstrap {
            BootstrapPolicy::Required => Some(self.bootstrap_unit()?),
            BootstrapPolicy::Disabled => None,
        };

        let deps_tree = &self.deps_tree;
        let resolved: Vec<Result<UnitList>> = self
            .nodes
            .par_iter()
            .map(|node| deps_tree.dependency_list(&node.entry_units))
            .collect();

        let mut tree = self.transition::<Calculated>();
        for (index, deps) in resolved.into_iter().enumerate() {
            let deps = deps?;
            let node = &mut tree.nodes[index];
            if node.parent.is_none() {
                let mut root_deps = UnitList::new();
                root_deps.extend(bootstrap.clone());
                root_deps.extend(deps.into_vec());
                node.deps = root_deps;
            } else {
                node.deps = deps;
            }
            debug!(module = %node.name, deps = node.deps.len(), "calculated module deps");
        }

        Ok(tree)
    }

    /// Run both lifecycle steps.
    pub fn build(self) -> Result<ModuleTree<Normalized>> {
        Ok(self.calculate_deps()?.normalize_deps())
    }

    fn bootstrap_unit(&self) -> Result<Arc<SourceUnit>> {
        let candidates: UnitList = self
            .deps_tree
            .units()
            .iter()
            .filter(|unit| unit.is_bootstrap())
            .cloned()
            .collect();

        match candidates.len() {
            0 => Err(GraphError::MissingBootstrapUnit),
            1 => Ok(candidates.into_vec().remove(0)),
            _ => Err(GraphError::AmbiguousBootstrapUnit {
                paths: candidates.paths().map(|p| p.to_path_buf()).collect(),
            }),
        }
    }
}

impl ModuleTree<Calculated> {
    /// Remove `unit` from `id` and every module below it.
    ///
    /// Returns true if the unit was removed anywhere in the subtree.
    pub fn remove_dep(&mut self, id: ModuleId, unit: &SourceUnit) -> bool {
        let mut removed = false;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.0];
            removed |= node.deps.remove(unit);
            stack.extend(node.children.iter().copied());
        }
        removed
    }

    /// Hoist shared dependencies, top-down, in a single pass.
    ///
    /// At each node the children's full closures are compared, as they stood
    /// before this node was processed. A unit found in two or more of them,
    /// or in one of them and in the node itself, is shared: it is appended to
    /// the node (if missing) and removed from every child subtree. The
    /// children are normalized afterwards.
    pub fn normalize_deps(mut self) -> ModuleTree<Normalized> {
        let mut pending = vec![self.root()];
        while let Some(id) = pending.pop() {
            self.hoist_shared(id);
            pending.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        self.transition()
    }

    fn hoist_shared(&mut self, id: ModuleId) {
        let children = self.nodes[id.0].children.clone();
        if children.is_empty() {
            return;
        }

        let mut closures: Vec<UnitList> = children
            .iter()
            .map(|child| self.collect_deps(*child, true))
            .collect();

        let mut sharing = UnitList::new();
        for i in 0..closures.len() {
            let (head, tail) = closures.split_at_mut(i + 1);
            for unit in head[i].iter() {
                let mut shared = self.nodes[id.0].deps.contains(unit);
                for later in tail.iter_mut() {
                    shared |= later.remove(unit);
                }
                if shared {
                    sharing.push(Arc::clone(unit));
                }
            }
        }

        if sharing.is_empty() {
            return;
        }

        debug!(
            module = %self.nodes[id.0].name,
            hoisted = sharing.len(),
            "hoisting shared deps"
        );
        self.nodes[id.0].deps.extend(sharing.to_vec());
        for child in children {
            for unit in sharing.iter() {
                self.remove_dep(child, unit);
            }
        }
    }
}

impl<S> ModuleTree<S> {
    pub fn root(&self) -> ModuleId {
        ModuleId(0)
    }

    pub fn node(&self, id: ModuleId) -> &ModuleNode {
        &self.nodes[id.0]
    }

    /// Find a module by name.
    pub fn module(&self, name: &str) -> Option<ModuleId> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Module ids in pre-order: a parent before its children, siblings in
    /// declaration order.
    pub fn pre_order(&self) -> Vec<ModuleId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Units of `id`, and of its whole subtree when `with_submodules` is set.
    ///
    /// Own units come first, then each child's list in declaration order,
    /// with every unit listed once.
    pub fn get_deps(&self, id: ModuleId, with_submodules: bool) -> Vec<Arc<SourceUnit>> {
        self.collect_deps(id, with_submodules).into_vec()
    }

    /// The compiler's `--module` value: `name:count[:parent]`.
    pub fn module_flag_value(&self, id: ModuleId) -> String {
        let node = &self.nodes[id.0];
        match node.parent {
            Some(parent) => format!(
                "{}:{}:{}",
                node.name,
                node.deps.len(),
                self.nodes[parent.0].name
            ),
            None => format!("{}:{}", node.name, node.deps.len()),
        }
    }

    /// `name -> [parent]` for every module, the root mapping to `[]`.
    pub fn module_info(&self) -> IndexMap<String, Vec<String>> {
        self.pre_order()
            .into_iter()
            .map(|id| {
                let node = &self.nodes[id.0];
                let parents = node
                    .parent
                    .map(|p| vec![self.nodes[p.0].name.clone()])
                    .unwrap_or_default();
                (node.name.clone(), parents)
            })
            .collect()
    }

    /// `name -> production uri` for every module.
    pub fn module_uris(&self, production_uri: &str) -> IndexMap<String, String> {
        self.pre_order()
            .into_iter()
            .map(|id| {
                let name = &self.nodes[id.0].name;
                (name.clone(), format!("{production_uri}{name}.js"))
            })
            .collect()
    }

    /// Render the wrapper for `id` with the given build-wide options.
    pub fn wrapper_value(&self, id: ModuleId, options: &WrapperOptions) -> String {
        let module_info = json_object(self.module_info());
        let module_uris = json_object(self.module_uris(&options.production_uri));
        self.render_wrapper(id, options, &module_info, &module_uris)
    }

    /// Render the wrapper for every module, in pre-order.
    pub fn wrapper_values(&self, options: &WrapperOptions) -> Vec<(ModuleId, String)> {
        let module_info = json_object(self.module_info());
        let module_uris = json_object(self.module_uris(&options.production_uri));
        self.pre_order()
            .into_iter()
            .map(|id| (id, self.render_wrapper(id, options, &module_info, &module_uris)))
            .collect()
    }

    fn render_wrapper(
        &self,
        id: ModuleId,
        options: &WrapperOptions,
        module_info: &str,
        module_uris: &str,
    ) -> String {
        let node = &self.nodes[id.0];
        let ctx = WrapperContext {
            name: &node.name,
            parent: node.parent.map(|p| self.nodes[p.0].name.as_str()),
            options,
            module_info,
            module_uris,
        };
        node.wrapper.render(&ctx)
    }

    fn collect_deps(&self, id: ModuleId, with_submodules: bool) -> UnitList {
        let mut out = UnitList::new();
        if with_submodules {
            let mut stack = vec![id];
            while let Some(current) = stack.pop() {
                let node = &self.nodes[current.0];
                out.extend(node.deps.iter().cloned());
                stack.extend(node.children.iter().rev().copied());
            }
        } else {
            out.extend(self.nodes[id.0].deps.iter().cloned());
        }
        out
    }

    fn transition<T>(self) -> ModuleTree<T> {
        ModuleTree {
            nodes: self.nodes,
            names: self.names,
            deps_tree: self.deps_tree,
            bootstrap: self.bootstrap,
            _state: PhantomData,
        }
    }
}

fn json_object<V: Into<serde_json::Value>>(map: IndexMap<String, V>) -> String {
    let object: serde_json::Map<String, serde_json::Value> =
        map.into_iter().map(|(k, v)| (k, v.into())).collect();
    serde_json::Value::Object(object).to_string()
}
