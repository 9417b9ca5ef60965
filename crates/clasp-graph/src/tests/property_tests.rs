//! Property-based tests for clasp-graph using proptest.
//!
//! Random acyclic pools and random module trees are pushed through
//! resolution and normalization, and the ordering and partition invariants
//! are checked on every case.
//!
//! Run with: cargo test --features proptest --package clasp-graph property_tests

#![cfg(feature = "proptest")]

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use crate::module_tree::{Calculated, Normalized};
use crate::{BootstrapPolicy, DepsTree, ModuleTree, SourceUnit};

/// A pool where unit `i` may only require units `j < i`, so it is acyclic.
fn acyclic_pool_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..=16).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec(0..i, 0..=3).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn build_pool(requires: &[Vec<usize>]) -> Vec<Arc<SourceUnit>> {
    requires
        .iter()
        .enumerate()
        .map(|(i, reqs)| {
            SourceUnit::builder(format!("u{i}.js"))
                .provide(format!("ns{i}"))
                .requires(reqs.iter().map(|j| format!("ns{j}")))
                .shared()
        })
        .collect()
}

/// Parent of module `i` is drawn from `0..i`; each module starts from one unit.
fn module_tree_strategy() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<(usize, usize)>)> {
    acyclic_pool_strategy().prop_flat_map(|pool| {
        let units = pool.len();
        let modules = (1usize..=8).prop_flat_map(move |m| {
            (0..m)
                .map(|i| {
                    let parent = if i == 0 { Just(0).boxed() } else { (0..i).boxed() };
                    (parent, 0..units)
                })
                .collect::<Vec<_>>()
        });
        (Just(pool), modules)
    })
}

/// Build the module tree described by `modules` over `pool` and compute its
/// closures.
fn calculated_tree(
    deps_tree: &Arc<DepsTree>,
    pool: &[Arc<SourceUnit>],
    modules: &[(usize, usize)],
) -> ModuleTree<Calculated> {
    let (_, root_unit) = modules[0];
    let mut tree = ModuleTree::new(Arc::clone(deps_tree), "m0", vec![Arc::clone(&pool[root_unit])])
        .with_bootstrap(BootstrapPolicy::Disabled);
    let mut ids = vec![tree.root()];
    for (i, (parent, unit)) in modules.iter().enumerate().skip(1) {
        let id = tree
            .add_child(ids[*parent], format!("m{i}"), vec![Arc::clone(&pool[*unit])])
            .unwrap();
        ids.push(id);
    }
    tree.calculate_deps().unwrap()
}

/// Every unit in `units` comes after the providers of its requires that are
/// also in `units`.
fn is_dependency_first(deps_tree: &DepsTree, units: &[Arc<SourceUnit>]) -> bool {
    let position = |path: &std::path::Path| units.iter().position(|u| u.path() == path);
    units.iter().enumerate().all(|(index, unit)| {
        unit.requires().iter().all(|ns| {
            let provider = deps_tree.provider(ns).unwrap();
            position(provider.path()).is_none_or(|dep_index| dep_index < index)
        })
    })
}

fn normalized_tree(
    requires: &[Vec<usize>],
    modules: &[(usize, usize)],
) -> (Arc<DepsTree>, ModuleTree<Normalized>) {
    let pool = build_pool(requires);
    let deps_tree = Arc::new(DepsTree::new(pool.clone()).unwrap());
    let tree = calculated_tree(&deps_tree, &pool, modules).normalize_deps();
    (deps_tree, tree)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: resolution order is dependency-first and duplicate-free.
    #[test]
    fn prop_resolution_is_topological(requires in acyclic_pool_strategy()) {
        let pool = build_pool(&requires);
        let tree = DepsTree::new(pool.clone()).unwrap();
        let last = format!("ns{}", requires.len() - 1);
        let order = tree.resolve(&last).unwrap();

        let position: Vec<_> = order.iter().map(|u| u.path().to_path_buf()).collect();
        let unique: HashSet<_> = position.iter().collect();
        prop_assert_eq!(unique.len(), position.len());

        for (index, unit) in order.iter().enumerate() {
            for ns in unit.requires() {
                let provider = tree.provider(ns).unwrap();
                let dep_index = position.iter().position(|p| p == provider.path()).unwrap();
                prop_assert!(dep_index < index);
            }
        }
    }

    /// Property: resolving twice gives the same answer.
    #[test]
    fn prop_resolution_is_idempotent(requires in acyclic_pool_strategy()) {
        let tree = DepsTree::new(build_pool(&requires)).unwrap();
        let last = format!("ns{}", requires.len() - 1);
        let first: Vec<_> = tree.resolve(&last).unwrap().iter().map(|u| u.path().to_path_buf()).collect();
        let second: Vec<_> = tree.resolve(&last).unwrap().iter().map(|u| u.path().to_path_buf()).collect();
        prop_assert_eq!(first, second);
    }

    /// Property: normalization keeps the union and never lists a unit twice.
    #[test]
    fn prop_normalization_partitions_closure((requires, modules) in module_tree_strategy()) {
        let pool = build_pool(&requires);
        let deps_tree = Arc::new(DepsTree::new(pool.clone()).unwrap());
        let calculated = calculated_tree(&deps_tree, &pool, &modules);
        let before: HashSet<_> = calculated
            .get_deps(calculated.root(), true)
            .iter()
            .map(|u| u.path().to_path_buf())
            .collect();

        let normalized = calculated.normalize_deps();
        let mut seen = HashSet::new();
        for id in normalized.pre_order() {
            for unit in normalized.get_deps(id, false) {
                prop_assert!(seen.insert(unit.path().to_path_buf()));
            }
        }
        prop_assert_eq!(seen, before);
    }

    /// Property: after hoisting, each module lists a unit after every
    /// provider it shares the module with.
    #[test]
    fn prop_normalized_modules_are_dependency_first((requires, modules) in module_tree_strategy()) {
        let (deps_tree, normalized) = normalized_tree(&requires, &modules);
        for id in normalized.pre_order() {
            let deps = normalized.get_deps(id, false);
            prop_assert!(
                is_dependency_first(&deps_tree, &deps),
                "module {} is out of order",
                normalized.node(id).name()
            );
        }
    }

    /// Property: the pre-order concatenation of all modules loads every
    /// provider before the units that require it.
    #[test]
    fn prop_pre_order_concatenation_is_dependency_first((requires, modules) in module_tree_strategy()) {
        let (deps_tree, normalized) = normalized_tree(&requires, &modules);
        let all = normalized.get_deps(normalized.root(), true);

        for (index, unit) in all.iter().enumerate() {
            for ns in unit.requires() {
                let provider = deps_tree.provider(ns).unwrap();
                let dep_index = all.iter().position(|u| u.path() == provider.path());
                prop_assert!(
                    matches!(dep_index, Some(dep_index) if dep_index < index),
                    "{} loads before its provider {}",
                    unit.path().display(),
                    provider.path().display()
                );
            }
        }
    }
}
