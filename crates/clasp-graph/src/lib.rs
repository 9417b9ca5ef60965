//! # clasp-graph
//!
//! Namespace dependency resolution and module partitioning for sources that
//! declare `goog.provide` / `goog.require` relationships.
//!
//! This crate holds the pure planning core: no file system access, no
//! parsing. Callers hand it source units (a path plus the namespaces the file
//! provides and requires) through a [`UnitScanner`], and it answers two
//! questions:
//!
//! - In what order must these files be fed to the compiler?
//! - Given a tree of output modules, which files does each module own?
//!
//! ## Architecture
//!
//! ```text
//!   locators ──► UnitScanner ──► [SourceUnit] ──► DepsTree
//!                                                  (namespace → unit)
//!                                                       │
//!   ModuleDescriptor* ──► ModuleGraphBuilder ──► ModuleTree<Constructed>
//!                                                       │ calculate_deps
//!                                                       ▼
//!                                              ModuleTree<Calculated>
//!                                                       │ normalize_deps
//!                                                       ▼
//!                                              ModuleTree<Normalized>
//!                                     (get_deps, module_flag_value, wrappers)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::path::PathBuf;
//! use clasp_graph::{BuildDriver, SourceUnit, UnitList};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool: UnitList = [
//!     SourceUnit::builder("goog/base.js").provide("goog").shared(),
//!     SourceUnit::builder("a.js").provide("a").shared(),
//!     SourceUnit::builder("b.js").provide("b").require("a").shared(),
//! ]
//! .into_iter()
//! .collect();
//!
//! let sources = vec![PathBuf::from("goog/base.js"), PathBuf::from("a.js")];
//! let order = BuildDriver::new(pool).order(&sources, &[PathBuf::from("b.js")])?;
//!
//! let paths: Vec<_> = order.iter().map(|u| u.path().display().to_string()).collect();
//! assert_eq!(paths, ["goog/base.js", "a.js", "b.js"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! [`DepsTree`] is immutable after construction and shared as `Arc`. Units are
//! `Arc<SourceUnit>`. Per-module dependency closures are computed in parallel;
//! normalization runs as one sequential top-down pass.

pub mod builder;
pub mod deps_tree;
pub mod driver;
mod error;
pub mod module_tree;
pub mod source_unit;
pub mod unit_list;
pub mod wrapper;

pub use builder::{ModuleDescriptor, ModuleGraphBuilder, UnitScanner};
pub use deps_tree::DepsTree;
pub use driver::{BuildDriver, SINGLE_MODULE_NAME};
pub use error::{GraphError, Result};
pub use module_tree::{
    BootstrapPolicy, Calculated, Constructed, ModuleId, ModuleNode, ModuleTree, Normalized,
};
pub use source_unit::{SourceUnit, SourceUnitBuilder, is_bootstrap_file};
pub use unit_list::UnitList;
pub use wrapper::{Wrapper, WrapperContext, WrapperOptions};

#[cfg(test)]
mod tests;
