//! Module config loading and validation for clasp.
//!
//! A module config declares the tree of output modules and the build-wide
//! options the module wrappers need. [`ModuleConfig::from_value`] parses a
//! document in memory; [`ConfigDiscovery`] and [`load_from`] read it from disk
//! and resolve relative paths against the file's directory.

pub mod config;
pub mod discovery;
pub mod error;
pub mod validation;

pub use config::{DeclaredModuleInfo, ModuleConfig};
pub use error::{ConfigError, Result};

pub use discovery::{CONFIG_FILE_NAMES, ConfigDiscovery, discover, load_from};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
