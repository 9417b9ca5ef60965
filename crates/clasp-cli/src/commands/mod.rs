//! Command implementations for the clasp CLI.
//!
//! - [`order`] - Dependency order for a single output
//! - [`modules`] - Module plan for a module config
//! - [`compile_args`] - Closure Compiler arguments
//! - [`deps`] - `deps.js` generation
//! - [`module_deps`] - Debug file lists for uncompiled modules
//! - [`module_info`] - `moduleInfo` file generation
//!
//! Each command is implemented in its own module and provides an `execute`
//! function that takes the parsed command arguments and returns a Result.

pub mod compile_args;
pub mod deps;
pub mod module_deps;
pub mod module_info;
pub mod modules;
pub mod order;
pub(crate) mod utils;

// Re-export execute functions for convenience
pub use compile_args::execute as compile_args_execute;
pub use deps::execute as deps_execute;
pub use module_deps::execute as module_deps_execute;
pub use module_info::execute as module_info_execute;
pub use modules::execute as modules_execute;
pub use order::execute as order_execute;
