//! Command-line interface definition for clasp.
//!
//! # Command Structure
//!
//! - `clasp order` - Dependency-ordered file list for a single output
//! - `clasp modules` - Module plan for a module config
//! - `clasp compile-args` - Closure Compiler arguments for a build
//! - `clasp deps` - `goog.addDependency` file for uncompiled loading
//! - `clasp module-deps` - Per-module debug file lists
//! - `clasp module-info` - `moduleInfo` file for the module loader

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{
    Command, CompileArgsArgs, DepsArgs, ModuleDepsArgs, ModuleInfoArgs, ModulesArgs, OrderArgs,
    SourceArgs,
};
pub use enums::*;
pub use validation::{PathWithDepsPath, RootWithPrefix, parse_define, parse_path_with_depspath, parse_root_with_prefix};

/// clasp - Closure namespace ordering and module planning
#[derive(Parser, Debug)]
#[command(
    name = "clasp",
    version,
    about = "Order Closure sources and plan compiled modules",
    long_about = "clasp reads goog.provide / goog.require declarations, orders source files so\n\
                  every namespace comes after what it requires, and splits a build into a tree\n\
                  of modules with shared code hoisted to the nearest common ancestor."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
