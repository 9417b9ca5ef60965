use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::*;
use crate::cli::validation::{
    PathWithDepsPath, RootWithPrefix, parse_define, parse_path_with_depspath, parse_root_with_prefix,
};
use crate::compiler_args::Define;

/// Available clasp subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the dependency order for a single output
    ///
    /// Resolves every goog.require reachable from the inputs and prints the
    /// files in load order, Closure's base.js first.
    Order(OrderArgs),

    /// Print the module plan for a module config
    ///
    /// Builds the module tree, hoists files shared by sibling modules to their
    /// common ancestor and prints each module with its files.
    Modules(ModulesArgs),

    /// Print Closure Compiler arguments
    ///
    /// Emits --module, --module_wrapper and --js flags for a module config, or
    /// --js flags for a single output when --input is given.
    CompileArgs(CompileArgsArgs),

    /// Write a deps.js file
    ///
    /// Lists goog.addDependency calls for every scanned file so the Closure
    /// debug loader can load sources without compiling.
    Deps(DepsArgs),

    /// Print the debug file list of every module
    ///
    /// Lists, per module, the uris its own source files are fetched from when
    /// the modules are loaded uncompiled. Optionally writes the moduleInfo file.
    ModuleDeps(ModuleDepsArgs),

    /// Write the moduleInfo file for a module config
    ///
    /// Emits a goog.module with each module's declared deps and a trusted
    /// production uri. No sources are scanned.
    ModuleInfo(ModuleInfoArgs),
}

/// Where sources come from, shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Files or directories to scan for goog.provide declarations
    ///
    /// Directories are walked recursively for .js files. May be repeated.
    ///
    /// Examples:
    ///   clasp order --js lib/closure --js src --input src/main.js
    #[arg(long = "js", value_name = "PATH")]
    pub js: Vec<PathBuf>,

    /// Metadata cache file
    ///
    /// Stores provides/requires per file keyed by modification time so
    /// unchanged files are not parsed again.
    #[arg(long = "cache", value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Settings file (defaults to ./clasp.json when present)
    #[arg(long = "settings", value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

/// Arguments for the order command
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Entry files for the build
    #[arg(short, long = "input", value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub sources: SourceArgs,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Do not require Closure's base.js
    #[arg(long)]
    pub no_bootstrap: bool,
}

/// Arguments for the modules command
#[derive(Args, Debug)]
pub struct ModulesArgs {
    /// Module config file (defaults to clasp.modules.json in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub sources: SourceArgs,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Do not require Closure's base.js
    #[arg(long)]
    pub no_bootstrap: bool,
}

/// Arguments for the compile-args command
#[derive(Args, Debug)]
pub struct CompileArgsArgs {
    /// Module config file (defaults to clasp.modules.json in the current directory)
    #[arg(short, long, value_name = "FILE", conflicts_with = "inputs")]
    pub config: Option<PathBuf>,

    /// Entry files for a single-output build
    #[arg(short, long = "input", value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub sources: SourceArgs,

    /// Compile-time constant, as KEY=VALUE
    ///
    /// Examples:
    ///   --define goog.DEBUG=false --define app.VERSION='"1.2"'
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_define)]
    pub defines: Vec<Define>,

    /// Externs file passed through to the compiler
    #[arg(long = "externs", value_name = "FILE")]
    pub externs: Vec<PathBuf>,

    /// Extra compiler flag passed through verbatim
    ///
    /// Examples:
    ///   --flag=--compilation_level=ADVANCED
    #[arg(long = "flag", value_name = "FLAG", allow_hyphen_values = true)]
    pub flags: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Do not require Closure's base.js
    #[arg(long)]
    pub no_bootstrap: bool,
}

/// Arguments for the deps command
#[derive(Args, Debug)]
pub struct DepsArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Source root listed relative to itself under a prefix: "<dir> <prefix>"
    ///
    /// Examples:
    ///   --root-with-prefix "src ../../src"
    #[arg(long = "root-with-prefix", value_name = "DIR PREFIX", value_parser = parse_root_with_prefix)]
    pub roots_with_prefix: Vec<RootWithPrefix>,

    /// Single file listed under an explicit path: "<file> <path>"
    #[arg(long = "path-with-depspath", value_name = "FILE PATH", value_parser = parse_path_with_depspath)]
    pub paths_with_depspath: Vec<PathWithDepsPath>,

    /// Directory --js paths are made relative to (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Write deps.js here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the module-deps command
#[derive(Args, Debug)]
pub struct ModuleDepsArgs {
    /// Module config file (defaults to clasp.modules.json in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub sources: SourceArgs,

    /// Also write the moduleInfo file here
    #[arg(long, value_name = "FILE")]
    pub module_info: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Do not require Closure's base.js
    #[arg(long)]
    pub no_bootstrap: bool,
}

/// Arguments for the module-info command
#[derive(Args, Debug)]
pub struct ModuleInfoArgs {
    /// Module config file (defaults to clasp.modules.json in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the file here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
