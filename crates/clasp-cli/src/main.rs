//! Clasp CLI entry point.
//!
//! Handles command-line argument parsing, logging initialization and command
//! dispatch.

use clap::Parser;
use clasp_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging and colors based on global flags
    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Order(order_args) => commands::order_execute(order_args),
        cli::Command::Modules(modules_args) => commands::modules_execute(modules_args),
        cli::Command::CompileArgs(compile_args) => commands::compile_args_execute(compile_args),
        cli::Command::Deps(deps_args) => commands::deps_execute(deps_args),
        cli::Command::ModuleDeps(module_deps_args) => commands::module_deps_execute(module_deps_args),
        cli::Command::ModuleInfo(module_info_args) => commands::module_info_execute(module_info_args),
    };

    // Convert CLI errors to miette diagnostics for error reporting
    result.map_err(error::cli_error_to_miette)
}
