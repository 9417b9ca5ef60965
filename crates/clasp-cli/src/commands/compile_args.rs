//! Compile-args command implementation.
//!
//! Two modes: with `--input` the arguments describe one output built from
//! the resolved order; otherwise they describe every module of the module
//! config, wrappers and output prefix included.

use clasp_graph::BuildDriver;
use tracing::{debug, info};

use crate::cli::{CompileArgsArgs, OutputFormat};
use crate::commands::utils;
use crate::compiler_args::CompilerArgs;
use crate::error::Result;
use crate::scan::FsScanner;

/// Execute the compile-args command.
///
/// Text output prints one shell-quoted argument per line, ready to paste into
/// a compiler invocation. JSON output is the raw argv array.
///
/// # Errors
///
/// Besides the planning errors of `order` and `modules`, module mode fails
/// when the config lacks `outputPath` or `productionUri`.
pub fn execute(args: CompileArgsArgs) -> Result<()> {
    let cwd = utils::get_cwd()?;
    let settings = utils::load_settings(&cwd, &args.sources, args.format, args.no_bootstrap)?;

    let scanner = FsScanner::open(settings.cache_file.as_deref());
    let driver = BuildDriver::new(scanner).bootstrap(utils::bootstrap_policy(&settings));

    let compiler_args = if args.inputs.is_empty() {
        let config = utils::load_module_config(&cwd, args.config.as_deref())?;
        utils::required(config.require_production_uri(), utils::PRODUCTION_URI_HINT)?;
        let output_path = utils::required(config.require_output_path(), utils::OUTPUT_PATH_HINT)?;

        let tree = driver.modules(&settings.js, config.builder())?;
        info!(modules = tree.len(), "module mode");
        CompilerArgs::for_modules(&tree, &config.wrapper_options(), Some(output_path))
    } else {
        let order = driver.order(&settings.js, &args.inputs)?;
        info!(files = order.len(), "single output mode");
        CompilerArgs::for_single(&order)
    };
    driver.scanner().save_cache()?;

    let compiler_args = compiler_args
        .defines(&args.defines)
        .externs(&args.externs)
        .flags(&args.flags);
    debug!(args = compiler_args.len(), "compiler arguments ready");

    match settings.format {
        OutputFormat::Text => utils::print_lines(compiler_args.iter())?,
        OutputFormat::Json => utils::print_json(&compiler_args.to_argv())?,
    }
    Ok(())
}
