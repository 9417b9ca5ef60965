//! Module-deps command implementation.

use std::time::Instant;

use clasp_graph::BuildDriver;
use tracing::info;

use crate::cli::{ModuleDepsArgs, OutputFormat};
use crate::commands::utils;
use crate::error::Result;
use crate::module_deps::{module_files, render_module_info};
use crate::scan::FsScanner;
use crate::ui;

/// Execute the module-deps command.
///
/// Builds the module tree like `modules` does, then prints every module with
/// the uris of its own files. Text output prints the module name followed by
/// one indented uri per line. JSON output lists `{name, parent, files}`
/// entries with each file's `uri` and `isModule`.
///
/// With `--module-info` the moduleInfo file is written as well.
///
/// # Errors
///
/// Besides the planning errors of `modules`, fails when the config lacks
/// `outputPath` or `productionUri`.
pub fn execute(args: ModuleDepsArgs) -> Result<()> {
    let started = Instant::now();
    let cwd = utils::get_cwd()?;
    let settings = utils::load_settings(&cwd, &args.sources, args.format, args.no_bootstrap)?;
    let config = utils::load_module_config(&cwd, args.config.as_deref())?;
    let production_uri =
        utils::required(config.require_production_uri(), utils::PRODUCTION_URI_HINT)?;
    let output_path = utils::required(config.require_output_path(), utils::OUTPUT_PATH_HINT)?;

    if let Some(path) = args.module_info.as_deref() {
        utils::write_output(path, &render_module_info(&config.declared_info()?))?;
        ui::success(&format!("Wrote {}", path.display()));
    }

    let scanner = FsScanner::open(settings.cache_file.as_deref());
    let driver = BuildDriver::new(scanner).bootstrap(utils::bootstrap_policy(&settings));
    let tree = driver.modules(&settings.js, config.builder())?;
    driver.scanner().save_cache()?;

    let modules = module_files(&tree, output_path, production_uri)?;
    info!(modules = modules.len(), "module debug files ready");

    match settings.format {
        OutputFormat::Text => {
            utils::print_lines(modules.iter().flat_map(|module| {
                std::iter::once(module.name.clone())
                    .chain(module.files.iter().map(|file| format!("  {}", file.uri)))
            }))?;
            let summary: Vec<(String, usize)> = modules
                .iter()
                .map(|module| (module.name.clone(), module.files.len()))
                .collect();
            ui::print_module_summary(&summary, started.elapsed());
        }
        OutputFormat::Json => utils::print_json(&modules)?,
    }
    Ok(())
}
