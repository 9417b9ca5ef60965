//! Modules command implementation.

use std::time::Instant;

use clasp_graph::{BuildDriver, ModuleTree};
use serde::Serialize;

use crate::cli::{ModulesArgs, OutputFormat};
use crate::commands::utils;
use crate::error::Result;
use crate::scan::FsScanner;
use crate::ui;

/// One module of the plan as printed by `--format json`.
#[derive(Debug, Serialize)]
struct ModuleEntry {
    name: String,
    parent: Option<String>,
    flag: String,
    files: Vec<String>,
}

/// Execute the modules command.
///
/// Loads the module config, builds and normalizes the module tree and prints
/// every module in pre-order with the files it owns.
pub fn execute(args: ModulesArgs) -> Result<()> {
    let started = Instant::now();
    let cwd = utils::get_cwd()?;
    let settings = utils::load_settings(&cwd, &args.sources, args.format, args.no_bootstrap)?;
    let config = utils::load_module_config(&cwd, args.config.as_deref())?;

    let scanner = FsScanner::open(settings.cache_file.as_deref());
    let driver = BuildDriver::new(scanner).bootstrap(utils::bootstrap_policy(&settings));
    let tree = driver.modules(&settings.js, config.builder())?;
    driver.scanner().save_cache()?;

    let entries = plan(&tree);
    match settings.format {
        OutputFormat::Text => {
            utils::print_lines(entries.iter().flat_map(|entry| {
                std::iter::once(entry.flag.clone())
                    .chain(entry.files.iter().map(|file| format!("  {file}")))
            }))?;
            let summary: Vec<(String, usize)> = entries
                .iter()
                .map(|entry| (entry.flag.clone(), entry.files.len()))
                .collect();
            ui::print_module_summary(&summary, started.elapsed());
        }
        OutputFormat::Json => utils::print_json(&entries)?,
    }
    Ok(())
}

fn plan<S>(tree: &ModuleTree<S>) -> Vec<ModuleEntry> {
    tree.pre_order()
        .into_iter()
        .map(|id| {
            let node = tree.node(id);
            ModuleEntry {
                name: node.name().to_string(),
                parent: node.parent().map(|parent| tree.node(parent).name().to_string()),
                flag: tree.module_flag_value(id),
                files: tree
                    .get_deps(id, false)
                    .iter()
                    .map(|unit| unit.path().display().to_string())
                    .collect(),
            }
        })
        .collect()
}
