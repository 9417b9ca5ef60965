//! Order command implementation.
//!
//! Prints the files a single-output build needs for the given inputs, in the
//! order the compiler must see them.

use std::time::Instant;

use clasp_graph::BuildDriver;
use tracing::debug;

use crate::cli::{OrderArgs, OutputFormat};
use crate::commands::utils;
use crate::error::{BuildError, Result};
use crate::scan::FsScanner;
use crate::ui;

/// Execute the order command.
///
/// # Process
///
/// 1. Merge settings (CLI > Env > File > Defaults)
/// 2. Scan `--js` locators and the inputs into one pool
/// 3. Resolve the inputs' requires, bootstrap file first
/// 4. Persist the metadata cache and print the order
///
/// # Errors
///
/// Returns errors for unreadable sources, duplicate or unknown namespaces,
/// circular requires and a missing or ambiguous base.js.
pub fn execute(args: OrderArgs) -> Result<()> {
    let started = Instant::now();
    if args.inputs.is_empty() {
        return Err(BuildError::NoInputs.into());
    }

    let cwd = utils::get_cwd()?;
    let settings = utils::load_settings(&cwd, &args.sources, args.format, args.no_bootstrap)?;
    debug!(?settings, "resolved settings");

    let scanner = FsScanner::open(settings.cache_file.as_deref());
    let driver = BuildDriver::new(scanner).bootstrap(utils::bootstrap_policy(&settings));
    let order = driver.order(&settings.js, &args.inputs)?;
    driver.scanner().save_cache()?;

    match settings.format {
        OutputFormat::Text => utils::print_lines(order.iter().map(|unit| unit.path().display()))?,
        OutputFormat::Json => utils::print_json(&order)?,
    }

    ui::success(&format!(
        "Ordered {} files in {}",
        order.len(),
        ui::format_duration(started.elapsed())
    ));
    Ok(())
}
