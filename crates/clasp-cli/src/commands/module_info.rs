//! Module-info command implementation.

use tracing::debug;

use crate::cli::ModuleInfoArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::module_deps::render_module_info;
use crate::ui;

/// Execute the module-info command.
///
/// The file is built from the declarations alone, so it can be written before
/// any source exists.
///
/// # Errors
///
/// Fails when the module config cannot be loaded or lacks `productionUri`.
pub fn execute(args: ModuleInfoArgs) -> Result<()> {
    let cwd = utils::get_cwd()?;
    let config = utils::load_module_config(&cwd, args.config.as_deref())?;
    utils::required(config.require_production_uri(), utils::PRODUCTION_URI_HINT)?;

    let declared = config.declared_info()?;
    debug!(modules = declared.uris.len(), "rendering module info");
    let rendered = render_module_info(&declared);

    match args.output.as_deref() {
        Some(path) => {
            utils::write_output(path, &rendered)?;
            ui::success(&format!(
                "Wrote {} ({} modules)",
                path.display(),
                declared.uris.len()
            ));
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
